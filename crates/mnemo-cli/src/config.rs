//! Configuration file discovery and environment overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use mnemo_core::config::MnemoConfig;

/// Load config from an explicit path, or search the default locations.
///
/// Search order when no path is given:
/// 1. `mnemo.toml` in the current directory
/// 2. `~/.config/mnemo/config.toml`
///
/// Environment variable overrides: `MNEMO_INTERLEAVING_RATIO`,
/// `MNEMO_SESSION_SIZE`.
pub fn load_config_from(path: Option<&Path>) -> Result<MnemoConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("mnemo.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            MnemoConfig::from_toml_str(&content)
                .with_context(|| format!("invalid config: {}", path.display()))?
        }
        None => MnemoConfig::default(),
    };

    if let Ok(value) = std::env::var("MNEMO_INTERLEAVING_RATIO") {
        config.scheduler.interleaving_ratio = value
            .parse()
            .with_context(|| format!("MNEMO_INTERLEAVING_RATIO is not a number: {value}"))?;
    }
    if let Ok(value) = std::env::var("MNEMO_SESSION_SIZE") {
        config.scheduler.session_size = value
            .parse()
            .with_context(|| format!("MNEMO_SESSION_SIZE is not a count: {value}"))?;
    }
    config.check()?;

    tracing::debug!(
        source = ?config_path,
        session_size = config.scheduler.session_size,
        "loaded configuration"
    );
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("mnemo"))
}
