//! Engine configuration.
//!
//! Every threshold the scheduler and path engine use lives here with its
//! default. Configuration values are passed into the engines explicitly;
//! nothing in the crate reads a global.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level mnemo configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MnemoConfig {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub path: PathConfig,
}

impl MnemoConfig {
    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: MnemoConfig = toml::from_str(content).context("failed to parse config")?;
        config.check()?;
        Ok(config)
    }

    /// Reject values that would make the engines meaningless.
    pub fn check(&self) -> Result<()> {
        anyhow::ensure!(
            self.scheduler.interleaving_ratio >= 0.0,
            "interleaving_ratio must not be negative"
        );
        anyhow::ensure!(
            self.scheduler.session_size >= 1,
            "session_size must be at least 1"
        );
        let p = &self.path;
        for (name, value) in [
            ("prerequisite_threshold", p.prerequisite_threshold),
            ("mastered_threshold", p.mastered_threshold),
            ("pace_up_score", p.pace_up_score),
            ("pace_down_score", p.pace_down_score),
            ("struggling_below", p.struggling_below),
            ("skip_above", p.skip_above),
            ("weak_foundation_concept", p.weak_foundation_concept),
            ("weak_foundation_prerequisite", p.weak_foundation_prerequisite),
            ("review_band_low", p.review_band_low),
            ("review_band_high", p.review_band_high),
        ] {
            anyhow::ensure!(
                (0.0..=1.0).contains(&value),
                "{name} must be between 0.0 and 1.0"
            );
        }
        anyhow::ensure!(
            p.pace_down_score <= p.pace_up_score,
            "pace_down_score must not exceed pace_up_score"
        );
        anyhow::ensure!(
            p.review_band_low <= p.review_band_high,
            "review_band_low must not exceed review_band_high"
        );
        Ok(())
    }
}

/// Review-session settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Zero disables interleaving; any positive value enables it.
    #[serde(default = "default_interleaving_ratio")]
    pub interleaving_ratio: f64,
    /// Maximum items in one review session.
    #[serde(default = "default_session_size")]
    pub session_size: usize,
    /// Lower bound on the number of new items offered per session.
    #[serde(default = "default_min_new_items")]
    pub min_new_items: usize,
}

fn default_interleaving_ratio() -> f64 {
    0.3
}
fn default_session_size() -> usize {
    10
}
fn default_min_new_items() -> usize {
    3
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interleaving_ratio: default_interleaving_ratio(),
            session_size: default_session_size(),
            min_new_items: default_min_new_items(),
        }
    }
}

/// Learning-path thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathConfig {
    /// Every prerequisite must reach this mastery before a concept opens.
    #[serde(default = "default_prerequisite_threshold")]
    pub prerequisite_threshold: f64,
    /// A concept at or above this mastery is passed over by the navigator.
    #[serde(default = "default_mastered_threshold")]
    pub mastered_threshold: f64,
    /// Mean recent score above which pace goes to fast.
    #[serde(default = "default_pace_up_score")]
    pub pace_up_score: f64,
    /// Mean recent score below which pace goes to slow.
    #[serde(default = "default_pace_down_score")]
    pub pace_down_score: f64,
    #[serde(default = "default_struggling_below")]
    pub struggling_below: f64,
    #[serde(default = "default_skip_above")]
    pub skip_above: f64,
    /// Concept mastery above which weak prerequisites are a gap.
    #[serde(default = "default_weak_foundation_concept")]
    pub weak_foundation_concept: f64,
    /// Prerequisite mastery below which it counts as weak.
    #[serde(default = "default_weak_foundation_prerequisite")]
    pub weak_foundation_prerequisite: f64,
    /// Mastery strictly between the band edges is still consolidating and
    /// worth a review.
    #[serde(default = "default_review_band_low")]
    pub review_band_low: f64,
    #[serde(default = "default_review_band_high")]
    pub review_band_high: f64,
    /// Days without practice after which a concept needs refreshing.
    #[serde(default = "default_stale_after_days")]
    pub stale_after_days: u32,
    #[serde(default = "default_max_review_suggestions")]
    pub max_review_suggestions: usize,
}

fn default_prerequisite_threshold() -> f64 {
    0.7
}
fn default_mastered_threshold() -> f64 {
    0.8
}
fn default_pace_up_score() -> f64 {
    0.9
}
fn default_pace_down_score() -> f64 {
    0.6
}
fn default_struggling_below() -> f64 {
    0.5
}
fn default_skip_above() -> f64 {
    0.9
}
fn default_weak_foundation_concept() -> f64 {
    0.7
}
fn default_weak_foundation_prerequisite() -> f64 {
    0.6
}
fn default_review_band_low() -> f64 {
    0.6
}
fn default_review_band_high() -> f64 {
    0.85
}
fn default_stale_after_days() -> u32 {
    7
}
fn default_max_review_suggestions() -> usize {
    5
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            prerequisite_threshold: default_prerequisite_threshold(),
            mastered_threshold: default_mastered_threshold(),
            pace_up_score: default_pace_up_score(),
            pace_down_score: default_pace_down_score(),
            struggling_below: default_struggling_below(),
            skip_above: default_skip_above(),
            weak_foundation_concept: default_weak_foundation_concept(),
            weak_foundation_prerequisite: default_weak_foundation_prerequisite(),
            review_band_low: default_review_band_low(),
            review_band_high: default_review_band_high(),
            stale_after_days: default_stale_after_days(),
            max_review_suggestions: default_max_review_suggestions(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = MnemoConfig::default();
        assert_eq!(config.scheduler.session_size, 10);
        assert_eq!(config.path.prerequisite_threshold, 0.7);
        assert_eq!(config.path.mastered_threshold, 0.8);
        assert!(config.check().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r#"
[scheduler]
interleaving_ratio = 0.0

[path]
prerequisite_threshold = 0.75
"#;
        let config = MnemoConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.scheduler.interleaving_ratio, 0.0);
        assert_eq!(config.scheduler.session_size, 10);
        assert_eq!(config.path.prerequisite_threshold, 0.75);
        assert_eq!(config.path.skip_above, 0.9);
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(MnemoConfig::from_toml_str("").unwrap(), MnemoConfig::default());
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let err = MnemoConfig::from_toml_str("[path]\nskip_above = 1.5\n").unwrap_err();
        assert!(err.to_string().contains("skip_above"));
    }

    #[test]
    fn rejects_inverted_pace_band() {
        let toml_str = "[path]\npace_up_score = 0.5\npace_down_score = 0.7\n";
        assert!(MnemoConfig::from_toml_str(toml_str).is_err());
    }

    #[test]
    fn review_band_defaults_and_order() {
        let config = MnemoConfig::default();
        assert_eq!(config.path.review_band_low, 0.6);
        assert_eq!(config.path.review_band_high, 0.85);
        assert_eq!(config.path.stale_after_days, 7);

        let toml_str = "[path]\nreview_band_low = 0.9\nreview_band_high = 0.8\n";
        let err = MnemoConfig::from_toml_str(toml_str).unwrap_err();
        assert!(err.to_string().contains("review_band_low"));
    }
}
