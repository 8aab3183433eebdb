//! Subcommand implementations and the state they share.

use std::path::Path;

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};

use mnemo_core::config::MnemoConfig;
use mnemo_core::engine::PathEngine;
use mnemo_core::model::{BloomLevel, LearningPath};
use mnemo_core::snapshot::Snapshot;

pub mod adapt;
pub mod gaps;
pub mod init;
pub mod next;
pub mod plan;
pub mod queue;
pub mod review;
pub mod suggest;
pub mod validate;

/// Resolved configuration and clock for one invocation.
pub struct Context {
    pub config: MnemoConfig,
    pub now: DateTime<Utc>,
}

impl Context {
    pub fn load(config_path: Option<&Path>, now: Option<&str>) -> Result<Self> {
        let config = crate::config::load_config_from(config_path)?;
        let now = match now {
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .with_context(|| format!("--now is not an RFC 3339 timestamp: {raw}"))?
                .with_timezone(&Utc),
            None => Utc::now(),
        };
        Ok(Self { config, now })
    }

    pub fn engine(&self) -> PathEngine {
        PathEngine::new(self.config.path.clone())
    }
}

/// The snapshot's committed path, or a fresh one planned from its concepts.
pub fn path_or_plan(ctx: &Context, snapshot: &Snapshot) -> LearningPath {
    match &snapshot.path {
        Some(path) => path.clone(),
        None => {
            tracing::info!("snapshot has no path; planning one from its concepts");
            let plan = ctx.engine().create_learning_path(
                snapshot.topic_id,
                &snapshot.concepts,
                &snapshot.profile(),
                BloomLevel::Apply,
            );
            LearningPath::from_plan(snapshot.user_id, &plan)
        }
    }
}
