//! Learning-path engine.
//!
//! `PathEngine` carries the path thresholds and exposes every path
//! operation: planning (`planner`), navigation (`navigator`), and adaptation
//! and gap analysis (`adapter`). It holds no state beyond its configuration,
//! so one instance can be shared by any number of callers or built per
//! request.

use crate::config::PathConfig;

#[derive(Debug, Clone, Default)]
pub struct PathEngine {
    pub(crate) config: PathConfig,
}

impl PathEngine {
    pub fn new(config: PathConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PathConfig {
        &self.config
    }
}
