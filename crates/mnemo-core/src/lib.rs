//! Spaced-repetition scheduling and learning-path engine.
//!
//! This crate holds the data model, the SM-2 scheduler, session assembly,
//! concept ordering, and the path engine. It performs no I/O beyond
//! reading snapshot files; persistence belongs to the caller.

pub mod adapter;
pub mod assessment;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod model;
pub mod navigator;
pub mod planner;
pub mod scheduler;
pub mod session;
pub mod snapshot;
