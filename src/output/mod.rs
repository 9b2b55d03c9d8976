//! Output module for run reporting
//!
//! This module handles:
//! - Counting what a run did
//! - Logging progress and final summaries

pub mod stats;

pub use stats::{Counter, RunStats, StatsSnapshot};
