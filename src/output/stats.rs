//! Run statistics
//!
//! Counters for one collector run. They are atomics so completion handling
//! can update them from any task without extra locking.

use crate::registry::RegistryStats;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters for one run
#[derive(Debug, Default)]
pub struct RunStats {
    rows: AtomicU64,
    invalid: AtomicU64,
    entries: AtomicU64,
    duplicates: AtomicU64,
    considered: AtomicU64,
    planned: AtomicU64,
    skipped: AtomicU64,
    stat_errors: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
    resubmitted: AtomicU64,
    barriers: AtomicU64,
}

/// Counter kinds a run records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Considered,
    Planned,
    Skipped,
    StatError,
    Succeeded,
    Failed,
    Dropped,
    Resubmitted,
    Barrier,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the registry-phase counters
    pub fn record_registry(&self, stats: &RegistryStats) {
        self.rows.store(stats.rows, Ordering::Relaxed);
        self.invalid.store(stats.invalid, Ordering::Relaxed);
        self.entries.store(stats.entries, Ordering::Relaxed);
        self.duplicates.store(stats.duplicates, Ordering::Relaxed);
    }

    pub fn incr(&self, counter: Counter) {
        let slot = match counter {
            Counter::Considered => &self.considered,
            Counter::Planned => &self.planned,
            Counter::Skipped => &self.skipped,
            Counter::StatError => &self.stat_errors,
            Counter::Succeeded => &self.succeeded,
            Counter::Failed => &self.failed,
            Counter::Dropped => &self.dropped,
            Counter::Resubmitted => &self.resubmitted,
            Counter::Barrier => &self.barriers,
        };
        slot.fetch_add(1, Ordering::Relaxed);
    }

    /// Copies the current counter values
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            rows: self.rows.load(Ordering::Relaxed),
            invalid: self.invalid.load(Ordering::Relaxed),
            entries: self.entries.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            considered: self.considered.load(Ordering::Relaxed),
            planned: self.planned.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            stat_errors: self.stat_errors.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            resubmitted: self.resubmitted.load(Ordering::Relaxed),
            barriers: self.barriers.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the run counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub rows: u64,
    pub invalid: u64,
    pub entries: u64,
    pub duplicates: u64,
    /// Domains whose icon path could be checked (planned + skipped)
    pub considered: u64,
    pub planned: u64,
    pub skipped: u64,
    pub stat_errors: u64,
    pub succeeded: u64,
    pub failed: u64,
    /// Successful responses that were empty or not an image
    pub dropped: u64,
    pub resubmitted: u64,
    pub barriers: u64,
}

impl StatsSnapshot {
    /// Logs the three summary lines used at barriers and at the end of a run
    pub fn log_summary(&self) {
        tracing::info!(
            "Valid domains: {} (excluding {} duplicate)",
            self.entries,
            self.duplicates
        );
        tracing::info!(
            "Planned scrapes: {} (excluding {} skipped)",
            self.planned,
            self.skipped
        );
        tracing::info!(
            "Successful scrapes: {} (excluding {} failed)",
            self.succeeded,
            self.failed
        );
    }

    /// Logs the counters the short summary leaves out
    pub fn log_details(&self) {
        tracing::debug!(
            rows = self.rows,
            invalid = self.invalid,
            stat_errors = self.stat_errors,
            dropped = self.dropped,
            resubmitted = self.resubmitted,
            barriers = self.barriers,
            "Run details"
        );
    }
}
