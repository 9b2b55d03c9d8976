//! State tracking module
//!
//! This module contains the per-domain fetch job and the retry state it
//! carries between attempts.

mod job;

pub use job::{Attempt, FetchJob, PathVariant, RetryState, Scheme};
