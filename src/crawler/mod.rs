//! Crawler module for favicon fetching
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a capped body size
//! - The retry state machine for failed attempts
//! - Classification and persistence of successful responses
//! - Bounded-parallelism orchestration with batch barriers

mod classifier;
mod coordinator;
mod fetcher;
mod retry;

pub use classifier::{classify, AttemptOutcome, Classification, ResponseClassifier};
pub use coordinator::{preview, AttemptReport, FetchOrchestrator, RunPreview, RunReport};
pub use fetcher::{
    build_http_client, FetchFailure, FetchResult, FetchedIcon, HttpFetcher, IconFetcher,
    IconRequest,
};
pub use retry::{on_failure, RetryDecision};

use crate::config::Config;
use crate::registry::DedupRegistry;
use crate::source::{ItemFilter, RecordSource};
use crate::storage::open_store;
use crate::CollectorError;
use std::sync::Arc;

/// Runs a complete collection
///
/// This is the main entry point for a run. It will:
/// 1. Build the domain registry from the record source
/// 2. Prepare the output directory
/// 3. Build the HTTP client
/// 4. Fetch icons for every domain that lacks one
///
/// # Arguments
///
/// * `config` - The collector configuration
/// * `source` - Where story URLs are read from
///
/// # Returns
///
/// * `Ok(RunReport)` - Run completed
/// * `Err(CollectorError)` - Run failed with a fatal error
pub async fn collect(config: &Config, source: &dyn RecordSource) -> Result<RunReport, CollectorError> {
    let filter = ItemFilter {
        min_score: config.source.min_score,
        limit: config.source.limit,
    };
    let registry = DedupRegistry::from_source(source, &filter)?;

    let store = open_store(&config.fetch.output_dir)?;
    let fetcher = HttpFetcher::new(&config.fetch)?;

    let mut orchestrator =
        FetchOrchestrator::new(config.fetch.clone(), Arc::new(fetcher), Arc::new(store));
    orchestrator.run(&registry).await
}
