//! Fetch orchestration - main crawl logic
//!
//! This module drives one collector run:
//! - Turning registry entries into fetch jobs for domains without an icon
//! - Dispatching attempts under a global parallelism cap
//! - Holding submission at batch boundaries until every attempt has finished
//! - Routing attempt results to the retry state machine or the classifier
//! - Counting what happened

use crate::config::FetchConfig;
use crate::crawler::classifier::{AttemptOutcome, ResponseClassifier};
use crate::crawler::fetcher::{FetchFailure, IconFetcher, IconRequest};
use crate::crawler::retry::{on_failure, RetryDecision};
use crate::output::{Counter, RunStats, StatsSnapshot};
use crate::registry::DedupRegistry;
use crate::state::FetchJob;
use crate::storage::{IconStatus, IconStore};
use crate::url::extract_domain;
use crate::CollectorError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};

/// A finished attempt, handed back to the orchestrator
#[derive(Debug)]
pub struct AttemptReport {
    pub job: FetchJob,
    pub outcome: AttemptOutcome,
}

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub stats: StatsSnapshot,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// What a run would do, without touching the network
#[derive(Debug, Default, Clone)]
pub struct RunPreview {
    /// `(sanitized domain, request URL)` pairs that would be fetched
    pub planned: Vec<(String, String)>,

    /// Domains that already have an icon
    pub skipped: Vec<String>,

    /// Domains whose icon path could not be checked
    pub unreadable: Vec<String>,
}

type AttemptHandle = Result<AttemptReport, CollectorError>;

/// Main fetch orchestrator
///
/// Every attempt runs as its own task and must hold a permit of the shared
/// semaphore while it talks to the network. A retry is a fresh task spawned
/// only once the previous attempt of the same job has been handled, so a
/// domain never has two attempts in flight.
pub struct FetchOrchestrator {
    config: FetchConfig,
    fetcher: Arc<dyn IconFetcher>,
    store: Arc<dyn IconStore>,
    classifier: ResponseClassifier,
    stats: Arc<RunStats>,
    permits: Arc<Semaphore>,
    in_flight: JoinSet<AttemptHandle>,
    since_barrier: usize,
}

impl FetchOrchestrator {
    /// Creates a new orchestrator
    ///
    /// # Arguments
    ///
    /// * `config` - Fetch configuration (parallelism, batch size, body cap)
    /// * `fetcher` - Network layer executing single attempts
    /// * `store` - Icon storage checked before and written after fetching
    pub fn new(
        config: FetchConfig,
        fetcher: Arc<dyn IconFetcher>,
        store: Arc<dyn IconStore>,
    ) -> Self {
        let classifier = ResponseClassifier::new(Arc::clone(&store), config.max_body_size);
        let permits = Arc::new(Semaphore::new(config.parallelism.max(1)));

        Self {
            config,
            fetcher,
            store,
            classifier,
            stats: Arc::new(RunStats::new()),
            permits,
            in_flight: JoinSet::new(),
            since_barrier: 0,
        }
    }

    /// Fetches icons for every registry domain that does not have one yet
    ///
    /// # Returns
    ///
    /// * `Ok(RunReport)` - All attempts finished
    /// * `Err(CollectorError)` - A fatal invariant violation; every pending
    ///   attempt has been cancelled
    pub async fn run(&mut self, registry: &DedupRegistry) -> Result<RunReport, CollectorError> {
        let started_at = Utc::now();
        self.stats.record_registry(&registry.stats());

        let result = self.crawl(registry).await;
        if result.is_err() {
            self.in_flight.abort_all();
        }
        result?;

        let stats = self.stats.snapshot();
        tracing::info!("Finished scraping");
        stats.log_summary();
        stats.log_details();

        Ok(RunReport {
            stats,
            started_at,
            finished_at: Utc::now(),
        })
    }

    async fn crawl(&mut self, registry: &DedupRegistry) -> Result<(), CollectorError> {
        for (domain, url) in registry.iter() {
            let planned = self.plan(domain, url);
            self.collect_finished()?;

            if planned {
                self.since_barrier += 1;
            }
            if self.config.batch_size > 0 && self.since_barrier >= self.config.batch_size {
                self.barrier().await?;
            }
        }

        let snapshot = self.stats.snapshot();
        snapshot.log_summary();
        tracing::info!("Waiting for scraping jobs to finish...");
        self.drain().await
    }

    /// Checks the destination of one domain and submits a job if needed
    ///
    /// Returns true when a job was submitted.
    fn plan(&mut self, domain: &str, url: &str) -> bool {
        let destination = self.store.destination(domain);

        match self.store.status(&destination) {
            IconStatus::Present => {
                self.stats.incr(Counter::Considered);
                self.stats.incr(Counter::Skipped);
                tracing::trace!("Icon for {} already present", domain);
                return false;
            }
            IconStatus::Unknown(e) => {
                self.stats.incr(Counter::StatError);
                tracing::error!("Failed to stat file '{}': {}", destination.display(), e);
                return false;
            }
            IconStatus::Missing => {}
        }

        self.stats.incr(Counter::Considered);

        // Fetch from the host as linked, not the sanitized one
        let Some(raw_domain) = extract_domain(url) else {
            tracing::warn!("Could not extract domain from URL: {}", url);
            return false;
        };

        let job = FetchJob::new(domain, raw_domain, destination);
        tracing::debug!("Planning scrape: {}", domain);
        self.submit(job);
        self.stats.incr(Counter::Planned);
        true
    }

    /// Spawns one attempt for `job`
    fn submit(&mut self, job: FetchJob) {
        let fetcher = Arc::clone(&self.fetcher);
        let classifier = self.classifier.clone();
        let permits = Arc::clone(&self.permits);

        self.in_flight.spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return Ok(AttemptReport {
                    job,
                    outcome: AttemptOutcome::Failed(FetchFailure::Transport {
                        error: "worker pool closed".to_string(),
                    }),
                });
            };
            run_attempt(job, fetcher.as_ref(), &classifier).await
        });
    }

    /// Blocks until every in-flight attempt, retries included, has finished
    async fn barrier(&mut self) -> Result<(), CollectorError> {
        let snapshot = self.stats.snapshot();
        tracing::info!(
            "{} requests issued, batch size {}, waiting for batch jobs to finish...",
            snapshot.considered,
            self.config.batch_size
        );
        snapshot.log_summary();

        self.drain().await?;
        self.since_barrier = 0;
        self.stats.incr(Counter::Barrier);
        Ok(())
    }

    async fn drain(&mut self) -> Result<(), CollectorError> {
        while let Some(joined) = self.in_flight.join_next().await {
            self.complete(joined)?;
        }
        Ok(())
    }

    /// Handles attempts that already finished without waiting for others
    fn collect_finished(&mut self) -> Result<(), CollectorError> {
        while let Some(joined) = self.in_flight.try_join_next() {
            self.complete(joined)?;
        }
        Ok(())
    }

    fn complete(&mut self, joined: Result<AttemptHandle, JoinError>) -> Result<(), CollectorError> {
        let report = match joined {
            Ok(Ok(report)) => report,
            Ok(Err(fatal)) => return Err(fatal),
            Err(e) => {
                tracing::error!("Fetch task ended abnormally: {}", e);
                self.stats.incr(Counter::Failed);
                return Ok(());
            }
        };

        let job = report.job;
        match report.outcome {
            AttemptOutcome::Saved => self.stats.incr(Counter::Succeeded),
            AttemptOutcome::Dropped => self.stats.incr(Counter::Dropped),
            AttemptOutcome::WriteFailed(e) => {
                tracing::error!(
                    "Failed to write icon '{}': {}",
                    job.destination.display(),
                    e
                );
                self.stats.incr(Counter::Failed);
            }
            AttemptOutcome::Failed(failure) => {
                tracing::debug!(
                    "Error during crawling for domain {} (attempt {}): {}",
                    job.sanitized_domain,
                    job.attempt.number,
                    failure
                );
                match on_failure(job, &failure) {
                    RetryDecision::Resubmit(next) => {
                        tracing::debug!(
                            "Retrying {} with {}://{}{}",
                            next.sanitized_domain,
                            next.attempt.scheme,
                            next.raw_domain,
                            next.attempt.path.as_path()
                        );
                        self.stats.incr(Counter::Resubmitted);
                        self.submit(next);
                    }
                    RetryDecision::Terminal(job) => {
                        tracing::debug!("Giving up on {}", job.sanitized_domain);
                        self.stats.incr(Counter::Failed);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Executes one attempt of `job` and classifies its result
async fn run_attempt(
    job: FetchJob,
    fetcher: &dyn IconFetcher,
    classifier: &ResponseClassifier,
) -> Result<AttemptReport, CollectorError> {
    let url = match job.request_url() {
        Ok(url) => url,
        Err(e) => {
            return Ok(AttemptReport {
                job,
                outcome: AttemptOutcome::Failed(FetchFailure::Transport {
                    error: format!("Invalid request URL: {}", e),
                }),
            });
        }
    };

    let request = IconRequest {
        url,
        origin: job.origin(),
    };
    tracing::trace!("Requesting {}", request.url);

    let outcome = match fetcher.fetch(&request).await {
        Ok(icon) => {
            tracing::debug!("Got response for URL {}", request.url);
            classifier.handle(&job, icon).await?
        }
        Err(failure) => AttemptOutcome::Failed(failure),
    };

    Ok(AttemptReport { job, outcome })
}

/// Lists what a run would fetch and skip, without issuing requests
pub fn preview(registry: &DedupRegistry, store: &dyn IconStore) -> RunPreview {
    let mut preview = RunPreview::default();

    for (domain, url) in registry.iter() {
        let destination = store.destination(domain);
        match store.status(&destination) {
            IconStatus::Present => preview.skipped.push(domain.to_string()),
            IconStatus::Unknown(_) => preview.unreadable.push(domain.to_string()),
            IconStatus::Missing => {
                if let Some(raw_domain) = extract_domain(url) {
                    let job = FetchJob::new(domain, raw_domain, destination);
                    if let Ok(request_url) = job.request_url() {
                        preview.planned.push((domain.to_string(), request_url.to_string()));
                    }
                }
            }
        }
    }

    preview.planned.sort();
    preview.skipped.sort();
    preview.unreadable.sort();
    preview
}
