//! Retry decisions for failed attempts
//!
//! Evaluated in a fixed priority order whenever an attempt ends in a non-2xx
//! status or a transport error:
//!
//! | Condition | Action |
//! |-----------|--------|
//! | HTTP 404 and no path retry yet | Resubmit with `/favicon.png`, same scheme |
//! | Scheme is https | Resubmit on http, same path |
//! | Otherwise | Terminal failure |
//!
//! The path retry and the scheme downgrade are independent, so a job makes at
//! most three attempts.

use crate::crawler::fetcher::FetchFailure;
use crate::state::{FetchJob, RetryState};

/// What to do with a job after a failed attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Dispatch the job again with the new attempt it carries
    Resubmit(FetchJob),

    /// No fallback left; the domain counts as failed
    Terminal(FetchJob),
}

/// Decides the next step for `job` after `failure`
pub fn on_failure(job: FetchJob, failure: &FetchFailure) -> RetryDecision {
    if failure.is_not_found() && job.retry_state == RetryState::Initial {
        return RetryDecision::Resubmit(FetchJob {
            attempt: job.attempt.with_alternate_path(),
            retry_state: RetryState::PathRetried,
            ..job
        });
    }

    if job.attempt.scheme.is_secure() {
        return RetryDecision::Resubmit(FetchJob {
            attempt: job.attempt.downgraded(),
            ..job
        });
    }

    RetryDecision::Terminal(job)
}
