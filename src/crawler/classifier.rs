//! Response classification
//!
//! Decides what happens to a response that completed with a 2xx status and
//! writes accepted icons to storage.

use crate::crawler::fetcher::{FetchFailure, FetchedIcon};
use crate::state::FetchJob;
use crate::storage::IconStore;
use crate::CollectorError;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

/// Verdict on a successful response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Nothing to store
    Empty,

    /// Something whose content type mentions `image`
    Image,

    /// Anything whose content type does not mention `image`
    Unexpected { content_type: String },
}

/// Classifies a response by its body and content type
///
/// The content type check is an ASCII case-insensitive substring match on
/// `image`, so `image/x-icon`, `image/png;charset=binary` or `Image/GIF` all
/// qualify.
pub fn classify(icon: &FetchedIcon) -> Classification {
    if icon.body.is_empty() {
        return Classification::Empty;
    }

    let content_type = icon.content_type.as_deref().unwrap_or("");
    if content_type.to_ascii_lowercase().contains("image") {
        Classification::Image
    } else {
        Classification::Unexpected {
            content_type: content_type.to_string(),
        }
    }
}

/// What a completed attempt amounted to
#[derive(Debug)]
pub enum AttemptOutcome {
    /// The icon was written to the job's destination
    Saved,

    /// Empty or non-image response, dropped without counting
    Dropped,

    /// The icon was accepted but could not be written
    WriteFailed(io::Error),

    /// The request failed; the retry state machine decides what follows
    Failed(FetchFailure),
}

/// Classifies responses and persists the accepted ones
#[derive(Clone)]
pub struct ResponseClassifier {
    store: Arc<dyn IconStore>,
    max_body_size: usize,
}

impl ResponseClassifier {
    pub fn new(store: Arc<dyn IconStore>, max_body_size: usize) -> Self {
        Self {
            store,
            max_body_size,
        }
    }

    /// Handles a successful response for `job`
    ///
    /// Accepted icons are written on the blocking pool.
    ///
    /// # Errors
    ///
    /// Returns `CollectorError::InvalidJob` when an image is accepted for a
    /// job without a destination path. The caller must abort the run.
    pub async fn handle(
        &self,
        job: &FetchJob,
        icon: FetchedIcon,
    ) -> Result<AttemptOutcome, CollectorError> {
        let classification = classify(&icon);

        // Bodies are truncated at the cap, so a full body was probably cut short
        if classification != Classification::Empty && icon.body.len() == self.max_body_size {
            tracing::warn!(
                "Icon likely exceeds maximum size for domain {} ({} bytes)",
                job.sanitized_domain,
                self.max_body_size
            );
        }

        match classification {
            Classification::Empty => {
                tracing::debug!("Empty response for domain {}", job.sanitized_domain);
                Ok(AttemptOutcome::Dropped)
            }
            Classification::Unexpected { content_type } => {
                tracing::warn!(
                    "Got unexpected Content-Type for domain {}: {}",
                    job.sanitized_domain,
                    content_type
                );
                Ok(AttemptOutcome::Dropped)
            }
            Classification::Image => {
                if !job.has_destination() {
                    tracing::error!("Invalid context for domain {}", job.sanitized_domain);
                    return Err(CollectorError::InvalidJob {
                        domain: job.sanitized_domain.clone(),
                        reason: "missing destination path".to_string(),
                    });
                }

                match self.save(job.destination.clone(), icon.body).await {
                    Ok(()) => {
                        tracing::debug!(
                            "Saved icon for {} to {}",
                            job.sanitized_domain,
                            job.destination.display()
                        );
                        Ok(AttemptOutcome::Saved)
                    }
                    Err(e) => Ok(AttemptOutcome::WriteFailed(e)),
                }
            }
        }
    }

    async fn save(&self, destination: PathBuf, body: Vec<u8>) -> io::Result<()> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.save(&destination, &body))
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
    }
}
