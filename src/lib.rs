//! Favicon Collector: per-domain favicon harvesting
//!
//! This crate reads story URLs from a Hacker News style SQLite database,
//! collapses them to one canonical domain each, and fetches a favicon for
//! every domain that does not have one on disk yet.

pub mod config;
pub mod crawler;
pub mod output;
pub mod registry;
pub mod source;
pub mod state;
pub mod storage;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Favicon Collector operations
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Record source error: {0}")]
    Source(#[from] SourceError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid fetch job for domain {domain}: {reason}")]
    InvalidJob { domain: String, reason: String },

    #[error("Failed to prepare output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CollectorError {
    /// Process exit code for this error
    ///
    /// Startup problems (configuration, unreadable input) exit with 1, scan
    /// failures and internal invariant violations exit with 2.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 1,
            Self::Source(e) => e.exit_code(),
            Self::InvalidJob { .. } => 2,
            Self::Reqwest(_) | Self::OutputDir { .. } | Self::Io(_) => 1,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No input database specified")]
    MissingInput,
}

/// Record source errors
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Input database not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to open input database {path}: {source}")]
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },

    #[error("Failed to execute select statement: {0}")]
    Query(rusqlite::Error),

    #[error("Failed to scan row: {0}")]
    Scan(rusqlite::Error),
}

impl SourceError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::NotFound(_) | Self::Open { .. } => 1,
            Self::Query(_) | Self::Scan(_) => 2,
        }
    }
}

/// Result type alias for Favicon Collector operations
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for record source operations
pub type SourceResult<T> = std::result::Result<T, SourceError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{FetchOrchestrator, RunReport};
pub use registry::DedupRegistry;
pub use state::{Attempt, FetchJob, PathVariant, RetryState, Scheme};
pub use crate::url::{extract_domain, extract_sanitized_domain, sanitize_domain};
