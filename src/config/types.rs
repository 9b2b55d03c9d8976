use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Browser-like user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/42.0.2311.135 Safari/537.36 Edge/12.246";

/// Maximum icon body size, 512 KiB
pub const DEFAULT_MAX_BODY_SIZE: usize = 512 * 1024;

/// Main configuration structure for Favicon Collector
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub fetch: FetchConfig,
}

/// Record source configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Path to the SQLite items database
    #[serde(rename = "database-path")]
    pub database_path: Option<PathBuf>,

    /// Only stories with a score strictly above this value are used
    #[serde(rename = "min-score")]
    pub min_score: i64,

    /// Maximum number of records to read, unlimited if absent
    pub limit: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            min_score: 10,
            limit: None,
        }
    }
}

/// Fetch behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Directory the `<domain>.ico` files are written to
    #[serde(rename = "output-dir")]
    pub output_dir: PathBuf,

    /// Maximum number of requests in flight across all domains
    pub parallelism: usize,

    /// Domains submitted between full drains, 0 disables the barrier
    #[serde(rename = "batch-size")]
    pub batch_size: usize,

    /// Response bodies are truncated to this many bytes
    #[serde(rename = "max-body-size")]
    pub max_body_size: usize,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl FetchConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("store"),
            parallelism: 100,
            batch_size: 0,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            request_timeout: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
