//! Configuration module for Favicon Collector
//!
//! Settings come from built-in defaults, an optional TOML file, and
//! command-line overrides, in that order.
//!
//! # Example
//!
//! ```no_run
//! use favicon_collector::config::{load_config, validate};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("collector.toml")).unwrap();
//! validate(&config).unwrap();
//! println!("Icons go to: {}", config.fetch.output_dir.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetchConfig, SourceConfig, DEFAULT_MAX_BODY_SIZE, DEFAULT_USER_AGENT};

// Re-export parser functions
pub use parser::{load_config, load_validated_config};
pub use validation::validate;
