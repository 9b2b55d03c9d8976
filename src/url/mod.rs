//! URL handling module for Favicon Collector
//!
//! This module provides domain extraction and the `www` sanitization that
//! turns a host into the key used for deduplication and storage.

mod domain;

// Re-export main functions
pub use domain::{extract_domain, extract_sanitized_domain, sanitize_domain};
