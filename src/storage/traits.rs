//! Storage traits
//!
//! This module defines the interface for where icons are kept.

use std::io;
use std::path::{Path, PathBuf};

/// Result of checking whether a domain already has an icon
#[derive(Debug)]
pub enum IconStatus {
    /// An icon file exists; the domain must not be fetched again
    Present,

    /// No icon yet
    Missing,

    /// The check itself failed for a reason other than "not found"
    Unknown(io::Error),
}

/// Trait for icon storage backends
pub trait IconStore: Send + Sync {
    /// Path the icon for `domain` lives at
    fn destination(&self, domain: &str) -> PathBuf;

    /// Checks whether an icon is stored at `path`
    fn status(&self, path: &Path) -> IconStatus;

    /// Writes `bytes` verbatim to `path`, replacing any existing file
    fn save(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}
