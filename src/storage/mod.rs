//! Storage module for persisting fetched icons
//!
//! This module handles the on-disk side of the collector:
//! - Mapping sanitized domains to icon file paths
//! - Checking whether a domain was already captured
//! - Writing accepted icon bodies

mod filesystem;
mod traits;

pub use filesystem::FsIconStore;
pub use traits::{IconStatus, IconStore};

use crate::CollectorError;
use std::path::Path;

/// Opens the icon store at `path`, creating the directory if needed
///
/// # Returns
///
/// * `Ok(FsIconStore)` - Store ready for use
/// * `Err(CollectorError)` - The directory could not be created
pub fn open_store(path: &Path) -> Result<FsIconStore, CollectorError> {
    FsIconStore::create(path).map_err(|source| CollectorError::OutputDir {
        path: path.to_path_buf(),
        source,
    })
}
