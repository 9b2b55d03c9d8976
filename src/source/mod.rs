//! Record source module
//!
//! This module reads the ordered stream of story URLs the collector works
//! from. Only the URL column matters to the rest of the crate; selection and
//! ordering happen here.

mod schema;
mod sqlite;
mod traits;

pub use schema::{initialize_schema, ITEMS_SCHEMA_SQL, STORY_URLS_SQL};
pub use sqlite::SqliteSource;
pub use traits::{ItemFilter, RecordSource};

use crate::SourceResult;
use std::path::Path;

/// Opens the SQLite items database at `path`
///
/// # Returns
///
/// * `Ok(SqliteSource)` - Successfully opened source
/// * `Err(SourceError)` - The database is missing or unreadable
pub fn open_source(path: &Path) -> SourceResult<SqliteSource> {
    SqliteSource::open(path)
}
