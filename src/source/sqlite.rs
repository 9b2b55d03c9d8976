//! SQLite record source
//!
//! This module provides a read-only SQLite implementation of the
//! RecordSource trait over a Hacker News items table.

use crate::source::schema::STORY_URLS_SQL;
use crate::source::traits::{ItemFilter, RecordSource};
use crate::{SourceError, SourceResult};
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;

/// SQLite record source
pub struct SqliteSource {
    conn: Connection,
}

impl SqliteSource {
    /// Opens an existing items database read-only
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteSource)` - Successfully opened database
    /// * `Err(SourceError)` - The file is missing or could not be opened
    pub fn open(path: &Path) -> SourceResult<Self> {
        if !path.is_file() {
            return Err(SourceError::NotFound(path.to_path_buf()));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self { conn })
    }

    /// Wraps an already open connection
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }
}

impl RecordSource for SqliteSource {
    fn scan_urls(&self, filter: &ItemFilter, visit: &mut dyn FnMut(String)) -> SourceResult<u64> {
        // SQLite treats a negative LIMIT as "no limit"
        let limit = filter
            .limit
            .and_then(|l| i64::try_from(l).ok())
            .unwrap_or(-1);

        let mut stmt = self
            .conn
            .prepare(STORY_URLS_SQL)
            .map_err(SourceError::Query)?;
        let mut rows = stmt
            .query(params![filter.min_score, limit])
            .map_err(SourceError::Query)?;

        let mut visited = 0;
        while let Some(row) = rows.next().map_err(SourceError::Scan)? {
            let url: String = row.get(0).map_err(SourceError::Scan)?;
            visit(url);
            visited += 1;
        }

        Ok(visited)
    }
}
