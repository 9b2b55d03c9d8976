//! Record source traits
//!
//! This module defines the interface the collector reads story URLs through.

use crate::SourceResult;

/// Selection applied to the items table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemFilter {
    /// Stories must score strictly above this value
    pub min_score: i64,

    /// Maximum number of records, unlimited if `None`
    pub limit: Option<u64>,
}

impl Default for ItemFilter {
    fn default() -> Self {
        Self {
            min_score: 10,
            limit: None,
        }
    }
}

/// Trait for record source implementations
///
/// A source yields the URLs of live stories with a non-empty author and URL,
/// scoring above the filter's threshold, in ascending item id order.
pub trait RecordSource {
    /// Streams matching URLs to `visit` in source order
    ///
    /// # Returns
    ///
    /// The number of URLs visited
    fn scan_urls(&self, filter: &ItemFilter, visit: &mut dyn FnMut(String)) -> SourceResult<u64>;
}

/// Fixed URL list standing in for a database, already filtered by score
#[cfg(test)]
impl RecordSource for Vec<String> {
    fn scan_urls(&self, filter: &ItemFilter, visit: &mut dyn FnMut(String)) -> SourceResult<u64> {
        let limit = filter.limit.unwrap_or(u64::MAX);
        let mut visited = 0;
        for url in self.iter().take(usize::try_from(limit).unwrap_or(usize::MAX)) {
            visit(url.clone());
            visited += 1;
        }
        Ok(visited)
    }
}
