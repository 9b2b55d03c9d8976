//! Domain deduplication registry
//!
//! The registry consumes the record stream once, in order, and keeps the
//! first URL seen for every sanitized domain.

use crate::source::{ItemFilter, RecordSource};
use crate::url::extract_sanitized_domain;
use crate::SourceResult;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Counters gathered while building the registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Records scanned, including the ones without a usable domain
    pub rows: u64,

    /// Distinct sanitized domains
    pub entries: u64,

    /// Records whose domain was already registered
    pub duplicates: u64,

    /// Records skipped because no domain could be extracted
    pub invalid: u64,
}

/// Mapping from sanitized domain to its representative URL
#[derive(Debug, Default)]
pub struct DedupRegistry {
    domains: HashMap<String, String>,
    stats: RegistryStats,
}

impl DedupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from every URL the source yields for `filter`
    pub fn from_source(source: &dyn RecordSource, filter: &ItemFilter) -> SourceResult<Self> {
        let mut registry = Self::new();
        source.scan_urls(filter, &mut |url| registry.record(url))?;

        if registry.stats.rows == 0 {
            tracing::info!("No items found");
        } else {
            tracing::info!("Parsed {} rows", registry.stats.rows);
        }

        Ok(registry)
    }

    /// Registers one source URL
    ///
    /// The first URL for a sanitized domain wins; later ones only bump the
    /// duplicate counter.
    pub fn record(&mut self, url: String) {
        self.stats.rows += 1;

        let Some(domain) = extract_sanitized_domain(&url) else {
            tracing::warn!("Could not extract domain from URL: {}", url);
            self.stats.invalid += 1;
            return;
        };

        match self.domains.entry(domain) {
            Entry::Occupied(_) => self.stats.duplicates += 1,
            Entry::Vacant(slot) => {
                slot.insert(url);
                self.stats.entries += 1;
            }
        }
    }

    /// Representative URL for a sanitized domain
    pub fn get(&self, domain: &str) -> Option<&str> {
        self.domains.get(domain).map(String::as_str)
    }

    /// Iterates over `(sanitized domain, URL)` pairs in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.domains.iter().map(|(d, u)| (d.as_str(), u.as_str()))
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn stats(&self) -> RegistryStats {
        self.stats
    }
}

impl FromIterator<String> for DedupRegistry {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut registry = Self::new();
        for url in iter {
            registry.record(url);
        }
        registry
    }
}
