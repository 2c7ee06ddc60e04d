//! Query cache
//!
//! Maps canonical descriptor keys to previously resolved pages. Owned by one
//! grid controller and scoped to a single sector browsing session: entries
//! carry no TTL and no size bound, and the whole cache is dropped in bulk
//! when the active sector changes.

use crate::descriptor::QueryDescriptor;
use chrono::{DateTime, Utc};
use moka::sync::Cache;
use std::sync::Arc;
use strata_sector::Record;

/// One resolved page, stored immutably
///
/// A changed query always produces a new key; entries are never mutated
/// after insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Rows of the page, in serving order
    pub rows: Vec<Record>,
    /// Total row count reported alongside the page
    pub total_count: u64,
    /// Insertion timestamp
    pub created_at: DateTime<Utc>,
}

/// Canonical-key result cache
///
/// Concurrent writes for the same key are last-write-wins; results for an
/// identical descriptor are idempotent reads, so the race is benign.
#[derive(Debug, Clone)]
pub struct QueryCache {
    inner: Cache<String, Arc<CacheEntry>>,
}

impl QueryCache {
    /// Create an empty, unbounded cache
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Cache::builder().build(),
        }
    }

    /// Look up the page for a descriptor
    #[must_use]
    pub fn get(&self, descriptor: &QueryDescriptor) -> Option<Arc<CacheEntry>> {
        self.inner.get(&descriptor.canonical_key())
    }

    /// Store the page for a descriptor
    pub fn put(&self, descriptor: &QueryDescriptor, rows: Vec<Record>, total_count: u64) {
        let entry = CacheEntry {
            rows,
            total_count,
            created_at: Utc::now(),
        };
        self.inner.insert(descriptor.canonical_key(), Arc::new(entry));
    }

    /// Drop every entry (sector switch)
    pub fn clear(&self) {
        self.inner.invalidate_all();
    }

    /// Approximate number of live entries
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}
