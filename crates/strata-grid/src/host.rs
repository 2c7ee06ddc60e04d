//! Host-facing contract types

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use strata_query::{FilterRequest, SortRequest};
use strata_sector::Record;

/// One row-fetch request from the host grid widget
///
/// Mirrors the host's infinite-scroll block model. Pagination derives from
/// `start_row` and the controller's configured page size; `end_row` is
/// carried for contract fidelity (the host's block length always matches
/// the configured page size).
#[derive(Debug, Clone, Default)]
pub struct RowFetchRequest {
    /// Index of the first requested row
    pub start_row: u64,
    /// Index one past the last requested row
    pub end_row: u64,
    /// Active sort, at most one column
    pub sort_model: Option<SortRequest>,
    /// Active filters, keyed by field
    pub filter_model: BTreeMap<String, FilterRequest>,
}

/// One page served to the host
#[derive(Debug, Clone, PartialEq)]
pub struct ServedPage {
    /// Rows in serving order
    pub rows: Vec<Record>,
    /// Total row count to report to the host's scroll model
    pub total_count: u64,
    /// Whether the page came from the cache without a backend call
    pub from_cache: bool,
}

impl ServedPage {
    /// Zero rows: the host must render its explicit empty-state affordance
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Result of one row-fetch request, mirroring the host's
/// success/failure callback pair
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The page was resolved; zero rows still counts as served
    Served(ServedPage),
    /// The backend failed; the host shows an inline error, no retry here
    Failed,
}

impl FetchOutcome {
    /// The served page, if any
    #[inline]
    #[must_use]
    pub fn page(&self) -> Option<&ServedPage> {
        match self {
            FetchOutcome::Served(page) => Some(page),
            FetchOutcome::Failed => None,
        }
    }
}

/// Shared busy indicator
///
/// Asserted from descriptor construction through serving (or failure),
/// cleared when the controller returns to idle. The host renders its
/// loading affordance exactly while the flag is set.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    /// Whether a request is currently in flight
    #[inline]
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn set(&self, value: bool) {
        self.0.store(value, Ordering::Release);
    }
}
