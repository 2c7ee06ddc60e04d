//! The execution backend contract

use async_trait::async_trait;
use strata_query::{FilterOperator, QueryDescriptor};
use strata_sector::Record;

/// One resolved page: rows plus the total count to report to the host
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchedPage {
    /// Rows in serving order
    pub rows: Vec<Record>,
    /// Total row count (see backend docs for the filtered-count semantics)
    pub total_count: u64,
}

/// Backend failures
///
/// The grid controller translates these into the host's failure callback;
/// they never cross the controller's public contract as errors.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The remote service could not be reached or answered abnormally
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote service answered 404 for the requested resource
    #[error("resource not found")]
    NotFound,

    /// The response payload could not be encoded or decoded
    #[error("payload codec failure: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Resolves descriptors into pages
///
/// Implementations may suspend the caller (remote) or complete
/// synchronously (local); the contract is identical either way.
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    /// Resolve one page for the descriptor
    ///
    /// # Errors
    /// Fails with [`BackendError`] when the page cannot be produced.
    async fn fetch(&self, descriptor: &QueryDescriptor) -> Result<FetchedPage, BackendError>;

    /// Filter operators this backend understands
    ///
    /// The descriptor builder drops predicates outside this set, so a
    /// backend never sees an operator it cannot evaluate.
    fn supported_operators(&self) -> &'static [FilterOperator];
}

impl FetchedPage {
    /// Page with no rows
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the page carries no rows
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
