//! Strata Execution Backends
//!
//! Resolves a [`QueryDescriptor`](strata_query::QueryDescriptor) into rows,
//! either through a remote paged-fetch call or a local filter/sort pass over
//! an in-memory dataset. Both implementations conform to one result
//! contract and are selected once per controller construction, never
//! branched on inside orchestration logic.
//!
//! # Core Concepts
//!
//! - [`ExecutionBackend`]: the polymorphic seam
//! - [`RemoteBackend`]: paged HTTP fetch; the server has already applied
//!   sector/sort/filter/pagination
//! - [`LocalBackend`]: synchronous filter → stable sort → slice over
//!   immutable per-sector datasets
//! - [`FetchedPage`]: the `(rows, total_count)` result contract

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod backend;
mod local;
mod remote;

pub use backend::{BackendError, ExecutionBackend, FetchedPage};
pub use local::LocalBackend;
pub use remote::{RecordDetail, RemoteBackend, RemoteConfig};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
