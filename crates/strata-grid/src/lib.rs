//! Strata Grid Controller
//!
//! Per-session orchestration of the query pipeline: receive a host row-fetch
//! request, build a descriptor, check the cache, execute the backend on a
//! miss, populate the cache, and serve the page back to the host.
//!
//! # Core Concepts
//!
//! - [`GridController`]: owns the cache, the chosen backend, and the active
//!   sector; constructed per view/session and disposed with it
//! - [`RowFetchRequest`] / [`FetchOutcome`]: the host row-fetch contract
//! - [`LoadingFlag`]: shared busy indicator, asserted for the whole request
//!   lifecycle
//!
//! Backend failures never escape as errors; they are translated into
//! [`FetchOutcome::Failed`], mirroring the host's failure callback. Only
//! descriptor-build failures (a malformed sector key) surface as
//! [`GridError`].

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod controller;
mod host;

pub use controller::{GridController, GridError};
pub use host::{FetchOutcome, LoadingFlag, RowFetchRequest, ServedPage};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
