//! Strata Query System
//!
//! Normalized page requests and the sector-session result cache.
//!
//! # Core Concepts
//!
//! - [`QueryDescriptor`]: immutable, canonically-serializable description of
//!   one page request (sector, pagination, sort, filters, scope)
//! - [`DescriptorBuilder`]: turns raw host grid events plus ambient context
//!   into a descriptor, enforcing scope injection and field validity
//! - [`QueryCache`]: maps canonical descriptor keys to resolved pages;
//!   cleared in bulk on sector switch
//!
//! Two descriptors with identical semantic content always produce identical
//! cache keys, regardless of filter insertion order.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod builder;
mod cache;
mod descriptor;

pub use builder::{BuildError, DescriptorBuilder, FilterRequest, RowWindow, SortRequest};
pub use cache::{CacheEntry, QueryCache};
pub use descriptor::{
    CallerScope, FilterOperator, FilterPredicate, QueryDescriptor, SortDirection, SortSpec,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
