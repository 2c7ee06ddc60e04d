//! Strata Sector Taxonomy
//!
//! The static classification layer shared by the grid engine and the form
//! schema engine.
//!
//! # Core Concepts
//!
//! - [`Sector`]: enumerated classification key (residential, land, hotel, ...)
//! - [`FieldDescriptor`]: per-sector field schema entry
//! - [`SectorCapabilities`]: per-sector boolean toggles for conditional
//!   validation
//! - [`SectorRegistry`]: immutable lookup from sector to schema
//! - [`Record`] / [`FieldValue`]: schema-less row representation
//!
//! The registry is defined at process start and never mutated afterwards, so
//! lookups are thread-safe by construction. Every sector key referenced by a
//! query or a form must resolve through the registry; unknown keys fail with
//! [`UnknownSectorError`].

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod capabilities;
mod field;
mod record;
mod registry;
mod sector;

pub use capabilities::SectorCapabilities;
pub use field::{FieldDescriptor, FieldKind};
pub use record::{FieldValue, Record};
pub use registry::{SectorRegistry, SectorSchema};
pub use sector::{Sector, UnknownSectorError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
