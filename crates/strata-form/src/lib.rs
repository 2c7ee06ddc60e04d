//! Strata Form Schema Engine
//!
//! Companion to the grid engine for create/edit forms: given a selected
//! sector, activates and deactivates controls and validators. The same
//! taxonomy that picks grid columns drives conditional validation here.
//!
//! # Core Concepts
//!
//! - [`SectorSelection`]: a registered sector or the `Unclassified`
//!   sentinel (distinct from every registered key)
//! - [`FormSchema`]: the active control set, recomputed on every sector
//!   change; validators for irrelevant fields are cleared, not hidden
//! - [`FormStateStore`]: external collaborator for session-scoped
//!   persistence of partially-filled forms
//!
//! Validation failures block submission locally; they are never propagated
//! to the grid.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod schema;
mod store;
mod validate;

pub use schema::{FormControl, FormSchema, SectorSelection};
pub use store::{FormSnapshot, FormStateStore, MemoryStateStore};
pub use validate::{FieldError, ValidationErrorKind, ValidationErrors, Validator};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
