//! Per-sector capability records
//!
//! Conditional form validation is table-driven: each sector maps to a small
//! record of boolean toggles instead of a chain of key comparisons.

use crate::sector::Sector;
use serde::{Deserialize, Serialize};

/// Boolean toggles controlling conditional form validation for one sector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorCapabilities {
    /// Whether the construction-status field carries a required validator
    pub requires_status: bool,
    /// Whether the unit-count field carries a required validator
    pub requires_unit_count: bool,
    /// Whether the size field carries a required validator
    pub requires_size: bool,
}

impl SectorCapabilities {
    /// Built-in toggle table
    ///
    /// Land is exempt from construction status; residential requires a unit
    /// count and exempts size; every other sector requires status and size
    /// and exempts unit count.
    #[must_use]
    pub fn for_sector(sector: Sector) -> Self {
        match sector {
            Sector::Land => Self {
                requires_status: false,
                requires_unit_count: false,
                requires_size: true,
            },
            Sector::Residential => Self {
                requires_status: true,
                requires_unit_count: true,
                requires_size: false,
            },
            _ => Self {
                requires_status: true,
                requires_unit_count: false,
                requires_size: true,
            },
        }
    }
}
