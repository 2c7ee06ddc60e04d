//! Descriptor construction
//!
//! Turns raw host-grid pagination/sort/filter events plus ambient context
//! (sector key, caller scope) into a normalized [`QueryDescriptor`]. The
//! builder owns scope injection, not the backends, so every call path is
//! covered.

use crate::descriptor::{
    CallerScope, FilterOperator, FilterPredicate, QueryDescriptor, SortDirection, SortSpec,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use strata_sector::{SectorRegistry, UnknownSectorError};
use tracing::warn;

/// Raw pagination window from the host grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWindow {
    /// Index of the first requested row
    pub start_row: u64,
    /// Rows per page
    pub page_size: u64,
}

/// Raw sort request from the host grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortRequest {
    /// Column/field identifier
    pub field: String,
    /// Direction
    pub direction: SortDirection,
}

/// Raw filter request from the host grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRequest {
    /// Operator
    pub operator: FilterOperator,
    /// Operand
    pub value: String,
}

/// Descriptor construction failures
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The sector key is outside the registry
    #[error(transparent)]
    UnknownSector(#[from] UnknownSectorError),

    /// The host supplied a zero page size
    #[error("page size must be positive")]
    InvalidPageSize,
}

/// Builds normalized descriptors against a registry
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    registry: Arc<SectorRegistry>,
}

impl DescriptorBuilder {
    /// Create a builder over the given registry
    #[inline]
    #[must_use]
    pub fn new(registry: Arc<SectorRegistry>) -> Self {
        Self { registry }
    }

    /// Build a canonical descriptor
    ///
    /// # Rules
    /// - `page = start_row / page_size + 1`
    /// - filter fields absent from the sector schema are dropped, not fatal
    /// - operators the active backend does not understand are dropped
    /// - non-privileged scope injects an owner restriction unconditionally
    ///
    /// # Errors
    /// Fails with [`BuildError::UnknownSector`] when the key does not
    /// resolve; no descriptor is produced in that case. Fails with
    /// [`BuildError::InvalidPageSize`] on a zero window.
    pub fn build(
        &self,
        sector_key: &str,
        window: RowWindow,
        sort: Option<SortRequest>,
        filters: &BTreeMap<String, FilterRequest>,
        scope: CallerScope,
        supported_operators: &[FilterOperator],
    ) -> Result<QueryDescriptor, BuildError> {
        let sector = self.registry.resolve(sector_key)?;
        if window.page_size == 0 {
            return Err(BuildError::InvalidPageSize);
        }
        let schema = self.registry.schema_for(sector)?;

        let page = window.start_row / window.page_size + 1;

        let sort_by = sort.and_then(|request| {
            if schema.has_field(&request.field) {
                Some(SortSpec {
                    field: request.field,
                    direction: request.direction,
                })
            } else {
                warn!(sector = %sector, field = %request.field, "dropping sort on unknown field");
                None
            }
        });

        let mut retained = BTreeMap::new();
        for (field, request) in filters {
            if !schema.has_field(field) {
                warn!(sector = %sector, field = %field, "dropping filter on unknown field");
                continue;
            }
            if !supported_operators.contains(&request.operator) {
                warn!(
                    sector = %sector,
                    field = %field,
                    operator = ?request.operator,
                    "dropping filter with unsupported operator"
                );
                continue;
            }
            retained.insert(
                field.clone(),
                FilterPredicate {
                    operator: request.operator,
                    value: request.value.clone(),
                },
            );
        }

        let restrict_to_owner_id = if scope.is_admin {
            None
        } else {
            Some(scope.current_user_id)
        };

        Ok(QueryDescriptor {
            sector,
            page,
            page_size: window.page_size,
            sort_by,
            filters: retained,
            restrict_to_owner_id,
        })
    }
}
