//! Testing utilities for the strata workspace
//!
//! Shared fixtures: deterministic per-sector datasets, descriptor builders,
//! and a pre-loaded local backend.

#![allow(missing_docs)]

use std::collections::BTreeMap;
use strata_backend::LocalBackend;
use strata_query::QueryDescriptor;
use strata_sector::{FieldValue, Record, Sector};

const REGIONS: [&str; 5] = ["Ikeja", "Lekki", "Ikoyi", "Surulere", "Yaba"];
const STATUSES: [&str; 3] = ["Completed", "Under Construction", "Proposed"];

/// Deterministic dataset for a sector: `n` records with cycling regions,
/// statuses, and prices, owned alternately by users 1 and 2.
pub fn sample_records(sector: Sector, n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| {
            let mut record = Record::new();
            record.set(
                "property_code",
                format!("{}-{:04}", sector.key().to_uppercase(), i + 1),
            );
            record.set("region", REGIONS[i % REGIONS.len()]);
            record.set("status", STATUSES[i % STATUSES.len()]);
            record.set("sale_price", ((i % 7 + 1) * 50_000) as f64);
            record.set("updated_by_id", ((i % 2) + 1) as f64);
            record
        })
        .collect()
}

/// Record with the given fields, for hand-built fixtures.
pub fn record<const N: usize>(fields: [(&str, FieldValue); N]) -> Record {
    Record::from_fields(fields)
}

/// Local backend pre-loaded with [`sample_records`] for the sector.
pub fn loaded_local_backend(sector: Sector, n: usize) -> LocalBackend {
    LocalBackend::new().with_dataset(sector, sample_records(sector, n))
}

/// Bare descriptor with no sort, filters, or scope.
pub fn plain_descriptor(sector: Sector, page: u64, page_size: u64) -> QueryDescriptor {
    QueryDescriptor {
        sector,
        page,
        page_size,
        sort_by: None,
        filters: BTreeMap::new(),
        restrict_to_owner_id: None,
    }
}
