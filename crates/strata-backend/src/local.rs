//! Local in-memory backend
//!
//! Operates over pre-loaded per-sector datasets, treated as immutable for
//! the duration of one sector session. Filtering is fail-closed: a record
//! with a falsy or missing value for a filtered field is excluded no matter
//! the operator.

use crate::backend::{BackendError, ExecutionBackend, FetchedPage};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use strata_query::{FilterOperator, FilterPredicate, QueryDescriptor, SortDirection};
use strata_sector::{FieldValue, Record, Sector};
use tracing::debug;

/// Field matched against the injected owner restriction
const OWNER_FIELD: &str = "updated_by_id";

/// In-memory execution backend
#[derive(Debug, Clone, Default)]
pub struct LocalBackend {
    datasets: HashMap<Sector, Arc<Vec<Record>>>,
}

impl LocalBackend {
    /// Create a backend with no datasets
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the dataset for a sector
    #[must_use]
    pub fn with_dataset(mut self, sector: Sector, rows: Vec<Record>) -> Self {
        self.datasets.insert(sector, Arc::new(rows));
        self
    }

    /// Number of loaded records for a sector
    #[must_use]
    pub fn dataset_len(&self, sector: Sector) -> usize {
        self.datasets.get(&sector).map_or(0, |rows| rows.len())
    }

    fn record_matches(record: &Record, field: &str, predicate: &FilterPredicate) -> bool {
        let Some(value) = record.get(field) else {
            return false;
        };
        if value.is_falsy() {
            return false;
        }
        match predicate.operator {
            FilterOperator::Contains => value
                .filter_text()
                .to_lowercase()
                .contains(&predicate.value.to_lowercase()),
            FilterOperator::Equals => value.filter_text() == predicate.value,
        }
    }

    fn owner_matches(record: &Record, owner_id: u64) -> bool {
        match record.get(OWNER_FIELD) {
            #[allow(clippy::cast_precision_loss)]
            Some(FieldValue::Number(n)) => *n == owner_id as f64,
            _ => false,
        }
    }

    fn resolve(descriptor: &QueryDescriptor, dataset: &[Record]) -> FetchedPage {
        let mut filtered: Vec<Record> = dataset
            .iter()
            .filter(|record| {
                if let Some(owner_id) = descriptor.restrict_to_owner_id {
                    if !Self::owner_matches(record, owner_id) {
                        return false;
                    }
                }
                descriptor
                    .filters
                    .iter()
                    .all(|(field, predicate)| Self::record_matches(record, field, predicate))
            })
            .cloned()
            .collect();

        if let Some(sort) = &descriptor.sort_by {
            // Stable sort; records with equal (or incomparable) keys keep
            // their relative input order.
            filtered.sort_by(|a, b| {
                let ordering = match (a.get(&sort.field), b.get(&sort.field)) {
                    (Some(left), Some(right)) => left.natural_cmp(right),
                    _ => std::cmp::Ordering::Equal,
                };
                match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        let total_count = filtered.len() as u64;

        let start = usize::try_from(
            descriptor
                .page
                .saturating_sub(1)
                .saturating_mul(descriptor.page_size),
        )
        .unwrap_or(usize::MAX);
        let end = usize::try_from(descriptor.page.saturating_mul(descriptor.page_size))
            .unwrap_or(usize::MAX);
        let rows = if start >= filtered.len() {
            Vec::new()
        } else {
            filtered[start..end.min(filtered.len())].to_vec()
        };

        FetchedPage { rows, total_count }
    }
}

#[async_trait]
impl ExecutionBackend for LocalBackend {
    async fn fetch(&self, descriptor: &QueryDescriptor) -> Result<FetchedPage, BackendError> {
        let Some(dataset) = self.datasets.get(&descriptor.sector) else {
            debug!(sector = %descriptor.sector, "no local dataset loaded; serving empty page");
            return Ok(FetchedPage::empty());
        };
        Ok(Self::resolve(descriptor, dataset))
    }

    fn supported_operators(&self) -> &'static [FilterOperator] {
        &[FilterOperator::Contains]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use strata_query::SortSpec;

    fn record(code: &str, region: &str, price: f64) -> Record {
        Record::from_fields([
            ("property_code", FieldValue::from(code)),
            ("region", FieldValue::from(region)),
            ("sale_price", FieldValue::from(price)),
        ])
    }

    fn dataset() -> Vec<Record> {
        vec![
            record("PC-1", "Ikeja", 300.0),
            record("PC-2", "Lekki", 100.0),
            record("PC-3", "Ikoyi", 200.0),
            record("PC-4", "Ikeja", 100.0),
            record("PC-5", "Surulere", 400.0),
        ]
    }

    fn backend() -> LocalBackend {
        LocalBackend::new().with_dataset(Sector::Land, dataset())
    }

    fn descriptor(page: u64, page_size: u64) -> QueryDescriptor {
        QueryDescriptor {
            sector: Sector::Land,
            page,
            page_size,
            sort_by: None,
            filters: BTreeMap::new(),
            restrict_to_owner_id: None,
        }
    }

    fn codes(page: &FetchedPage) -> Vec<String> {
        page.rows
            .iter()
            .map(|r| r.get("property_code").unwrap().filter_text())
            .collect()
    }

    #[tokio::test]
    async fn unfiltered_page_reports_dataset_total() {
        let page = backend().fetch(&descriptor(1, 2)).await.unwrap();
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.total_count, 5);
    }

    #[tokio::test]
    async fn fetch_is_idempotent() {
        let b = backend();
        let d = descriptor(1, 3);
        let first = b.fetch(&d).await.unwrap();
        let second = b.fetch(&d).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn pages_reassemble_the_full_dataset() {
        let b = backend();
        let page_size = 2;
        let mut seen = Vec::new();
        for page in 1..=3 {
            let result = b.fetch(&descriptor(page, page_size)).await.unwrap();
            seen.extend(codes(&result));
        }
        assert_eq!(seen, vec!["PC-1", "PC-2", "PC-3", "PC-4", "PC-5"]);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let page = backend().fetch(&descriptor(4, 2)).await.unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total_count, 5);
    }

    #[tokio::test]
    async fn contains_filter_is_case_insensitive() {
        let mut d = descriptor(1, 10);
        d.filters
            .insert("region".to_string(), FilterPredicate::contains("IKE"));
        let page = backend().fetch(&d).await.unwrap();
        assert_eq!(codes(&page), vec!["PC-1", "PC-4"]);
        assert_eq!(page.total_count, 2);
    }

    #[tokio::test]
    async fn filtered_total_is_the_pre_pagination_count() {
        let mut d = descriptor(1, 1);
        d.filters
            .insert("region".to_string(), FilterPredicate::contains("ike"));
        let page = backend().fetch(&d).await.unwrap();
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.total_count, 2);
    }

    #[tokio::test]
    async fn missing_field_fails_closed() {
        let mut rows = dataset();
        let mut no_region = Record::new();
        no_region.set("property_code", "PC-X");
        rows.push(no_region);
        let b = LocalBackend::new().with_dataset(Sector::Land, rows);

        let mut d = descriptor(1, 10);
        // An empty needle would match every non-falsy value.
        d.filters
            .insert("region".to_string(), FilterPredicate::contains(""));
        let page = b.fetch(&d).await.unwrap();
        assert!(!codes(&page).contains(&"PC-X".to_string()));
        assert_eq!(page.total_count, 5);
    }

    #[tokio::test]
    async fn falsy_values_fail_closed() {
        let rows = vec![
            Record::from_fields([("region", FieldValue::Text(String::new()))]),
            Record::from_fields([("region", FieldValue::Null)]),
            Record::from_fields([("region", FieldValue::from("Ikeja"))]),
        ];
        let b = LocalBackend::new().with_dataset(Sector::Land, rows);

        let mut d = descriptor(1, 10);
        d.filters
            .insert("region".to_string(), FilterPredicate::contains(""));
        let page = b.fetch(&d).await.unwrap();
        assert_eq!(page.total_count, 1);
    }

    #[tokio::test]
    async fn sort_ascending_and_descending() {
        let b = backend();

        let mut d = descriptor(1, 10);
        d.sort_by = Some(SortSpec {
            field: "sale_price".to_string(),
            direction: SortDirection::Asc,
        });
        let asc = b.fetch(&d).await.unwrap();
        assert_eq!(codes(&asc), vec!["PC-2", "PC-4", "PC-3", "PC-1", "PC-5"]);

        d.sort_by = Some(SortSpec {
            field: "sale_price".to_string(),
            direction: SortDirection::Desc,
        });
        let desc = b.fetch(&d).await.unwrap();
        assert_eq!(codes(&desc), vec!["PC-5", "PC-1", "PC-3", "PC-2", "PC-4"]);
    }

    #[tokio::test]
    async fn sort_is_stable_for_equal_keys() {
        // PC-2 and PC-4 share sale_price = 100; input order must survive in
        // both directions.
        let b = backend();
        let mut d = descriptor(1, 10);

        d.sort_by = Some(SortSpec {
            field: "sale_price".to_string(),
            direction: SortDirection::Asc,
        });
        let asc = codes(&b.fetch(&d).await.unwrap());
        let asc_pair: Vec<_> = asc.iter().filter(|c| *c == "PC-2" || *c == "PC-4").collect();
        assert_eq!(asc_pair, vec!["PC-2", "PC-4"]);

        d.sort_by = Some(SortSpec {
            field: "sale_price".to_string(),
            direction: SortDirection::Desc,
        });
        let desc = codes(&b.fetch(&d).await.unwrap());
        let desc_pair: Vec<_> = desc.iter().filter(|c| *c == "PC-2" || *c == "PC-4").collect();
        assert_eq!(desc_pair, vec!["PC-2", "PC-4"]);
    }

    #[tokio::test]
    async fn filter_then_sort_then_paginate() {
        let b = backend();
        let mut d = descriptor(2, 1);
        d.filters
            .insert("region".to_string(), FilterPredicate::contains("ike"));
        d.sort_by = Some(SortSpec {
            field: "sale_price".to_string(),
            direction: SortDirection::Desc,
        });
        let page = b.fetch(&d).await.unwrap();
        // Filtered: PC-1 (300), PC-4 (100); sorted desc; page 2 of size 1.
        assert_eq!(codes(&page), vec!["PC-4"]);
        assert_eq!(page.total_count, 2);
    }

    #[tokio::test]
    async fn owner_restriction_is_fail_closed() {
        let rows = vec![
            Record::from_fields([
                ("property_code", FieldValue::from("PC-1")),
                ("updated_by_id", FieldValue::from(7.0)),
            ]),
            Record::from_fields([
                ("property_code", FieldValue::from("PC-2")),
                ("updated_by_id", FieldValue::from(8.0)),
            ]),
            // No owner field at all: excluded under restriction.
            Record::from_fields([("property_code", FieldValue::from("PC-3"))]),
        ];
        let b = LocalBackend::new().with_dataset(Sector::Land, rows);

        let mut d = descriptor(1, 10);
        d.restrict_to_owner_id = Some(7);
        let page = b.fetch(&d).await.unwrap();
        assert_eq!(codes(&page), vec!["PC-1"]);
        assert_eq!(page.total_count, 1);
    }

    #[tokio::test]
    async fn missing_dataset_serves_empty_page() {
        let b = LocalBackend::new();
        let page = b.fetch(&descriptor(1, 10)).await.unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total_count, 0);
    }

    #[test]
    fn supports_contains_only() {
        assert_eq!(
            LocalBackend::new().supported_operators(),
            &[FilterOperator::Contains]
        );
    }
}
