//! Query descriptors
//!
//! A [`QueryDescriptor`] is a value type: built once per row-fetch request,
//! never mutated, and serialized canonically so that semantically-equal
//! descriptors collide in the cache.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strata_sector::Sector;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

impl SortDirection {
    /// Wire form (`asc` / `desc`)
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Single-column sort specification
///
/// The host grid runs a single-column sort model; ties across columns are
/// not supported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field to sort on
    pub field: String,
    /// Direction
    pub direction: SortDirection,
}

/// Filter operators understood by the engine
///
/// `Contains` is the baseline operator both backends must support
/// identically; backends may additionally understand `Equals`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    /// Case-insensitive substring match
    Contains,
    /// Exact match
    Equals,
}

/// One filter predicate, applied to a named field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPredicate {
    /// Operator
    pub operator: FilterOperator,
    /// Operand
    pub value: String,
}

impl FilterPredicate {
    /// `contains` predicate shorthand
    #[inline]
    #[must_use]
    pub fn contains(value: impl Into<String>) -> Self {
        Self {
            operator: FilterOperator::Contains,
            value: value.into(),
        }
    }

    /// `equals` predicate shorthand
    #[inline]
    #[must_use]
    pub fn equals(value: impl Into<String>) -> Self {
        Self {
            operator: FilterOperator::Equals,
            value: value.into(),
        }
    }
}

/// Caller identity as supplied by the external permission collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerScope {
    /// Privileged callers see every row
    pub is_admin: bool,
    /// Identity used for the owner restriction on non-privileged callers
    pub current_user_id: u64,
}

impl CallerScope {
    /// Privileged scope
    #[inline]
    #[must_use]
    pub fn admin(current_user_id: u64) -> Self {
        Self {
            is_admin: true,
            current_user_id,
        }
    }

    /// Non-privileged scope; the builder injects an owner restriction
    #[inline]
    #[must_use]
    pub fn restricted(current_user_id: u64) -> Self {
        Self {
            is_admin: false,
            current_user_id,
        }
    }
}

/// Normalized description of one page request
///
/// Immutable once built. Filters live in a [`BTreeMap`] so that key order is
/// already normalized before serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    /// Active sector
    pub sector: Sector,
    /// 1-based page number
    pub page: u64,
    /// Rows per page; always positive
    pub page_size: u64,
    /// Optional single-column sort
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sort_by: Option<SortSpec>,
    /// Field-keyed filter predicates
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub filters: BTreeMap<String, FilterPredicate>,
    /// Owner restriction injected for non-privileged callers
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub restrict_to_owner_id: Option<u64>,
}

impl QueryDescriptor {
    /// Whether any filter predicates are active
    #[inline]
    #[must_use]
    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    /// Canonical serialization used as the cache key
    ///
    /// Object keys are emitted in lexicographic order (filter maps are
    /// `BTreeMap`s and the envelope is assembled through a sorted
    /// [`serde_json::Map`]), so two descriptors with identical semantic
    /// content always produce identical keys.
    #[must_use]
    pub fn canonical_key(&self) -> String {
        let mut root = serde_json::Map::new();
        root.insert("sector".to_string(), self.sector.key().into());
        root.insert("page".to_string(), self.page.into());
        root.insert("pageSize".to_string(), self.page_size.into());

        if let Some(sort) = &self.sort_by {
            let mut spec = serde_json::Map::new();
            spec.insert("field".to_string(), sort.field.clone().into());
            spec.insert("direction".to_string(), sort.direction.as_str().into());
            root.insert("sortBy".to_string(), spec.into());
        }

        if !self.filters.is_empty() {
            let mut filters = serde_json::Map::new();
            for (field, predicate) in &self.filters {
                let mut entry = serde_json::Map::new();
                let operator = match predicate.operator {
                    FilterOperator::Contains => "contains",
                    FilterOperator::Equals => "equals",
                };
                entry.insert("operator".to_string(), operator.into());
                entry.insert("value".to_string(), predicate.value.clone().into());
                filters.insert(field.clone(), entry.into());
            }
            root.insert("filters".to_string(), filters.into());
        }

        if let Some(owner) = self.restrict_to_owner_id {
            root.insert("restrictToOwnerId".to_string(), owner.into());
        }

        serde_json::Value::Object(root).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn descriptor_with_filters(filters: BTreeMap<String, FilterPredicate>) -> QueryDescriptor {
        QueryDescriptor {
            sector: Sector::Land,
            page: 1,
            page_size: 10,
            sort_by: None,
            filters,
            restrict_to_owner_id: None,
        }
    }

    #[test]
    fn canonical_key_ignores_filter_insertion_order() {
        let mut forward = BTreeMap::new();
        forward.insert("region".to_string(), FilterPredicate::contains("ikeja"));
        forward.insert("status".to_string(), FilterPredicate::contains("sold"));

        let mut reverse = BTreeMap::new();
        reverse.insert("status".to_string(), FilterPredicate::contains("sold"));
        reverse.insert("region".to_string(), FilterPredicate::contains("ikeja"));

        assert_eq!(
            descriptor_with_filters(forward).canonical_key(),
            descriptor_with_filters(reverse).canonical_key()
        );
    }

    #[test]
    fn canonical_key_distinguishes_semantic_differences() {
        let base = descriptor_with_filters(BTreeMap::new());
        let mut paged = base.clone();
        paged.page = 2;
        assert_ne!(base.canonical_key(), paged.canonical_key());

        let mut sorted = base.clone();
        sorted.sort_by = Some(SortSpec {
            field: "sale_price".to_string(),
            direction: SortDirection::Desc,
        });
        assert_ne!(base.canonical_key(), sorted.canonical_key());

        let mut scoped = base;
        scoped.restrict_to_owner_id = Some(7);
        assert_ne!(scoped.canonical_key(), descriptor_with_filters(BTreeMap::new()).canonical_key());
    }

    #[test]
    fn canonical_key_emits_sorted_object_keys() {
        let mut filters = BTreeMap::new();
        filters.insert("zeta".to_string(), FilterPredicate::contains("z"));
        filters.insert("alpha".to_string(), FilterPredicate::contains("a"));
        let key = descriptor_with_filters(filters).canonical_key();

        let alpha = key.find("\"alpha\"").unwrap();
        let zeta = key.find("\"zeta\"").unwrap();
        assert!(alpha < zeta, "keys must serialize lexicographically: {key}");
    }

    #[test]
    fn scope_constructors() {
        assert!(CallerScope::admin(1).is_admin);
        assert!(!CallerScope::restricted(1).is_admin);
    }

    proptest! {
        // Any permutation of the same filter set yields the same key.
        #[test]
        fn canonical_key_is_order_invariant(
            pairs in proptest::collection::btree_map(
                "[a-z_]{1,12}",
                "[a-zA-Z0-9 ]{0,12}",
                1..6,
            ),
        ) {
            let forward: BTreeMap<String, FilterPredicate> = pairs
                .iter()
                .map(|(f, v)| (f.clone(), FilterPredicate::contains(v.clone())))
                .collect();
            let reverse: BTreeMap<String, FilterPredicate> = pairs
                .iter()
                .rev()
                .map(|(f, v)| (f.clone(), FilterPredicate::contains(v.clone())))
                .collect();

            prop_assert_eq!(
                descriptor_with_filters(forward).canonical_key(),
                descriptor_with_filters(reverse).canonical_key()
            );
        }
    }
}
