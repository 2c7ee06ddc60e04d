//! Field descriptors
//!
//! A [`FieldDescriptor`] drives both grid column presence and form validator
//! attachment. Descriptors are static data, loaded once with the registry.

use serde::{Deserialize, Serialize};

/// Value kind of a field
///
/// Determines natural ordering for sorts and rendering hints for the host
/// grid (currency columns are right-aligned in the original dashboards).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text
    Text,
    /// Numeric value
    Number,
    /// Monetary amount
    Currency,
}

/// Schema entry for one field of a sector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Stable field name, used as the record key and filter/sort target
    pub name: String,
    /// Human-facing column/label text
    pub display_label: String,
    /// Whether the form engine attaches a required validator by default
    pub required: bool,
    /// Value kind
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Create a new descriptor
    #[inline]
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        display_label: impl Into<String>,
        required: bool,
        kind: FieldKind,
    ) -> Self {
        Self {
            name: name.into(),
            display_label: display_label.into(),
            required,
            kind,
        }
    }

    /// Optional text field shorthand
    #[inline]
    #[must_use]
    pub fn text(name: &str, display_label: &str) -> Self {
        Self::new(name, display_label, false, FieldKind::Text)
    }

    /// Optional numeric field shorthand
    #[inline]
    #[must_use]
    pub fn number(name: &str, display_label: &str) -> Self {
        Self::new(name, display_label, false, FieldKind::Number)
    }

    /// Optional currency field shorthand
    #[inline]
    #[must_use]
    pub fn currency(name: &str, display_label: &str) -> Self {
        Self::new(name, display_label, false, FieldKind::Currency)
    }

    /// Mark this field as required
    #[inline]
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}
