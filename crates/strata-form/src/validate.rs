//! Validators and validation errors

use strata_sector::FieldValue;

/// A validator attached to one control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    /// The control must carry a non-empty value
    Required,
}

impl Validator {
    /// Apply the validator to a value
    #[must_use]
    pub fn check(&self, value: &FieldValue) -> Option<ValidationErrorKind> {
        match self {
            Validator::Required => {
                if value.is_falsy() {
                    Some(ValidationErrorKind::Required)
                } else {
                    None
                }
            }
        }
    }
}

/// Why a control failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A required value is missing or empty
    Required,
}

/// One failed control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Control name
    pub field: String,
    /// Failure kind
    pub kind: ValidationErrorKind,
}

/// Validation failures for a form, blocking submission
#[derive(Debug, thiserror::Error)]
#[error("validation failed for {} control(s)", errors.len())]
pub struct ValidationErrors {
    /// Failed controls, in control-name order
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Whether the named control failed
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}
