//! Defines the error types for the validation module.
use thiserror::Error;

/// The specific category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A mandatory property was not supplied and has no default.
    MissingRequired,
    /// The supplied value's representation does not fit the property kind.
    TypeMismatch,
    /// A String value did not fully match the field's regex.
    RegexViolation,
    /// A numeric value fell outside the field's inclusive range.
    RangeViolation,
    /// A value was not one of the enum's declared literals.
    EnumViolation,
    /// The instance carries a field no declaration in the chain declares.
    UnknownField,
    /// The validated declaration is abstract.
    InstantiateAbstract,
}

/// One violated field of one instance.
///
/// Validation collects these rather than failing on the first violation,
/// so a caller sees the complete set of problems in one call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{class}#{field}: {message}")]
pub struct ValidationError {
    /// Fully-qualified name of the declaration being validated against.
    pub class: String,
    /// Path of the offending field; array elements are indexed (`a[2]`).
    pub field: String,
    pub kind: ValidationErrorKind,
    /// A human-readable message explaining the violation.
    pub message: String,
}

impl ValidationError {
    pub fn new(
        class: &str,
        field: &str,
        kind: ValidationErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            class: class.to_string(),
            field: field.to_string(),
            kind,
            message: message.into(),
        }
    }
}
