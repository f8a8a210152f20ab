//! Rules for scalar field values: primitive representation, regex, range,
//! and enum membership.

use crate::model::{NumericRange, PropertyKind};
use crate::validation::error::{ValidationError, ValidationErrorKind};
use serde_json::Value;

/// Checks one non-relationship value against its resolved kind.
///
/// `path` is the field path reported on failure; array elements arrive
/// here one at a time with an indexed path.
pub fn check_scalar(
    class: &str,
    path: &str,
    kind: &PropertyKind,
    value: &Value,
) -> Option<ValidationError> {
    match kind {
        PropertyKind::String { regex } => {
            let Some(s) = value.as_str() else {
                return Some(mismatch(class, path, "a string", value));
            };
            if let Some(pattern) = regex {
                if !pattern.matches(s) {
                    return Some(ValidationError::new(
                        class,
                        path,
                        ValidationErrorKind::RegexViolation,
                        format!("'{s}' does not match regex /{}/", pattern.pattern),
                    ));
                }
            }
            None
        }
        PropertyKind::Integer { range } | PropertyKind::Long { range } => {
            let Some(n) = value.as_i64() else {
                return Some(mismatch(class, path, "an integer", value));
            };
            check_range(class, path, range, n as f64)
        }
        PropertyKind::Double { range } => {
            let Some(n) = value.as_f64() else {
                return Some(mismatch(class, path, "a number", value));
            };
            check_range(class, path, range, n)
        }
        PropertyKind::Boolean => {
            if value.is_boolean() {
                None
            } else {
                Some(mismatch(class, path, "a boolean", value))
            }
        }
        PropertyKind::DateTime => {
            let Some(s) = value.as_str() else {
                return Some(mismatch(class, path, "an RFC 3339 date-time string", value));
            };
            if chrono::DateTime::parse_from_rfc3339(s).is_err() {
                return Some(mismatch(class, path, "an RFC 3339 date-time string", value));
            }
            None
        }
        PropertyKind::Enum { fqn, literals } => {
            let Some(s) = value.as_str() else {
                return Some(mismatch(class, path, &format!("a literal of {fqn}"), value));
            };
            if literals.iter().any(|l| l == s) {
                None
            } else {
                Some(ValidationError::new(
                    class,
                    path,
                    ValidationErrorKind::EnumViolation,
                    format!("'{s}' is not a literal of {fqn} (expected one of {literals:?})"),
                ))
            }
        }
        PropertyKind::Relationship { .. } => {
            unreachable!("relationship values are checked by the relation rule")
        }
    }
}

fn check_range(
    class: &str,
    path: &str,
    range: &Option<NumericRange>,
    value: f64,
) -> Option<ValidationError> {
    let range = range.as_ref()?;
    if range.contains(value) {
        return None;
    }
    let lower = range.lower.map_or("unbounded".to_string(), |v| v.to_string());
    let upper = range.upper.map_or("unbounded".to_string(), |v| v.to_string());
    Some(ValidationError::new(
        class,
        path,
        ValidationErrorKind::RangeViolation,
        format!("{value} is outside the inclusive range [{lower}, {upper}]"),
    ))
}

fn mismatch(class: &str, path: &str, expected: &str, value: &Value) -> ValidationError {
    ValidationError::new(
        class,
        path,
        ValidationErrorKind::TypeMismatch,
        format!("expected {expected}, found {value}"),
    )
}
