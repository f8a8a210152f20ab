//! Rule for relationship values: identifier shape checks.
//!
//! A relationship is a reference by identifier; whether the referenced
//! instance exists is a storage-layer concern and is never checked here.

use crate::model::FieldPattern;
use crate::validation::error::{ValidationError, ValidationErrorKind};
use serde_json::Value;

/// Checks one relationship value: a non-empty identifier string, or the
/// `resource:<fqn>#<id>` URI form of which only the `<id>` part is
/// shape-checked. The target's identifying-field regex, captured at
/// resolve time, is applied when present.
pub fn check_reference(
    class: &str,
    path: &str,
    target: &str,
    target_id_regex: Option<&FieldPattern>,
    value: &Value,
) -> Option<ValidationError> {
    let Some(raw) = value.as_str() else {
        return Some(ValidationError::new(
            class,
            path,
            ValidationErrorKind::TypeMismatch,
            format!("expected an identifier string referencing {target}, found {value}"),
        ));
    };

    let identifier = match raw.strip_prefix("resource:") {
        Some(rest) => match rest.rsplit_once('#') {
            Some((_, id)) => id,
            None => {
                return Some(ValidationError::new(
                    class,
                    path,
                    ValidationErrorKind::TypeMismatch,
                    format!("malformed resource URI '{raw}' (missing '#<identifier>')"),
                ));
            }
        },
        None => raw,
    };

    if identifier.is_empty() {
        return Some(ValidationError::new(
            class,
            path,
            ValidationErrorKind::TypeMismatch,
            format!("empty identifier referencing {target}"),
        ));
    }
    if let Some(pattern) = target_id_regex {
        if !pattern.matches(identifier) {
            return Some(ValidationError::new(
                class,
                path,
                ValidationErrorKind::RegexViolation,
                format!(
                    "identifier '{identifier}' does not match the identifying-field \
                     regex /{}/ of {target}",
                    pattern.pattern
                ),
            ));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!("ABC123"), None)]
    #[case(json!("resource:org.a.Car#ABC123"), None)]
    #[case(json!(""), Some(ValidationErrorKind::TypeMismatch))]
    #[case(json!("resource:org.a.Car"), Some(ValidationErrorKind::TypeMismatch))]
    #[case(json!(42), Some(ValidationErrorKind::TypeMismatch))]
    fn identifier_shape(
        #[case] value: serde_json::Value,
        #[case] expected: Option<ValidationErrorKind>,
    ) {
        let result = check_reference("org.a.Sale", "car", "org.a.Car", None, &value);
        assert_eq!(result.map(|e| e.kind), expected);
    }

    #[rstest]
    #[case(json!("ABC123"), None)]
    #[case(json!("resource:org.a.Car#ABC123"), None)]
    #[case(json!("abc"), Some(ValidationErrorKind::RegexViolation))]
    #[case(json!("resource:org.a.Car#abc"), Some(ValidationErrorKind::RegexViolation))]
    fn target_identifier_regex_is_applied(
        #[case] value: serde_json::Value,
        #[case] expected: Option<ValidationErrorKind>,
    ) {
        let pattern = FieldPattern::compile(r"[A-Z]{3}\d{3}").unwrap();
        let result = check_reference("org.a.Sale", "car", "org.a.Car", Some(&pattern), &value);
        assert_eq!(result.map(|e| e.kind), expected);
    }
}
