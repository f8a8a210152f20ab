//! Resolved field metadata: kinds, validators, defaults.
//!
//! Validators are a tagged variant per field rather than per-kind subtypes,
//! so the instance validator dispatches on them uniformly. Everything a
//! validation call needs (enum literals, the relationship target's
//! identifier pattern) is copied in here at resolve time, keeping
//! validation free of lookups.

use regex::Regex;
use serde::Serialize;

/// A field regex, compiled once at resolve time.
///
/// The compiled form is anchored (`^(?:pat)$`) because a field pattern must
/// match the whole value; `pattern` keeps the text as written for error
/// messages and display.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    pub pattern: String,
    compiled: Regex,
}

impl FieldPattern {
    pub fn compile(pattern: &str) -> Result<Self, regex::Error> {
        let compiled = Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(Self {
            pattern: pattern.to_string(),
            compiled,
        })
    }

    pub fn matches(&self, value: &str) -> bool {
        self.compiled.is_match(value)
    }
}

impl PartialEq for FieldPattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Serialize for FieldPattern {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.pattern)
    }
}

/// An inclusive numeric range; an omitted bound is unconstrained on that
/// side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericRange {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl NumericRange {
    pub fn contains(&self, value: f64) -> bool {
        self.lower.is_none_or(|lo| value >= lo) && self.upper.is_none_or(|hi| value <= hi)
    }
}

/// A resolved default value, type-checked against its field at resolve time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DefaultValue {
    String(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
    DateTime(String),
    /// One of the target enum's literals.
    EnumLiteral(String),
}

/// The resolved kind of a field, with its validator baked in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PropertyKind {
    String { regex: Option<FieldPattern> },
    Integer { range: Option<NumericRange> },
    Long { range: Option<NumericRange> },
    Double { range: Option<NumericRange> },
    Boolean,
    DateTime,
    Enum {
        /// Fully-qualified name of the enum declaration.
        fqn: String,
        /// The declared literals, copied so validation needs no lookup.
        literals: Vec<String>,
    },
    Relationship {
        /// Fully-qualified name of the (identifiable) target class.
        target: String,
        /// The target's identifying-field regex, if it carries one; applied
        /// to referenced identifiers at validation time.
        target_id_regex: Option<FieldPattern>,
    },
}

impl PropertyKind {
    /// Short name used in type-mismatch messages and display output.
    pub fn describe(&self) -> String {
        match self {
            PropertyKind::String { .. } => "String".to_string(),
            PropertyKind::Integer { .. } => "Integer".to_string(),
            PropertyKind::Long { .. } => "Long".to_string(),
            PropertyKind::Double { .. } => "Double".to_string(),
            PropertyKind::Boolean => "Boolean".to_string(),
            PropertyKind::DateTime => "DateTime".to_string(),
            PropertyKind::Enum { fqn, .. } => fqn.clone(),
            PropertyKind::Relationship { target, .. } => format!("--> {target}"),
        }
    }
}

/// One resolved property of a class declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub name: String,
    pub kind: PropertyKind,
    /// The field holds zero-or-more values of the base kind.
    pub array: bool,
    pub optional: bool,
    pub default: Option<DefaultValue>,
    /// Fully-qualified name of the declaration that declared this property;
    /// inherited properties keep their ancestor's name here.
    pub declared_by: String,
}

impl Property {
    /// A field with a default is implicitly satisfiable without input.
    pub fn required(&self) -> bool {
        !self.optional && self.default.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(1990.0), None, 1990.0, true)]
    #[case(Some(1990.0), None, 1989.0, false)]
    #[case(Some(1990.0), None, 2050.0, true)]
    #[case(None, Some(100.0), 100.0, true)]
    #[case(None, Some(100.0), 100.5, false)]
    #[case(Some(0.0), Some(10.0), 5.0, true)]
    #[case(Some(0.0), Some(10.0), -0.1, false)]
    fn range_bounds_are_inclusive_and_omittable(
        #[case] lower: Option<f64>,
        #[case] upper: Option<f64>,
        #[case] value: f64,
        #[case] expected: bool,
    ) {
        let range = NumericRange { lower, upper };
        assert_eq!(range.contains(value), expected);
    }

    #[test]
    fn field_pattern_matches_whole_value_only() {
        let pattern = FieldPattern::compile(r"[A-Z]{3}").unwrap();
        assert!(pattern.matches("ABC"));
        assert!(!pattern.matches("ABCD"));
        assert!(!pattern.matches("xABC"));
        assert_eq!(pattern.pattern, r"[A-Z]{3}");
    }

    #[test]
    fn alternation_is_anchored_as_a_group() {
        // Without the non-capturing group, "a|ab" anchored naively would
        // accept any string ending in "ab".
        let pattern = FieldPattern::compile("a|ab").unwrap();
        assert!(pattern.matches("a"));
        assert!(pattern.matches("ab"));
        assert!(!pattern.matches("xab"));
    }
}
