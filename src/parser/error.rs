//! Defines the error type for the parsing module.
use thiserror::Error;

/// A structured report for malformed model-language text.
///
/// Carries the source label and the 1-based line/column of the offending
/// token so callers can point a user at the exact spot. A `SyntaxError`
/// aborts compilation of that file only; other registered files are
/// unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{source_label}:{line}:{column}: {message}")]
pub struct SyntaxError {
    /// The label the caller supplied for this text (usually a file name).
    pub source_label: String,
    /// 1-based line of the offending token.
    pub line: u32,
    /// 1-based column of the offending token.
    pub column: u32,
    /// A human-readable expectation message.
    pub message: String,
}

impl SyntaxError {
    pub fn new(source_label: &str, line: u32, column: u32, message: impl Into<String>) -> Self {
        Self {
            source_label: source_label.to_string(),
            line,
            column,
            message: message.into(),
        }
    }
}
