//! Diagnostic rendering of compiled models.
pub mod summary;

pub use summary::format_model;
