//! Per-concern validation rules, dispatched by the validator.

pub mod relation;
pub mod scalar;
