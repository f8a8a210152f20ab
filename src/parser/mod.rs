//! Lexing and parsing of the model language.
//!
//! `parse` turns one text into an unresolved [`crate::model::ModelFile`];
//! binding imports, supertypes and field types to declarations is the model
//! manager's job.

pub mod ast;
pub mod error;
pub mod lexer;
mod parse;

pub use ast::{
    ClassDef, ClassKind, Declaration, EnumDef, FieldDef, Import, Literal, RangeBounds,
};
pub use error::SyntaxError;
pub use parse::parse;
