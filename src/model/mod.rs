//! The compiled class model: registration, resolution, and the queryable
//! declaration graph.

pub mod declaration;
pub mod error;
pub mod file;
pub mod manager;
pub mod property;

pub use declaration::{ClassDeclaration, EnumDeclaration};
pub use error::ModelError;
pub use file::ModelFile;
pub use manager::ModelManager;
pub use property::{DefaultValue, FieldPattern, NumericRange, Property, PropertyKind};
