//! A compiler and validator for a textual domain-modeling language.
//!
//! Model-language text (namespaces, enums, asset/participant/transaction/
//! concept declarations with single inheritance, typed fields with
//! validators and defaults, and relationships between identifiable types)
//! is parsed into [`ModelFile`]s, registered with a [`ModelManager`], and
//! bound into a queryable class model by an explicit `resolve()` phase.
//! A [`Validator`] then checks candidate JSON instances against a
//! resolved declaration, collecting every violation per instance.
//!
//! ```
//! use modelscript_core::{parse, ModelManager, Validator};
//! use serde_json::json;
//!
//! let text = "\
//! namespace org.acme
//! asset Car identified by vin {
//!   o String vin
//!   o Integer modelYear range=[1990,]
//! }
//! ";
//! let mut manager = ModelManager::new();
//! manager.add_model_file(parse(text, "car.msl")?)?;
//! manager.resolve()?;
//!
//! let car = manager.get_type("org.acme.Car")?;
//! let instance = json!({ "vin": "XYZ123", "modelYear": 2004 });
//! assert!(Validator::new(car).validate(&instance).is_ok());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod display;
pub mod model;
pub mod parser;
pub mod validation;

pub use model::{
    ClassDeclaration, DefaultValue, EnumDeclaration, FieldPattern, ModelError, ModelFile,
    ModelManager, NumericRange, Property, PropertyKind,
};
pub use parser::{parse, ClassKind, Import, SyntaxError};
pub use validation::{ValidationError, ValidationErrorKind, Validator, CLASS_DISCRIMINATOR};
