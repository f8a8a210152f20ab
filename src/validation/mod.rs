//! Instance validation against a resolved class declaration.

pub mod error;
pub mod rules;
pub mod validator;

pub use error::{ValidationError, ValidationErrorKind};
pub use validator::{Validator, CLASS_DISCRIMINATOR};
