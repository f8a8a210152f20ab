//! Defines the error type for model registration and resolution.
//!
//! Any of these aborts `resolve()` for the whole registered set; a partial
//! model is never usable.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("namespace '{0}' is already registered with different content")]
    NamespaceCollision(String),

    #[error("duplicate declaration '{name}' in namespace '{namespace}'")]
    DuplicateDeclaration { namespace: String, name: String },

    #[error("duplicate property '{property}' on '{class}'")]
    DuplicateProperty { class: String, property: String },

    #[error("duplicate literal '{literal}' in enum '{fqn}'")]
    DuplicateEnumLiteral { fqn: String, literal: String },

    #[error("unresolved import '{reference}' in '{importer}'")]
    UnresolvedImport { importer: String, reference: String },

    #[error("could not resolve supertype '{reference}' of '{class}'")]
    UnresolvedSuperType { class: String, reference: String },

    #[error("could not resolve type '{reference}' referenced by '{class}.{property}'")]
    UnresolvedType {
        class: String,
        property: String,
        reference: String,
    },

    #[error("inheritance cycle involving '{0}'")]
    InheritanceCycle(String),

    #[error("'{class}' extends '{super_type}', which is not a declaration of the same kind")]
    KindMismatch { class: String, super_type: String },

    #[error("concrete declaration '{0}' has no identifying field, declared or inherited")]
    MissingIdentifyingField(String),

    #[error("'{class}' declares an identifying field but the hierarchy is already identified by '{ancestor}'")]
    SubtypeIdentification { class: String, ancestor: String },

    #[error("identifying field '{field}' of '{class}' must be an existing mandatory non-array String property")]
    InvalidIdentifyingField { class: String, field: String },

    #[error("field '{class}.{property}' holds class type '{reference}'; contained class values are not supported, use a relationship ('-->')")]
    InvalidFieldType {
        class: String,
        property: String,
        reference: String,
    },

    #[error("relationship '{class}.{property}' targets '{target}', which has no identifying field")]
    NotIdentifiable {
        class: String,
        property: String,
        target: String,
    },

    #[error("invalid regex on '{class}.{property}': {message}")]
    InvalidRegex {
        class: String,
        property: String,
        message: String,
    },

    #[error("invalid default on '{class}.{property}': {message}")]
    InvalidDefault {
        class: String,
        property: String,
        message: String,
    },

    #[error("unknown type '{0}'")]
    UnknownType(String),

    #[error("the model manager has not been resolved yet")]
    NotResolved,

    #[error("the model manager is resolved and immutable; files can no longer be added")]
    AlreadyResolved,
}
