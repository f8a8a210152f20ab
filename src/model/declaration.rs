//! Resolved declarations: classes with cached effective properties, enums.

use super::property::Property;
use crate::parser::ast::ClassKind;
use serde::Serialize;

/// A fully resolved class declaration.
///
/// Produced by [`crate::model::ModelManager::resolve`]; immutable and safe
/// for concurrent reads afterwards. The effective property list is computed
/// once at resolve time rather than re-walking ancestors per validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDeclaration {
    /// `namespace.Name`, globally unique within a manager.
    pub fqn: String,
    pub name: String,
    pub namespace: String,
    pub kind: ClassKind,
    /// Abstract declarations may appear only as ancestors, never as the
    /// declared type of a validated instance.
    pub is_abstract: bool,
    /// Fully-qualified name of the resolved supertype, if any.
    pub super_type: Option<String>,
    /// Effective identifying field: declared locally or inherited. Always
    /// present for concrete Asset/Participant declarations, never for
    /// Transaction/Concept.
    pub identifying_field: Option<String>,
    /// Properties declared on this class itself.
    pub own_properties: Vec<Property>,
    /// Own plus all inherited properties, in ancestor-to-descendant
    /// declaration order.
    pub effective_properties: Vec<Property>,
}

impl ClassDeclaration {
    /// Looks up an effective (own or inherited) property by name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.effective_properties.iter().find(|p| p.name == name)
    }
}

/// A resolved enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumDeclaration {
    pub fqn: String,
    pub name: String,
    pub namespace: String,
    /// Unique literal names, in declaration order.
    pub literals: Vec<String>,
}

impl EnumDeclaration {
    pub fn has_literal(&self, literal: &str) -> bool {
        self.literals.iter().any(|l| l == literal)
    }
}
