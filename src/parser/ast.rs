//! The declaration AST produced by the parser.
//!
//! Everything here is unresolved: `extends` targets, field type names, and
//! import references are plain strings bound later by the model manager.
//! Keeping the AST free of resolution concerns is what lets parsing stay a
//! pure single pass with no cross-file knowledge.

use serde::Serialize;

/// A single import clause of a model file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Import {
    /// `import org.acme.Vehicle` — one fully-qualified type.
    Type(String),
    /// `import org.acme.*` — every type of a namespace.
    Namespace(String),
}

impl Import {
    /// The textual reference as written, for error messages.
    pub fn reference(&self) -> String {
        match self {
            Import::Type(fqn) => fqn.clone(),
            Import::Namespace(ns) => format!("{ns}.*"),
        }
    }
}

/// The four declarable class kinds of the modeling language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClassKind {
    Asset,
    Participant,
    Transaction,
    Concept,
}

impl ClassKind {
    /// Whether instances of this kind are addressed by an identifying field.
    pub fn is_identifiable(self) -> bool {
        matches!(self, ClassKind::Asset | ClassKind::Participant)
    }

    pub fn keyword(self) -> &'static str {
        match self {
            ClassKind::Asset => "asset",
            ClassKind::Participant => "participant",
            ClassKind::Transaction => "transaction",
            ClassKind::Concept => "concept",
        }
    }
}

/// A literal default value as written in the source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// A bare identifier, used for enum literal defaults.
    Ident(String),
}

/// An inclusive numeric range with independently omittable bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeBounds {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

/// One field line of a class declaration, scalar (`o`) or relationship
/// (`-->`). Validator metadata is kept as written; compilation happens at
/// resolve time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDef {
    pub name: String,
    /// Primitive keyword or (possibly dotted) type reference.
    pub type_name: String,
    /// `-->` field: a reference by identifier rather than a contained value.
    pub relation: bool,
    pub array: bool,
    pub optional: bool,
    pub default: Option<Literal>,
    pub regex: Option<String>,
    pub range: Option<RangeBounds>,
    /// Line of the field name, for resolve-time error reporting.
    pub line: u32,
}

/// An `[abstract] asset|participant|transaction|concept` declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDef {
    pub name: String,
    pub kind: ClassKind,
    pub is_abstract: bool,
    pub extends: Option<String>,
    pub identified_by: Option<String>,
    pub fields: Vec<FieldDef>,
    pub line: u32,
}

/// An `enum Name { o LITERAL ... }` declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumDef {
    pub name: String,
    pub literals: Vec<String>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Declaration {
    Class(ClassDef),
    Enum(EnumDef),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Class(c) => &c.name,
            Declaration::Enum(e) => &e.name,
        }
    }
}

/// Primitive type keywords of the modeling language.
pub const PRIMITIVE_TYPES: &[&str] =
    &["String", "Integer", "Long", "Double", "Boolean", "DateTime"];

pub fn is_primitive(type_name: &str) -> bool {
    PRIMITIVE_TYPES.contains(&type_name)
}

pub fn is_numeric_primitive(type_name: &str) -> bool {
    matches!(type_name, "Integer" | "Long" | "Double")
}
