//! One namespace's parsed declarations plus its import list.

use crate::parser::ast::{Declaration, Import};
use serde::Serialize;

/// The parsed, unresolved content of one model-language text.
///
/// Created by [`crate::parser::parse`] and owned exclusively by the
/// [`crate::model::ModelManager`] that registers it; immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelFile {
    /// Non-empty, globally unique within a manager.
    pub namespace: String,
    pub imports: Vec<Import>,
    pub declarations: Vec<Declaration>,
    /// Diagnostic label supplied at parse time (usually the file name).
    pub source_label: String,
    /// The original text, retained so that re-registering byte-identical
    /// content can be detected as a no-op.
    #[serde(skip)]
    pub source: String,
}

impl ModelFile {
    pub fn new(
        namespace: String,
        imports: Vec<Import>,
        declarations: Vec<Declaration>,
        source_label: &str,
        source: &str,
    ) -> Self {
        Self {
            namespace,
            imports,
            declarations,
            source_label: source_label.to_string(),
            source: source.to_string(),
        }
    }

    /// Looks up a declaration by its local (unqualified) name.
    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name() == name)
    }

    /// The fully-qualified name of a local declaration.
    pub fn qualify(&self, name: &str) -> String {
        format!("{}.{}", self.namespace, name)
    }
}
