//! Human-readable rendering of a resolved model, for diagnostics and
//! logging by callers. Nothing in the core depends on this output.

use crate::model::{ClassDeclaration, ModelManager, Property, PropertyKind};
use std::fmt::Write;

/// Formats the resolved model as an indented tree:
/// namespaces -> declarations -> effective properties with their
/// validator metadata.
pub fn format_model(manager: &ModelManager) -> String {
    let mut output = String::new();
    for namespace in manager.namespaces() {
        let _ = writeln!(output, "namespace {namespace}");

        for decl in manager.enums_in(namespace) {
            let _ = writeln!(output, "|-- enum {} [{}]", decl.name, decl.literals.join(", "));
        }

        let declarations = manager.declarations_in(namespace);
        for (i, decl) in declarations.iter().enumerate() {
            let is_last = i == declarations.len() - 1;
            let connector = if is_last { "`--" } else { "|--" };
            let _ = writeln!(output, "{connector} {}", describe_class(decl));

            let stem = if is_last { "    " } else { "|   " };
            for (j, property) in decl.effective_properties.iter().enumerate() {
                let is_last_prop = j == decl.effective_properties.len() - 1;
                let prop_connector = if is_last_prop { "`--" } else { "|--" };
                let _ = writeln!(
                    output,
                    "{stem}{prop_connector} {}",
                    describe_property(decl, property)
                );
            }
        }
    }
    output
}

fn describe_class(decl: &ClassDeclaration) -> String {
    let mut line = String::new();
    if decl.is_abstract {
        line.push_str("abstract ");
    }
    let _ = write!(line, "{} {}", decl.kind.keyword(), decl.name);
    if let Some(parent) = &decl.super_type {
        let _ = write!(line, " extends {parent}");
    }
    if let Some(field) = &decl.identifying_field {
        let _ = write!(line, " identified by {field}");
    }
    line
}

fn describe_property(decl: &ClassDeclaration, property: &Property) -> String {
    let mut line = format!("{}: {}", property.name, property.kind.describe());
    if property.array {
        line.push_str("[]");
    }
    match &property.kind {
        PropertyKind::String { regex: Some(pattern) } => {
            let _ = write!(line, " regex=/{}/", pattern.pattern);
        }
        PropertyKind::Integer { range: Some(range) }
        | PropertyKind::Long { range: Some(range) }
        | PropertyKind::Double { range: Some(range) } => {
            let lower = range.lower.map_or(String::new(), |v| v.to_string());
            let upper = range.upper.map_or(String::new(), |v| v.to_string());
            let _ = write!(line, " range=[{lower},{upper}]");
        }
        _ => {}
    }
    if property.optional {
        line.push_str(" optional");
    }
    if let Some(default) = &property.default {
        let _ = write!(line, " default={default:?}");
    }
    if property.declared_by != decl.fqn {
        let _ = write!(line, " (from {})", property.declared_by);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelManager;
    use crate::parser::parse;

    #[test]
    fn renders_hierarchy_and_inherited_properties() {
        let text = "\
namespace org.a
enum State { o ON o OFF }
abstract asset Base identified by id { o String id }
asset Sub extends Base { o Integer count range=[0,] optional }
";
        let mut manager = ModelManager::new();
        manager.add_model_file(parse(text, "a.msl").unwrap()).unwrap();
        manager.resolve().unwrap();

        let rendered = format_model(&manager);
        assert!(rendered.contains("namespace org.a"));
        assert!(rendered.contains("enum State [ON, OFF]"));
        assert!(rendered.contains("abstract asset Base identified by id"));
        assert!(rendered.contains("asset Sub extends org.a.Base identified by id"));
        assert!(rendered.contains("id: String (from org.a.Base)"));
        assert!(rendered.contains("count: Integer range=[0,] optional"));
    }
}
