//! The model file registry and its resolution phase.
//!
//! Compilation is two-phase by design: `add_model_file` only registers
//! parsed, unresolved files; a single explicit `resolve()` call then binds
//! every import, supertype, enum reference and relationship target, caches
//! each class's effective property list, and freezes the manager. Nothing
//! is usable for lookup or validation until `resolve()` has succeeded for
//! the whole registered set.

use super::declaration::{ClassDeclaration, EnumDeclaration};
use super::error::ModelError;
use super::file::ModelFile;
use super::property::{DefaultValue, FieldPattern, NumericRange, Property, PropertyKind};
use crate::parser::ast::{ClassDef, Declaration, FieldDef, Import, Literal};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

/// Registry of model files and, after [`ModelManager::resolve`], the
/// resolved class model.
///
/// The build phase (`add_model_file` + `resolve`) is single-threaded and
/// stateful; the caller serializes those calls. After a successful
/// `resolve()` the manager is immutable and every read is safe from any
/// number of threads.
#[derive(Debug, Default)]
pub struct ModelManager {
    files: Vec<ModelFile>,
    /// namespace -> index into `files`.
    file_index: HashMap<String, usize>,
    classes: HashMap<String, ClassDeclaration>,
    enums: HashMap<String, EnumDeclaration>,
    /// Class fqns in registration/declaration order.
    class_order: Vec<String>,
    enum_order: Vec<String>,
    resolved: bool,
}

/// Identifying-field facts per class, computed before properties so that
/// relationship fields can capture their target's identifier pattern in
/// any reference order.
#[derive(Debug, Clone)]
struct IdInfo {
    field: String,
    pattern: Option<String>,
    /// The class that declared the field; named in re-identification errors.
    root: String,
}

impl ModelManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one parsed file.
    ///
    /// Fails on a namespace collision with different content;
    /// re-registering byte-identical content is a no-op. Duplicate
    /// declaration names, duplicate own-property names and duplicate enum
    /// literals are rejected here, before resolution.
    pub fn add_model_file(&mut self, file: ModelFile) -> Result<(), ModelError> {
        if self.resolved {
            return Err(ModelError::AlreadyResolved);
        }
        if let Some(&existing) = self.file_index.get(&file.namespace) {
            if self.files[existing].source == file.source {
                return Ok(());
            }
            return Err(ModelError::NamespaceCollision(file.namespace));
        }

        let mut names = HashSet::new();
        for declaration in &file.declarations {
            if !names.insert(declaration.name()) {
                return Err(ModelError::DuplicateDeclaration {
                    namespace: file.namespace.clone(),
                    name: declaration.name().to_string(),
                });
            }
            match declaration {
                Declaration::Class(class) => {
                    let mut fields = HashSet::new();
                    for field in &class.fields {
                        if !fields.insert(field.name.as_str()) {
                            return Err(ModelError::DuplicateProperty {
                                class: file.qualify(&class.name),
                                property: field.name.clone(),
                            });
                        }
                    }
                }
                Declaration::Enum(decl) => {
                    let mut literals = HashSet::new();
                    for literal in &decl.literals {
                        if !literals.insert(literal.as_str()) {
                            return Err(ModelError::DuplicateEnumLiteral {
                                fqn: file.qualify(&decl.name),
                                literal: literal.clone(),
                            });
                        }
                    }
                }
            }
        }

        self.file_index
            .insert(file.namespace.clone(), self.files.len());
        self.files.push(file);
        Ok(())
    }

    /// Binds every cross-reference in the registered set and caches the
    /// resolved model. Any failure leaves the manager unresolved; calling
    /// again after success is a no-op.
    pub fn resolve(&mut self) -> Result<(), ModelError> {
        if self.resolved {
            return Ok(());
        }
        let files = &self.files;
        let file_index = &self.file_index;

        // (a) Every import must reference a registered type or namespace.
        for file in files {
            for import in &file.imports {
                let found = match import {
                    Import::Type(fqn) => find_declaration(files, file_index, fqn).is_some(),
                    Import::Namespace(ns) => file_index.contains_key(ns),
                };
                if !found {
                    return Err(ModelError::UnresolvedImport {
                        importer: file.namespace.clone(),
                        reference: import.reference(),
                    });
                }
            }
        }

        // Enums resolve on their own; collect them first so field
        // resolution can copy literals.
        let mut enums = HashMap::new();
        let mut enum_order = Vec::new();
        let mut class_order = Vec::new();
        for file in files {
            for declaration in &file.declarations {
                match declaration {
                    Declaration::Enum(decl) => {
                        let fqn = file.qualify(&decl.name);
                        enums.insert(
                            fqn.clone(),
                            EnumDeclaration {
                                fqn: fqn.clone(),
                                name: decl.name.clone(),
                                namespace: file.namespace.clone(),
                                literals: decl.literals.clone(),
                            },
                        );
                        enum_order.push(fqn);
                    }
                    Declaration::Class(class) => {
                        class_order.push(file.qualify(&class.name));
                    }
                }
            }
        }

        // (b) Resolve supertype references; a supertype must be a class
        // declaration of the same kind, reachable per import rules.
        let mut class_defs: HashMap<String, (&ModelFile, &ClassDef)> = HashMap::new();
        for file in files {
            for declaration in &file.declarations {
                if let Declaration::Class(class) = declaration {
                    class_defs.insert(file.qualify(&class.name), (file, class));
                }
            }
        }
        let mut parents: HashMap<String, String> = HashMap::new();
        for file in files {
            for declaration in &file.declarations {
                let Declaration::Class(class) = declaration else {
                    continue;
                };
                let Some(reference) = &class.extends else {
                    continue;
                };
                let fqn = file.qualify(&class.name);
                let Some(parent_fqn) = resolve_reference(files, file_index, file, reference)
                else {
                    return Err(ModelError::UnresolvedSuperType {
                        class: fqn,
                        reference: reference.clone(),
                    });
                };
                let parent_kind = class_defs.get(&parent_fqn).map(|(_, def)| def.kind);
                if parent_kind != Some(class.kind) {
                    return Err(ModelError::KindMismatch {
                        class: fqn,
                        super_type: parent_fqn,
                    });
                }
                parents.insert(fqn, parent_fqn);
            }
        }

        // (c) Cycle detection, and an ancestor-first order for the passes
        // below: edges run parent -> child.
        let mut graph: DiGraph<String, ()> = DiGraph::new();
        let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();
        for fqn in &class_order {
            nodes.insert(fqn.as_str(), graph.add_node(fqn.clone()));
        }
        for (child, parent) in &parents {
            graph.add_edge(nodes[parent.as_str()], nodes[child.as_str()], ());
        }
        let topo = toposort(&graph, None)
            .map_err(|cycle| ModelError::InheritanceCycle(graph[cycle.node_id()].clone()))?;
        let topo: Vec<String> = topo.into_iter().map(|ix| graph[ix].clone()).collect();

        // (d) Walk ancestors first: accumulate each class's effective field
        // definitions (rejecting cross-chain name collisions) and settle
        // identifying-field facts before any relationship is resolved.
        let mut eff_defs: HashMap<&str, Vec<(&str, &FieldDef)>> = HashMap::new();
        let mut id_info: HashMap<String, IdInfo> = HashMap::new();
        for fqn in &topo {
            let (_, class) = class_defs[fqn.as_str()];
            let parent = parents.get(fqn.as_str());
            let mut defs: Vec<(&str, &FieldDef)> = parent
                .map(|p| eff_defs[p.as_str()].clone())
                .unwrap_or_default();
            let mut names: HashSet<&str> = defs.iter().map(|(name, _)| *name).collect();
            for field in &class.fields {
                if !names.insert(&field.name) {
                    return Err(ModelError::DuplicateProperty {
                        class: fqn.clone(),
                        property: field.name.clone(),
                    });
                }
                defs.push((&field.name, field));
            }

            let inherited = parent.and_then(|p| id_info.get(p.as_str())).cloned();
            if let Some(own) = &class.identified_by {
                if let Some(info) = &inherited {
                    return Err(ModelError::SubtypeIdentification {
                        class: fqn.clone(),
                        ancestor: info.root.clone(),
                    });
                }
                let field = defs
                    .iter()
                    .find(|(name, _)| *name == own.as_str())
                    .map(|(_, field)| *field);
                let valid = field.is_some_and(|f| {
                    !f.relation && f.type_name == "String" && !f.array && !f.optional
                });
                if !valid {
                    return Err(ModelError::InvalidIdentifyingField {
                        class: fqn.clone(),
                        field: own.clone(),
                    });
                }
                id_info.insert(
                    fqn.clone(),
                    IdInfo {
                        field: own.clone(),
                        pattern: field.and_then(|f| f.regex.clone()),
                        root: fqn.clone(),
                    },
                );
            } else if let Some(info) = inherited {
                id_info.insert(fqn.clone(), info);
            }

            if !class.is_abstract
                && class.kind.is_identifiable()
                && !id_info.contains_key(fqn.as_str())
            {
                return Err(ModelError::MissingIdentifyingField(fqn.clone()));
            }
            eff_defs.insert(fqn.as_str(), defs);
        }

        // (e) Build the resolved declarations, ancestors first so each
        // child clones its parent's cached effective list.
        let mut classes: HashMap<String, ClassDeclaration> = HashMap::new();
        for fqn in &topo {
            let (file, class) = class_defs[fqn.as_str()];
            let mut own_properties = Vec::with_capacity(class.fields.len());
            for field in &class.fields {
                own_properties.push(resolve_field(
                    files, file_index, file, fqn, field, &enums, &class_defs, &id_info,
                )?);
            }
            let parent = parents.get(fqn.as_str());
            let mut effective = parent
                .map(|p| classes[p].effective_properties.clone())
                .unwrap_or_default();
            effective.extend(own_properties.iter().cloned());

            classes.insert(
                fqn.clone(),
                ClassDeclaration {
                    fqn: fqn.clone(),
                    name: class.name.clone(),
                    namespace: file.namespace.clone(),
                    kind: class.kind,
                    is_abstract: class.is_abstract,
                    super_type: parent.cloned(),
                    identifying_field: id_info.get(fqn.as_str()).map(|info| info.field.clone()),
                    own_properties,
                    effective_properties: effective,
                },
            );
        }

        self.classes = classes;
        self.enums = enums;
        self.class_order = class_order;
        self.enum_order = enum_order;
        self.resolved = true;
        Ok(())
    }

    // --- Query surface (valid only after a successful resolve) ---

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Registered namespaces, in registration order.
    pub fn namespaces(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.namespace.as_str()).collect()
    }

    /// Resolves a fully-qualified name to its class declaration.
    pub fn get_type(&self, fqn: &str) -> Result<&ClassDeclaration, ModelError> {
        if !self.resolved {
            return Err(ModelError::NotResolved);
        }
        self.classes
            .get(fqn)
            .ok_or_else(|| ModelError::UnknownType(fqn.to_string()))
    }

    /// Resolves a fully-qualified name to its enum declaration.
    pub fn get_enum(&self, fqn: &str) -> Result<&EnumDeclaration, ModelError> {
        if !self.resolved {
            return Err(ModelError::NotResolved);
        }
        self.enums
            .get(fqn)
            .ok_or_else(|| ModelError::UnknownType(fqn.to_string()))
    }

    /// Class declarations of one namespace, in declaration order.
    pub fn declarations_in(&self, namespace: &str) -> Vec<&ClassDeclaration> {
        self.class_order
            .iter()
            .filter_map(|fqn| self.classes.get(fqn))
            .filter(|decl| decl.namespace == namespace)
            .collect()
    }

    /// Enum declarations of one namespace, in declaration order.
    pub fn enums_in(&self, namespace: &str) -> Vec<&EnumDeclaration> {
        self.enum_order
            .iter()
            .filter_map(|fqn| self.enums.get(fqn))
            .filter(|decl| decl.namespace == namespace)
            .collect()
    }
}

fn split_fqn(fqn: &str) -> Option<(&str, &str)> {
    fqn.rsplit_once('.')
}

fn find_declaration<'a>(
    files: &'a [ModelFile],
    file_index: &HashMap<String, usize>,
    fqn: &str,
) -> Option<&'a Declaration> {
    let (namespace, name) = split_fqn(fqn)?;
    let file = &files[*file_index.get(namespace)?];
    file.declaration(name)
}

/// Binds a textual type reference written inside `importer`.
///
/// A dotted reference is looked up directly but must be reachable: its
/// namespace is the importer's own, or the importer carries a covering
/// import. A bare name resolves against the importer's own namespace
/// first, then its explicit type imports, then its wildcard imports in
/// declaration order.
fn resolve_reference(
    files: &[ModelFile],
    file_index: &HashMap<String, usize>,
    importer: &ModelFile,
    reference: &str,
) -> Option<String> {
    if reference.contains('.') {
        let (namespace, _) = split_fqn(reference)?;
        find_declaration(files, file_index, reference)?;
        let reachable = namespace == importer.namespace
            || importer.imports.iter().any(|import| match import {
                Import::Type(fqn) => fqn == reference,
                Import::Namespace(ns) => ns == namespace,
            });
        return reachable.then(|| reference.to_string());
    }

    if importer.declaration(reference).is_some() {
        return Some(importer.qualify(reference));
    }
    for import in &importer.imports {
        match import {
            Import::Type(fqn) => {
                if split_fqn(fqn).is_some_and(|(_, name)| name == reference) {
                    return Some(fqn.clone());
                }
            }
            Import::Namespace(ns) => {
                let file = &files[*file_index.get(ns.as_str())?];
                if file.declaration(reference).is_some() {
                    return Some(file.qualify(reference));
                }
            }
        }
    }
    None
}

/// Resolves one field definition into a property with its validator baked
/// in.
#[allow(clippy::too_many_arguments)]
fn resolve_field(
    files: &[ModelFile],
    file_index: &HashMap<String, usize>,
    importer: &ModelFile,
    class_fqn: &str,
    field: &FieldDef,
    enums: &HashMap<String, EnumDeclaration>,
    class_defs: &HashMap<String, (&ModelFile, &ClassDef)>,
    id_info: &HashMap<String, IdInfo>,
) -> Result<Property, ModelError> {
    let kind = if field.relation {
        let Some(target) = resolve_reference(files, file_index, importer, &field.type_name) else {
            return Err(ModelError::UnresolvedType {
                class: class_fqn.to_string(),
                property: field.name.clone(),
                reference: field.type_name.clone(),
            });
        };
        let Some(info) = id_info.get(&target) else {
            // Enums and classes without an identifying field both land here.
            return Err(ModelError::NotIdentifiable {
                class: class_fqn.to_string(),
                property: field.name.clone(),
                target,
            });
        };
        let target_id_regex = match &info.pattern {
            Some(pattern) => {
                Some(
                    FieldPattern::compile(pattern).map_err(|e| ModelError::InvalidRegex {
                        class: info.root.clone(),
                        property: info.field.clone(),
                        message: e.to_string(),
                    })?,
                )
            }
            None => None,
        };
        PropertyKind::Relationship {
            target,
            target_id_regex,
        }
    } else {
        match field.type_name.as_str() {
            "String" => {
                let regex = match &field.regex {
                    Some(pattern) => Some(FieldPattern::compile(pattern).map_err(|e| {
                        ModelError::InvalidRegex {
                            class: class_fqn.to_string(),
                            property: field.name.clone(),
                            message: e.to_string(),
                        }
                    })?),
                    None => None,
                };
                PropertyKind::String { regex }
            }
            "Integer" => PropertyKind::Integer {
                range: numeric_range(field),
            },
            "Long" => PropertyKind::Long {
                range: numeric_range(field),
            },
            "Double" => PropertyKind::Double {
                range: numeric_range(field),
            },
            "Boolean" => PropertyKind::Boolean,
            "DateTime" => PropertyKind::DateTime,
            reference => {
                let Some(fqn) = resolve_reference(files, file_index, importer, reference) else {
                    return Err(ModelError::UnresolvedType {
                        class: class_fqn.to_string(),
                        property: field.name.clone(),
                        reference: reference.to_string(),
                    });
                };
                if let Some(decl) = enums.get(&fqn) {
                    PropertyKind::Enum {
                        fqn: decl.fqn.clone(),
                        literals: decl.literals.clone(),
                    }
                } else if class_defs.contains_key(&fqn) {
                    return Err(ModelError::InvalidFieldType {
                        class: class_fqn.to_string(),
                        property: field.name.clone(),
                        reference: fqn,
                    });
                } else {
                    return Err(ModelError::UnresolvedType {
                        class: class_fqn.to_string(),
                        property: field.name.clone(),
                        reference: reference.to_string(),
                    });
                }
            }
        }
    };

    let default = match &field.default {
        Some(literal) => Some(resolve_default(class_fqn, field, &kind, literal)?),
        None => None,
    };

    Ok(Property {
        name: field.name.clone(),
        kind,
        array: field.array,
        optional: field.optional,
        default,
        declared_by: class_fqn.to_string(),
    })
}

fn numeric_range(field: &FieldDef) -> Option<NumericRange> {
    field.range.map(|bounds| NumericRange {
        lower: bounds.lower,
        upper: bounds.upper,
    })
}

/// Type-checks a declared default against the resolved field kind and the
/// field's own validator, so a defaulted field is always satisfiable.
fn resolve_default(
    class_fqn: &str,
    field: &FieldDef,
    kind: &PropertyKind,
    literal: &Literal,
) -> Result<DefaultValue, ModelError> {
    let invalid = |message: String| ModelError::InvalidDefault {
        class: class_fqn.to_string(),
        property: field.name.clone(),
        message,
    };
    match kind {
        PropertyKind::String { regex } => match literal {
            Literal::Str(s) => {
                if let Some(pattern) = regex {
                    if !pattern.matches(s) {
                        return Err(invalid(format!(
                            "'{s}' does not match regex /{}/",
                            pattern.pattern
                        )));
                    }
                }
                Ok(DefaultValue::String(s.clone()))
            }
            other => Err(invalid(format!("expected a string, found {other:?}"))),
        },
        PropertyKind::Integer { range } | PropertyKind::Long { range } => match literal {
            Literal::Int(n) => {
                if let Some(range) = range {
                    if !range.contains(*n as f64) {
                        return Err(invalid(format!("{n} is outside the declared range")));
                    }
                }
                Ok(DefaultValue::Integer(*n))
            }
            other => Err(invalid(format!("expected an integer, found {other:?}"))),
        },
        PropertyKind::Double { range } => {
            let value = match literal {
                Literal::Int(n) => *n as f64,
                Literal::Float(f) => *f,
                other => return Err(invalid(format!("expected a number, found {other:?}"))),
            };
            if let Some(range) = range {
                if !range.contains(value) {
                    return Err(invalid(format!("{value} is outside the declared range")));
                }
            }
            Ok(DefaultValue::Double(value))
        }
        PropertyKind::Boolean => match literal {
            Literal::Bool(b) => Ok(DefaultValue::Boolean(*b)),
            other => Err(invalid(format!("expected true or false, found {other:?}"))),
        },
        PropertyKind::DateTime => match literal {
            Literal::Str(s) => {
                if chrono::DateTime::parse_from_rfc3339(s).is_err() {
                    return Err(invalid(format!("'{s}' is not an RFC 3339 date-time")));
                }
                Ok(DefaultValue::DateTime(s.clone()))
            }
            other => Err(invalid(format!(
                "expected an RFC 3339 string, found {other:?}"
            ))),
        },
        PropertyKind::Enum { fqn, literals } => {
            let name = match literal {
                Literal::Str(s) => s,
                Literal::Ident(s) => s,
                other => return Err(invalid(format!("expected an enum literal, found {other:?}"))),
            };
            if !literals.iter().any(|l| l == name) {
                return Err(invalid(format!("'{name}' is not a literal of {fqn}")));
            }
            Ok(DefaultValue::EnumLiteral(name.clone()))
        }
        PropertyKind::Relationship { .. } => {
            // The grammar has no default clause for relationship fields.
            Err(invalid("relationship fields cannot carry a default".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    const BASE: &str = "\
namespace org.acme.base

abstract asset IdentifiedThing identified by thingId {
  o String thingId
}
";

    const VEHICLE: &str = "\
namespace org.acme.vehicle

import org.acme.registry.Owner
import org.acme.base.*

enum VehicleStatus {
  o CREATED
  o REGISTERED
  o SOLD
}

abstract asset Vehicle identified by vin {
  o String vin regex=/^[A-HJ-NPR-Z]{8}[X][A-HJ-NPR-Z]{2}\\d{6}$/
  o VehicleStatus status default=\"CREATED\"
}

asset Car extends Vehicle {
  o Integer modelYear range=[1990,]
  o Double listPrice range=[,200000] optional
  o String[] nicknames optional
  o DateTime firstRegistered optional
  --> Owner owner optional
  --> Car[] tradeIns optional
}
";

    const REGISTRY: &str = "\
namespace org.acme.registry

import org.acme.vehicle.Car

participant Owner identified by email {
  o String email
  o Boolean licensed default=true
}

transaction SellVehicle {
  --> org.acme.vehicle.Car car
  o Double salePrice range=[0,]
}
";

    fn compiled() -> ModelManager {
        let mut manager = ModelManager::new();
        for (text, label) in [
            (BASE, "base.msl"),
            (VEHICLE, "vehicle.msl"),
            (REGISTRY, "registry.msl"),
        ] {
            manager
                .add_model_file(parse(text, label).expect("parse failure"))
                .expect("registration failure");
        }
        manager.resolve().expect("resolve failure");
        manager
    }

    #[test]
    fn namespace_collision_fails_but_identical_content_is_a_noop() {
        let mut manager = ModelManager::new();
        manager
            .add_model_file(parse(BASE, "base.msl").unwrap())
            .unwrap();
        // Byte-identical content: no-op.
        manager
            .add_model_file(parse(BASE, "base-copy.msl").unwrap())
            .unwrap();
        // Same namespace, different content: collision.
        let other = parse("namespace org.acme.base\nconcept Address { }", "x.msl").unwrap();
        assert_eq!(
            manager.add_model_file(other),
            Err(ModelError::NamespaceCollision("org.acme.base".into()))
        );
    }

    #[test]
    fn registration_is_rejected_after_resolve() {
        let mut manager = compiled();
        let file = parse("namespace org.late", "late.msl").unwrap();
        assert_eq!(manager.add_model_file(file), Err(ModelError::AlreadyResolved));
        // A second resolve is a no-op.
        assert_eq!(manager.resolve(), Ok(()));
    }

    #[test]
    fn lookups_fail_before_resolve() {
        let mut manager = ModelManager::new();
        manager
            .add_model_file(parse(VEHICLE, "vehicle.msl").unwrap())
            .unwrap();
        assert_eq!(
            manager.get_type("org.acme.vehicle.Car").err(),
            Some(ModelError::NotResolved)
        );
    }

    #[test]
    fn resolves_inherited_identifying_field() {
        let manager = compiled();
        let car = manager.get_type("org.acme.vehicle.Car").unwrap();
        assert_eq!(car.identifying_field.as_deref(), Some("vin"));
        assert_eq!(car.super_type.as_deref(), Some("org.acme.vehicle.Vehicle"));
        assert!(!car.is_abstract);

        let vehicle = manager.get_type("org.acme.vehicle.Vehicle").unwrap();
        assert!(vehicle.is_abstract);
        assert_eq!(vehicle.identifying_field.as_deref(), Some("vin"));
    }

    #[test]
    fn effective_properties_are_ancestor_first_in_declaration_order() {
        let manager = compiled();
        let car = manager.get_type("org.acme.vehicle.Car").unwrap();
        let names: Vec<&str> = car
            .effective_properties
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "vin",
                "status",
                "modelYear",
                "listPrice",
                "nicknames",
                "firstRegistered",
                "owner",
                "tradeIns"
            ]
        );
        // Inherited properties keep their declaring ancestor.
        assert_eq!(car.property("vin").unwrap().declared_by, "org.acme.vehicle.Vehicle");
        assert_eq!(car.property("modelYear").unwrap().declared_by, "org.acme.vehicle.Car");
    }

    #[test]
    fn relationship_captures_target_identifier_pattern() {
        let manager = compiled();
        let sale = manager.get_type("org.acme.registry.SellVehicle").unwrap();
        match &sale.property("car").unwrap().kind {
            PropertyKind::Relationship {
                target,
                target_id_regex,
            } => {
                assert_eq!(target, "org.acme.vehicle.Car");
                let pattern = target_id_regex.as_ref().expect("vin pattern captured");
                assert!(pattern.matches("ABCDEFGHXJK123456"));
                assert!(!pattern.matches("short"));
            }
            other => panic!("expected a relationship, found {other:?}"),
        }
    }

    #[test]
    fn enum_fields_copy_their_literals() {
        let manager = compiled();
        let vehicle = manager.get_type("org.acme.vehicle.Vehicle").unwrap();
        match &vehicle.property("status").unwrap().kind {
            PropertyKind::Enum { fqn, literals } => {
                assert_eq!(fqn, "org.acme.vehicle.VehicleStatus");
                assert_eq!(literals, &["CREATED", "REGISTERED", "SOLD"]);
            }
            other => panic!("expected an enum kind, found {other:?}"),
        }
        let status = manager.get_enum("org.acme.vehicle.VehicleStatus").unwrap();
        assert!(status.has_literal("SOLD"));
        assert!(!status.has_literal("SCRAPPED"));
    }

    #[test]
    fn query_surface_lists_namespaces_and_declarations() {
        let manager = compiled();
        assert_eq!(
            manager.namespaces(),
            vec!["org.acme.base", "org.acme.vehicle", "org.acme.registry"]
        );
        let in_vehicle: Vec<&str> = manager
            .declarations_in("org.acme.vehicle")
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(in_vehicle, vec!["Vehicle", "Car"]);
        let enums: Vec<&str> = manager
            .enums_in("org.acme.vehicle")
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(enums, vec!["VehicleStatus"]);
        assert_eq!(
            manager.get_type("org.acme.vehicle.Spaceship").err(),
            Some(ModelError::UnknownType("org.acme.vehicle.Spaceship".into()))
        );
    }

    #[test]
    fn unresolved_import_names_importer_and_reference() {
        let mut manager = ModelManager::new();
        manager
            .add_model_file(parse(VEHICLE, "vehicle.msl").unwrap())
            .unwrap();
        // org.acme.registry and org.acme.base are missing.
        assert_eq!(
            manager.resolve(),
            Err(ModelError::UnresolvedImport {
                importer: "org.acme.vehicle".into(),
                reference: "org.acme.registry.Owner".into(),
            })
        );
        assert!(!manager.is_resolved());
    }

    #[test]
    fn cross_namespace_reference_requires_an_import() {
        let mut manager = ModelManager::new();
        let a = "namespace org.a\nasset Thing identified by id { o String id }";
        // No import of org.a, so the dotted reference is unreachable.
        let b = "namespace org.b\nasset Holder identified by id {\n  o String id\n  --> org.a.Thing thing\n}";
        manager.add_model_file(parse(a, "a.msl").unwrap()).unwrap();
        manager.add_model_file(parse(b, "b.msl").unwrap()).unwrap();
        assert_eq!(
            manager.resolve(),
            Err(ModelError::UnresolvedType {
                class: "org.b.Holder".into(),
                property: "thing".into(),
                reference: "org.a.Thing".into(),
            })
        );
    }

    #[test]
    fn unresolved_supertype_fails() {
        let mut manager = ModelManager::new();
        let text = "namespace org.a\nasset Car extends Vehicle identified by id { o String id }";
        manager.add_model_file(parse(text, "a.msl").unwrap()).unwrap();
        assert_eq!(
            manager.resolve(),
            Err(ModelError::UnresolvedSuperType {
                class: "org.a.Car".into(),
                reference: "Vehicle".into(),
            })
        );
    }

    #[test]
    fn inheritance_cycle_is_detected() {
        let mut manager = ModelManager::new();
        let text = "\
namespace org.a
abstract concept A extends C { }
abstract concept B extends A { }
abstract concept C extends B { }
";
        manager.add_model_file(parse(text, "a.msl").unwrap()).unwrap();
        match manager.resolve() {
            Err(ModelError::InheritanceCycle(fqn)) => {
                assert!(fqn.starts_with("org.a."), "cycle names a member: {fqn}");
            }
            other => panic!("expected an inheritance cycle, found {other:?}"),
        }
    }

    #[test]
    fn extends_across_kinds_is_rejected() {
        let mut manager = ModelManager::new();
        let text = "\
namespace org.a
concept Base { }
asset Car extends Base identified by id { o String id }
";
        manager.add_model_file(parse(text, "a.msl").unwrap()).unwrap();
        assert_eq!(
            manager.resolve(),
            Err(ModelError::KindMismatch {
                class: "org.a.Car".into(),
                super_type: "org.a.Base".into(),
            })
        );
    }

    #[test]
    fn concrete_identifiable_without_identifying_field_fails() {
        let mut manager = ModelManager::new();
        let text = "namespace org.a\nasset Car { o String plate }";
        manager.add_model_file(parse(text, "a.msl").unwrap()).unwrap();
        assert_eq!(
            manager.resolve(),
            Err(ModelError::MissingIdentifyingField("org.a.Car".into()))
        );
    }

    #[test]
    fn redeclaring_an_inherited_property_is_a_duplicate() {
        let mut manager = ModelManager::new();
        let text = "\
namespace org.a
abstract asset Base identified by id {
  o String id
  o Integer age
}
asset Sub extends Base {
  o Integer age
}
";
        manager.add_model_file(parse(text, "a.msl").unwrap()).unwrap();
        assert_eq!(
            manager.resolve(),
            Err(ModelError::DuplicateProperty {
                class: "org.a.Sub".into(),
                property: "age".into(),
            })
        );
    }

    #[test]
    fn re_identifying_a_subtype_is_rejected() {
        let mut manager = ModelManager::new();
        let text = "\
namespace org.a
abstract asset Base identified by id { o String id }
asset Sub identified by code extends Base { o String code }
";
        manager.add_model_file(parse(text, "a.msl").unwrap()).unwrap();
        assert_eq!(
            manager.resolve(),
            Err(ModelError::SubtypeIdentification {
                class: "org.a.Sub".into(),
                ancestor: "org.a.Base".into(),
            })
        );
    }

    #[test]
    fn identifying_field_must_be_a_mandatory_string() {
        let mut manager = ModelManager::new();
        let text = "namespace org.a\nasset Car identified by vin { o Integer vin }";
        manager.add_model_file(parse(text, "a.msl").unwrap()).unwrap();
        assert_eq!(
            manager.resolve(),
            Err(ModelError::InvalidIdentifyingField {
                class: "org.a.Car".into(),
                field: "vin".into(),
            })
        );
    }

    #[test]
    fn relationship_to_a_non_identifiable_target_fails() {
        let mut manager = ModelManager::new();
        let text = "\
namespace org.a
concept Address { o String street }
asset Car identified by id {
  o String id
  --> Address home
}
";
        manager.add_model_file(parse(text, "a.msl").unwrap()).unwrap();
        assert_eq!(
            manager.resolve(),
            Err(ModelError::NotIdentifiable {
                class: "org.a.Car".into(),
                property: "home".into(),
                target: "org.a.Address".into(),
            })
        );
    }

    #[test]
    fn contained_class_fields_are_rejected() {
        let mut manager = ModelManager::new();
        let text = "\
namespace org.a
concept Address { o String street }
concept Person { o Address home }
";
        manager.add_model_file(parse(text, "a.msl").unwrap()).unwrap();
        assert_eq!(
            manager.resolve(),
            Err(ModelError::InvalidFieldType {
                class: "org.a.Person".into(),
                property: "home".into(),
                reference: "org.a.Address".into(),
            })
        );
    }

    #[test]
    fn default_must_satisfy_the_fields_own_validator() {
        let mut manager = ModelManager::new();
        let text = "\
namespace org.a
concept Config { o Integer retries range=[0,5] default=9 }
";
        manager.add_model_file(parse(text, "a.msl").unwrap()).unwrap();
        match manager.resolve() {
            Err(ModelError::InvalidDefault { class, property, .. }) => {
                assert_eq!(class, "org.a.Config");
                assert_eq!(property, "retries");
            }
            other => panic!("expected an invalid default, found {other:?}"),
        }
    }

    #[test]
    fn enum_default_must_name_a_declared_literal() {
        let mut manager = ModelManager::new();
        let text = "\
namespace org.a
enum State { o ON o OFF }
concept Switch { o State state default=\"BROKEN\" }
";
        manager.add_model_file(parse(text, "a.msl").unwrap()).unwrap();
        assert!(matches!(
            manager.resolve(),
            Err(ModelError::InvalidDefault { .. })
        ));
    }

    #[test]
    fn duplicate_declaration_and_literal_are_rejected_at_registration() {
        let mut manager = ModelManager::new();
        let dup_decl = "namespace org.a\nconcept X { }\nenum X { o A }";
        assert_eq!(
            manager.add_model_file(parse(dup_decl, "a.msl").unwrap()),
            Err(ModelError::DuplicateDeclaration {
                namespace: "org.a".into(),
                name: "X".into(),
            })
        );
        let dup_literal = "namespace org.b\nenum E { o A o A }";
        assert_eq!(
            manager.add_model_file(parse(dup_literal, "b.msl").unwrap()),
            Err(ModelError::DuplicateEnumLiteral {
                fqn: "org.b.E".into(),
                literal: "A".into(),
            })
        );
    }

    #[test]
    fn wildcard_imports_resolve_in_declaration_order() {
        let mut manager = ModelManager::new();
        let a = "namespace org.a\nconcept Shared { o String fromA }";
        let b = "namespace org.b\nconcept Shared { o String fromB }";
        // Both wildcard namespaces declare 'Shared'; the first import wins.
        let probe = "\
namespace org.d
import org.a.*
import org.b.*
concept Mine extends Shared { }
";
        manager.add_model_file(parse(a, "a.msl").unwrap()).unwrap();
        manager.add_model_file(parse(b, "b.msl").unwrap()).unwrap();
        manager.add_model_file(parse(probe, "d.msl").unwrap()).unwrap();
        manager.resolve().unwrap();
        let mine = manager.get_type("org.d.Mine").unwrap();
        assert_eq!(mine.super_type.as_deref(), Some("org.a.Shared"));
        assert_eq!(mine.property("fromA").unwrap().declared_by, "org.a.Shared");
    }
}
