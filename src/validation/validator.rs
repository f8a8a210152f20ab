//! The central validator that checks one instance against one resolved
//! declaration.

use super::error::{ValidationError, ValidationErrorKind};
use super::rules::{relation, scalar};
use crate::model::{ClassDeclaration, Property, PropertyKind};
use serde_json::Value;
use std::collections::HashSet;

/// Reserved instance field naming the concrete declaration of a
/// polymorphic payload; tolerated (and cross-checked) rather than treated
/// as unknown.
pub const CLASS_DISCRIMINATOR: &str = "$class";

/// Checks candidate instances against one resolved class declaration.
///
/// A pure function of (declaration, instance): no side effects, no
/// lookups. Everything validation needs was baked into the declaration's
/// effective properties at resolve time, which is what makes a `Validator`
/// safely shareable across threads after `resolve()`.
pub struct Validator<'a> {
    declaration: &'a ClassDeclaration,
}

impl<'a> Validator<'a> {
    pub fn new(declaration: &'a ClassDeclaration) -> Self {
        Self { declaration }
    }

    /// Validates one instance, collecting every violation.
    ///
    /// # Returns
    /// - `Ok(())` if the instance satisfies every effective property.
    /// - `Err(Vec<ValidationError>)` with one entry per violated field.
    pub fn validate(&self, instance: &Value) -> Result<(), Vec<ValidationError>> {
        let class = &self.declaration.fqn;

        // Abstract declarations exist only as ancestors; there is nothing
        // else worth reporting about the instance.
        if self.declaration.is_abstract {
            return Err(vec![ValidationError::new(
                class,
                CLASS_DISCRIMINATOR,
                ValidationErrorKind::InstantiateAbstract,
                format!("'{class}' is abstract and cannot be instantiated"),
            )]);
        }

        let Some(fields) = instance.as_object() else {
            return Err(vec![ValidationError::new(
                class,
                "",
                ValidationErrorKind::TypeMismatch,
                format!("expected an object, found {instance}"),
            )]);
        };

        let mut errors = Vec::new();
        for property in &self.declaration.effective_properties {
            match fields.get(&property.name) {
                // An explicit null is treated as absent: a default (when
                // present) fills it, otherwise it is a missing value.
                None | Some(Value::Null) => {
                    if property.required() {
                        errors.push(ValidationError::new(
                            class,
                            &property.name,
                            ValidationErrorKind::MissingRequired,
                            format!("missing required value for '{}'", property.name),
                        ));
                    }
                }
                Some(value) => self.check_property(property, value, &mut errors),
            }
        }

        let declared: HashSet<&str> = self
            .declaration
            .effective_properties
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        for (name, value) in fields {
            if name == CLASS_DISCRIMINATOR {
                if value.as_str() != Some(class) {
                    errors.push(ValidationError::new(
                        class,
                        CLASS_DISCRIMINATOR,
                        ValidationErrorKind::TypeMismatch,
                        format!("type discriminator {value} does not name '{class}'"),
                    ));
                }
            } else if !declared.contains(name.as_str()) {
                errors.push(ValidationError::new(
                    class,
                    name,
                    ValidationErrorKind::UnknownField,
                    format!("'{name}' is not a property of '{class}' or its ancestors"),
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn check_property(&self, property: &Property, value: &Value, errors: &mut Vec<ValidationError>) {
        let class = &self.declaration.fqn;
        if property.array {
            let Some(items) = value.as_array() else {
                errors.push(ValidationError::new(
                    class,
                    &property.name,
                    ValidationErrorKind::TypeMismatch,
                    format!("expected an array of {}, found {value}", property.kind.describe()),
                ));
                return;
            };
            for (index, item) in items.iter().enumerate() {
                let path = format!("{}[{index}]", property.name);
                if let Some(error) = self.check_value(property, &path, item) {
                    errors.push(error);
                }
            }
        } else if let Some(error) = self.check_value(property, &property.name, value) {
            errors.push(error);
        }
    }

    fn check_value(&self, property: &Property, path: &str, value: &Value) -> Option<ValidationError> {
        let class = &self.declaration.fqn;
        match &property.kind {
            PropertyKind::Relationship {
                target,
                target_id_regex,
            } => relation::check_reference(class, path, target, target_id_regex.as_ref(), value),
            kind => scalar::check_scalar(class, path, kind, value),
        }
    }
}
