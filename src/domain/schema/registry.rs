// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Immutable type registry built once from catalog schemas.

use super::kind::ValueKind;
use super::types::{AttributeSpec, TypeSchema};
use crate::shared::error::SchemaError;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// An attribute with its pattern constraint compiled.
#[derive(Debug, Clone)]
pub struct ResolvedAttribute {
    pub spec: AttributeSpec,
    pattern: Option<Regex>,
}

impl ResolvedAttribute {
    fn compile(type_name: &str, spec: AttributeSpec) -> Result<Self, SchemaError> {
        let pattern = match spec.constraints.pattern {
            Some(ref p) => Some(Regex::new(p).map_err(|e| SchemaError::Invalid {
                type_name: type_name.to_string(),
                reason: format!("attribute '{}' has invalid pattern: {}", spec.name, e),
            })?),
            None => None,
        };
        Ok(Self { spec, pattern })
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn key(&self) -> &str {
        &self.spec.key
    }

    pub fn kind(&self) -> &ValueKind {
        &self.spec.kind
    }

    pub fn is_required(&self) -> bool {
        self.spec.required
    }

    pub fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }
}

/// A schema with inheritance flattened.
#[derive(Debug, Clone)]
pub struct ResolvedType {
    schema: TypeSchema,
    root: String,
    ancestors: Vec<String>,
    attributes: Vec<ResolvedAttribute>,
    discriminator: Option<usize>,
}

impl ResolvedType {
    pub fn name(&self) -> &str {
        &self.schema.name
    }

    pub fn schema(&self) -> &TypeSchema {
        &self.schema
    }

    /// Topmost ancestor, or the type itself.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Ancestors, nearest first.
    pub fn ancestors(&self) -> &[String] {
        &self.ancestors
    }

    /// Every attribute, ancestors' first, in declaration order.
    pub fn attributes(&self) -> &[ResolvedAttribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&ResolvedAttribute> {
        self.attributes.iter().find(|a| a.spec.name == name)
    }

    /// The discriminator attribute inherited from the root, if any.
    pub fn discriminator(&self) -> Option<&ResolvedAttribute> {
        self.discriminator.map(|i| &self.attributes[i])
    }

    pub fn discriminator_value(&self) -> Option<&str> {
        self.schema.discriminator_value.as_deref()
    }

    pub fn is_polymorphic(&self) -> bool {
        self.discriminator.is_some()
    }

    pub fn declares_key(&self, key: &str) -> bool {
        self.attributes.iter().any(|a| a.spec.key == key)
    }

    pub fn extends(&self, base: &str) -> bool {
        self.ancestors.iter().any(|a| a == base)
    }
}

/// Discriminator lookup plus every resolved schema, read-only after `build`.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<String, ResolvedType>,
    order: Vec<String>,
    subtypes: HashMap<String, HashMap<String, String>>,
}

impl TypeRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&ResolvedType> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Concrete type registered under `base` for a discriminator value.
    pub fn resolve_subtype(&self, base: &str, value: &str) -> Option<&ResolvedType> {
        self.subtypes
            .get(base)
            .and_then(|values| values.get(value))
            .and_then(|name| self.types.get(name))
    }

    /// True when `type_name` is `target` or one of its subtypes.
    pub fn is_assignable(&self, type_name: &str, target: &str) -> bool {
        type_name == target
            || self
                .types
                .get(type_name)
                .is_some_and(|t| t.extends(target))
    }

    /// Direct and indirect subtypes of `base`, in catalog order.
    pub fn subtypes_of(&self, base: &str) -> Vec<&ResolvedType> {
        self.types()
            .filter(|t| t.extends(base))
            .collect()
    }

    /// All types in catalog order.
    pub fn types(&self) -> impl Iterator<Item = &ResolvedType> {
        self.order.iter().filter_map(|name| self.types.get(name))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    schemas: Vec<TypeSchema>,
}

impl RegistryBuilder {
    pub fn register(mut self, schema: TypeSchema) -> Self {
        self.schemas.push(schema);
        self
    }

    pub fn extend(mut self, schemas: impl IntoIterator<Item = TypeSchema>) -> Self {
        self.schemas.extend(schemas);
        self
    }

    pub fn build(self) -> Result<TypeRegistry, SchemaError> {
        let mut by_name: HashMap<&str, &TypeSchema> = HashMap::new();
        for schema in &self.schemas {
            if by_name.insert(schema.name.as_str(), schema).is_some() {
                return Err(SchemaError::DuplicateType(schema.name.clone()));
            }
        }

        let mut registry = TypeRegistry::default();

        for schema in &self.schemas {
            let ancestors = ancestor_chain(schema, &by_name)?;
            let root_schema = ancestors
                .last()
                .and_then(|name| by_name.get(name.as_str()).copied())
                .unwrap_or(schema);

            if schema.base.is_some() {
                if schema.discriminator_value.is_none() {
                    return Err(SchemaError::MissingDiscriminatorValue(schema.name.clone()));
                }
                if root_schema.discriminator.is_none() {
                    return Err(SchemaError::RootWithoutDiscriminator {
                        type_name: schema.name.clone(),
                        root: root_schema.name.clone(),
                    });
                }
                if schema.discriminator.is_some() {
                    return Err(SchemaError::Invalid {
                        type_name: schema.name.clone(),
                        reason: "only the root of a family may declare a discriminator"
                            .to_string(),
                    });
                }
            }

            // Root first so inherited attributes lead.
            let mut lineage: Vec<&TypeSchema> = ancestors
                .iter()
                .rev()
                .filter_map(|name| by_name.get(name.as_str()).copied())
                .collect();
            lineage.push(schema);

            let attributes = flatten_attributes(&schema.name, &lineage)?;
            for attr in &attributes {
                check_attribute(&schema.name, &attr.spec, &by_name)?;
            }

            let discriminator = match root_schema.discriminator {
                Some(ref disc) => {
                    let index = attributes
                        .iter()
                        .position(|a| &a.spec.name == disc)
                        .ok_or_else(|| SchemaError::MissingDiscriminatorAttribute {
                            type_name: root_schema.name.clone(),
                            attribute: disc.clone(),
                        })?;
                    if attributes[index].spec.kind != ValueKind::Str {
                        return Err(SchemaError::Invalid {
                            type_name: root_schema.name.clone(),
                            reason: format!("discriminator '{}' must be of kind str", disc),
                        });
                    }
                    Some(index)
                }
                None => None,
            };

            if let Some(ref value) = schema.discriminator_value {
                for ancestor in &ancestors {
                    let values = registry.subtypes.entry(ancestor.clone()).or_default();
                    if let Some(first) = values.get(value) {
                        return Err(SchemaError::DuplicateDiscriminatorValue {
                            base: ancestor.clone(),
                            value: value.clone(),
                            first: first.clone(),
                            second: schema.name.clone(),
                        });
                    }
                    values.insert(value.clone(), schema.name.clone());
                }
            }

            registry.order.push(schema.name.clone());
            registry.types.insert(
                schema.name.clone(),
                ResolvedType {
                    schema: schema.clone(),
                    root: root_schema.name.clone(),
                    ancestors,
                    attributes,
                    discriminator,
                },
            );
        }

        tracing::debug!(
            types = registry.len(),
            families = registry.subtypes.len(),
            "type registry built"
        );

        Ok(registry)
    }
}

fn ancestor_chain(
    schema: &TypeSchema,
    by_name: &HashMap<&str, &TypeSchema>,
) -> Result<Vec<String>, SchemaError> {
    let mut chain = Vec::new();
    let mut seen = HashSet::from([schema.name.as_str()]);
    let mut current = schema;

    while let Some(ref base) = current.base {
        let parent = by_name
            .get(base.as_str())
            .copied()
            .ok_or_else(|| SchemaError::UnknownBase {
                type_name: current.name.clone(),
                base: base.clone(),
            })?;
        if !seen.insert(parent.name.as_str()) {
            return Err(SchemaError::InheritanceCycle(schema.name.clone()));
        }
        chain.push(parent.name.clone());
        current = parent;
    }

    Ok(chain)
}

fn flatten_attributes(
    type_name: &str,
    lineage: &[&TypeSchema],
) -> Result<Vec<ResolvedAttribute>, SchemaError> {
    let mut names = HashSet::new();
    let mut keys = HashSet::new();
    let mut attributes = Vec::new();

    for spec in lineage.iter().flat_map(|s| s.attributes.iter()) {
        if !names.insert(spec.name.as_str()) || !keys.insert(spec.key.as_str()) {
            return Err(SchemaError::DuplicateAttribute {
                type_name: type_name.to_string(),
                attribute: spec.name.clone(),
            });
        }
        attributes.push(ResolvedAttribute::compile(type_name, spec.clone())?);
    }

    Ok(attributes)
}

fn check_attribute(
    type_name: &str,
    spec: &AttributeSpec,
    by_name: &HashMap<&str, &TypeSchema>,
) -> Result<(), SchemaError> {
    if let Some(model) = spec.kind.referenced_model() {
        if !by_name.contains_key(model) {
            return Err(SchemaError::UnknownModel {
                type_name: type_name.to_string(),
                attribute: spec.name.clone(),
                model: model.to_string(),
            });
        }
    }

    let c = &spec.constraints;
    let inverted = matches!((c.minimum, c.maximum), (Some(lo), Some(hi)) if lo > hi)
        || matches!((c.min_length, c.max_length), (Some(lo), Some(hi)) if lo > hi);
    if inverted {
        return Err(SchemaError::Invalid {
            type_name: type_name.to_string(),
            reason: format!("attribute '{}' has inverted bounds", spec.name),
        });
    }

    Ok(())
}
