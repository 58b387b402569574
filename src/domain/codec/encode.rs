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

use super::constraints::violation;
use super::value::{DecodedObject, Value};
use super::{child_path, index_path, Codec, ROOT_PATH};
use crate::domain::schema::{ResolvedAttribute, ValueKind};
use crate::shared::error::EncodeError;
use chrono::SecondsFormat;
use serde_json::{Map, Number, Value as JsonValue};

impl Codec {
    /// Encode `object` back to its wire shape.
    ///
    /// The discriminator is always emitted first and derived from the
    /// object's resolved type. Unset optional attributes are omitted;
    /// pass-through keys follow the declared attributes.
    pub fn encode(&self, object: &DecodedObject) -> Result<Map<String, JsonValue>, EncodeError> {
        self.encode_object(object, ROOT_PATH)
    }

    fn encode_object(
        &self,
        object: &DecodedObject,
        path: &str,
    ) -> Result<Map<String, JsonValue>, EncodeError> {
        let resolved = self
            .registry()
            .get(object.type_name())
            .ok_or_else(|| EncodeError::UnknownType(object.type_name().to_string()))?;

        let mut out = Map::new();

        let disc = resolved.discriminator();
        if let Some(disc) = disc {
            // A concrete type re-emits its own tag unless the object holds a tag
            // unknown to the whole hierarchy, which is a fallback decode to keep.
            let tag = match (resolved.discriminator_value(), object.get(disc.name())) {
                (Some(own), Some(Value::Str(stored)))
                    if stored != own
                        && self
                            .registry()
                            .resolve_subtype(resolved.root(), stored)
                            .is_none() =>
                {
                    stored.clone()
                }
                (Some(own), _) => own.to_string(),
                (None, Some(Value::Str(tag))) => tag.clone(),
                (None, Some(other)) => {
                    return Err(EncodeError::TypeMismatch {
                        attribute: disc.name().to_string(),
                        expected: ValueKind::Str.to_string(),
                        found: other.kind_name().to_string(),
                        path: child_path(path, disc.key()),
                    })
                }
                (None, None) => {
                    return Err(EncodeError::MissingRequiredField {
                        type_name: resolved.name().to_string(),
                        attribute: disc.name().to_string(),
                        path: child_path(path, disc.key()),
                    })
                }
            };
            out.insert(disc.key().to_string(), JsonValue::String(tag));
        }

        for attr in resolved.attributes() {
            if disc.is_some_and(|d| d.name() == attr.name()) {
                continue;
            }

            let attr_path = child_path(path, attr.key());
            let Some(value) = object.get(attr.name()) else {
                if attr.is_required() {
                    return Err(EncodeError::MissingRequiredField {
                        type_name: resolved.name().to_string(),
                        attribute: attr.name().to_string(),
                        path: attr_path,
                    });
                }
                continue;
            };

            if let Some(constraint) = violation(attr, value) {
                return Err(EncodeError::ConstraintViolation {
                    attribute: attr.name().to_string(),
                    constraint,
                    path: attr_path,
                });
            }
            let emitted = self.emit(value, attr.kind(), attr, &attr_path)?;
            out.insert(attr.key().to_string(), emitted);
        }

        for (key, raw) in object.extra() {
            if !out.contains_key(key) && !resolved.declares_key(key) {
                out.insert(key.clone(), raw.clone());
            }
        }

        Ok(out)
    }

    fn emit(
        &self,
        value: &Value,
        kind: &ValueKind,
        attr: &ResolvedAttribute,
        path: &str,
    ) -> Result<JsonValue, EncodeError> {
        let mismatch = |found: &str| EncodeError::TypeMismatch {
            attribute: attr.name().to_string(),
            expected: kind.to_string(),
            found: found.to_string(),
            path: path.to_string(),
        };

        let json = match (kind, value) {
            (ValueKind::Str, Value::Str(s)) => JsonValue::String(s.clone()),
            (ValueKind::Int, Value::Int(i)) => JsonValue::from(*i),
            (ValueKind::Float, Value::Float(_) | Value::Int(_)) => value
                .as_f64()
                .and_then(Number::from_f64)
                .map(JsonValue::Number)
                .ok_or_else(|| mismatch("non-finite float"))?,
            (ValueKind::Bool, Value::Bool(b)) => JsonValue::Bool(*b),
            (ValueKind::DateTime, Value::DateTime(dt)) => {
                JsonValue::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            (ValueKind::Object, Value::Json(raw)) => raw.clone(),

            (ValueKind::Model(name), Value::Object(nested)) => {
                if !self.registry().is_assignable(nested.type_name(), name) {
                    return Err(mismatch(nested.type_name()));
                }
                JsonValue::Object(self.encode_object(nested, path)?)
            }

            (ValueKind::List(inner), Value::List(items)) => JsonValue::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.emit(item, inner, attr, &index_path(path, i)))
                    .collect::<Result<_, _>>()?,
            ),

            (ValueKind::Map(inner), Value::Map(map)) => JsonValue::Object(
                map.iter()
                    .map(|(k, v)| {
                        self.emit(v, inner, attr, &child_path(path, k))
                            .map(|json| (k.clone(), json))
                    })
                    .collect::<Result<Map<_, _>, _>>()?,
            ),

            (_, other) => return Err(mismatch(other.kind_name())),
        };

        Ok(json)
    }
}
