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
use super::{child_path, index_path, Codec, SubtypePolicy, ROOT_PATH};
use crate::domain::schema::{ResolvedAttribute, ResolvedType, ValueKind};
use crate::shared::error::DecodeError;
use chrono::DateTime;
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;

impl Codec {
    /// Decode `payload` against `base_type`, resolving the concrete subtype
    /// from the discriminator when the type has one.
    ///
    /// An unmapped discriminator value decodes as `base_type` itself unless
    /// the codec was built with `SubtypePolicy::Reject`.
    pub fn decode(
        &self,
        payload: &Map<String, JsonValue>,
        base_type: &str,
    ) -> Result<DecodedObject, DecodeError> {
        self.decode_object(payload, base_type, ROOT_PATH)
    }

    /// Like `decode`, for a payload not yet known to be a JSON object.
    pub fn decode_value(
        &self,
        payload: &JsonValue,
        base_type: &str,
    ) -> Result<DecodedObject, DecodeError> {
        match payload {
            JsonValue::Object(map) => self.decode(map, base_type),
            other => Err(DecodeError::TypeCoercion {
                attribute: base_type.to_string(),
                expected: base_type.to_string(),
                found: json_kind(other).to_string(),
                path: ROOT_PATH.to_string(),
            }),
        }
    }

    fn decode_object(
        &self,
        payload: &Map<String, JsonValue>,
        base_type: &str,
        path: &str,
    ) -> Result<DecodedObject, DecodeError> {
        let base = self
            .registry()
            .get(base_type)
            .ok_or_else(|| DecodeError::UnknownType(base_type.to_string()))?;

        let resolved = self.resolve(payload, base, path)?;

        let mut object = DecodedObject::new(resolved.name());
        for attr in resolved.attributes() {
            let attr_path = child_path(path, attr.key());
            let raw = match payload.get(attr.key()) {
                Some(JsonValue::Null) | None => {
                    if attr.is_required() {
                        return Err(DecodeError::MissingRequiredField {
                            type_name: resolved.name().to_string(),
                            attribute: attr.name().to_string(),
                            path: attr_path,
                        });
                    }
                    continue;
                }
                Some(raw) => raw,
            };

            let value = self.coerce(raw, attr.kind(), attr, &attr_path)?;
            if let Some(constraint) = violation(attr, &value) {
                return Err(DecodeError::ConstraintViolation {
                    attribute: attr.name().to_string(),
                    constraint,
                    path: attr_path,
                });
            }
            object.set(attr.name(), value);
        }

        if self.options().pass_through {
            for (key, raw) in payload {
                if !resolved.declares_key(key) {
                    object.extra_mut().insert(key.clone(), raw.clone());
                }
            }
        }

        Ok(object)
    }

    fn resolve<'r>(
        &'r self,
        payload: &Map<String, JsonValue>,
        base: &'r ResolvedType,
        path: &str,
    ) -> Result<&'r ResolvedType, DecodeError> {
        let Some(disc) = base.discriminator() else {
            return Ok(base);
        };

        let tag = match payload.get(disc.key()) {
            Some(JsonValue::String(tag)) => tag,
            Some(JsonValue::Null) | None => {
                return Err(DecodeError::MissingDiscriminator {
                    type_name: base.name().to_string(),
                    key: disc.key().to_string(),
                    path: path.to_string(),
                })
            }
            Some(other) => {
                return Err(DecodeError::TypeCoercion {
                    attribute: disc.name().to_string(),
                    expected: ValueKind::Str.to_string(),
                    found: json_kind(other).to_string(),
                    path: child_path(path, disc.key()),
                })
            }
        };

        if let Some(concrete) = self.registry().resolve_subtype(base.name(), tag) {
            tracing::debug!(base = base.name(), kind = %tag, resolved = concrete.name(), "resolved subtype");
            return Ok(concrete);
        }
        if base.discriminator_value() == Some(tag.as_str()) {
            return Ok(base);
        }

        match self.options().unknown_subtype {
            SubtypePolicy::Reject => Err(DecodeError::UnknownSubtype {
                base: base.name().to_string(),
                value: tag.clone(),
                path: path.to_string(),
            }),
            SubtypePolicy::Fallback => {
                tracing::warn!(
                    base = base.name(),
                    kind = %tag,
                    path,
                    "unknown discriminator value, decoding as base type"
                );
                Ok(base)
            }
        }
    }

    fn coerce(
        &self,
        raw: &JsonValue,
        kind: &ValueKind,
        attr: &ResolvedAttribute,
        path: &str,
    ) -> Result<Value, DecodeError> {
        let mismatch = || DecodeError::TypeCoercion {
            attribute: attr.name().to_string(),
            expected: kind.to_string(),
            found: json_kind(raw).to_string(),
            path: path.to_string(),
        };

        let value = match (kind, raw) {
            (ValueKind::Str, JsonValue::String(s)) => Value::Str(s.clone()),
            (ValueKind::Str, JsonValue::Number(n)) => Value::Str(n.to_string()),
            (ValueKind::Str, JsonValue::Bool(b)) => Value::Str(b.to_string()),

            (ValueKind::Int, JsonValue::Number(n)) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None if n.is_f64() => n
                    .as_f64()
                    .and_then(integral)
                    .map(Value::Int)
                    .ok_or_else(mismatch)?,
                None => return Err(mismatch()),
            },
            (ValueKind::Int, JsonValue::String(s)) => {
                s.trim().parse().map(Value::Int).map_err(|_| mismatch())?
            }

            (ValueKind::Float, JsonValue::Number(n)) => {
                n.as_f64().map(Value::Float).ok_or_else(mismatch)?
            }
            (ValueKind::Float, JsonValue::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::Float)
                .ok_or_else(mismatch)?,

            (ValueKind::Bool, JsonValue::Bool(b)) => Value::Bool(*b),
            (ValueKind::Bool, JsonValue::String(s)) => {
                if s.eq_ignore_ascii_case("true") {
                    Value::Bool(true)
                } else if s.eq_ignore_ascii_case("false") {
                    Value::Bool(false)
                } else {
                    return Err(mismatch());
                }
            }
            (ValueKind::Bool, JsonValue::Number(n)) => match n.as_i64() {
                Some(0) => Value::Bool(false),
                Some(1) => Value::Bool(true),
                _ => return Err(mismatch()),
            },

            (ValueKind::DateTime, JsonValue::String(s)) => DateTime::parse_from_rfc3339(s)
                .map(Value::DateTime)
                .map_err(|_| mismatch())?,

            (ValueKind::Object, raw) => Value::Json(raw.clone()),

            (ValueKind::Model(name), JsonValue::Object(map)) => {
                Value::Object(Box::new(self.decode_object(map, name, path)?))
            }

            (ValueKind::List(inner), JsonValue::Array(items)) => Value::List(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.coerce(item, inner, attr, &index_path(path, i)))
                    .collect::<Result<_, _>>()?,
            ),

            (ValueKind::Map(inner), JsonValue::Object(map)) => Value::Map(
                map.iter()
                    .map(|(k, v)| {
                        self.coerce(v, inner, attr, &child_path(path, k))
                            .map(|value| (k.clone(), value))
                    })
                    .collect::<Result<BTreeMap<_, _>, _>>()?,
            ),

            _ => return Err(mismatch()),
        };

        Ok(value)
    }
}

/// Largest magnitude at which every integer is exactly representable in an f64.
const MAX_EXACT_FLOAT_INT: f64 = 9_007_199_254_740_992.0;

fn integral(f: f64) -> Option<i64> {
    if f.fract() == 0.0 && f.abs() <= MAX_EXACT_FLOAT_INT {
        Some(f as i64)
    } else {
        None
    }
}

pub(crate) fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::codec::CodecOptions;
    use crate::domain::schema::{AttributeSpec, Constraints, TypeRegistry, TypeSchema};
    use serde_json::json;
    use std::sync::Arc;

    fn codec() -> Codec {
        let registry = TypeRegistry::builder()
            .register(
                TypeSchema::new("AutoScalingTrigger")
                    .with_discriminator("kind")
                    .with_attribute(AttributeSpec::new("kind", "kind", ValueKind::Str).required()),
            )
            .register(
                TypeSchema::new("AverageLoadScalingTrigger")
                    .extends("AutoScalingTrigger", "AverageLoad")
                    .with_attribute(AttributeSpec::new(
                        "upper_load_threshold",
                        "upperLoadThreshold",
                        ValueKind::Float,
                    ))
                    .with_attribute(AttributeSpec::new(
                        "scale_interval_in_seconds",
                        "scaleIntervalInSeconds",
                        ValueKind::Int,
                    ).with_constraints(Constraints {
                        minimum: Some(1.0),
                        ..Default::default()
                    })),
            )
            .register(
                TypeSchema::new("Settings")
                    .with_attribute(AttributeSpec::new("enabled", "Enabled", ValueKind::Bool))
                    .with_attribute(AttributeSpec::new(
                        "labels",
                        "Labels",
                        ValueKind::map_of(ValueKind::Str),
                    ))
                    .with_attribute(AttributeSpec::new(
                        "triggers",
                        "Triggers",
                        ValueKind::list_of(ValueKind::model("AutoScalingTrigger")),
                    ))
                    .with_attribute(AttributeSpec::new("raw", "Raw", ValueKind::Object)),
            )
            .build()
            .unwrap();
        Codec::new(Arc::new(registry))
    }

    fn obj(value: JsonValue) -> Map<String, JsonValue> {
        match value {
            JsonValue::Object(map) => map,
            _ => panic!("test payload must be an object"),
        }
    }

    #[test]
    fn test_lenient_scalar_coercion() {
        let decoded = codec()
            .decode(
                &obj(json!({
                    "kind": "AverageLoad",
                    "upperLoadThreshold": "0.75",
                    "scaleIntervalInSeconds": "60"
                })),
                "AutoScalingTrigger",
            )
            .unwrap();
        assert_eq!(decoded.get("upper_load_threshold"), Some(&Value::Float(0.75)));
        assert_eq!(decoded.get("scale_interval_in_seconds"), Some(&Value::Int(60)));

        let decoded = codec()
            .decode(
                &obj(json!({"kind": "AverageLoad", "scaleIntervalInSeconds": 30.0})),
                "AutoScalingTrigger",
            )
            .unwrap();
        assert_eq!(decoded.get("scale_interval_in_seconds"), Some(&Value::Int(30)));
    }

    #[test]
    fn test_int_outside_i64_range_rejected() {
        let codec = codec();
        for raw in [
            "18446744073709551615",
            "9223372036854775808",
            "-9223372036854775809",
            "1e300",
        ] {
            let payload: JsonValue = serde_json::from_str(&format!(
                r#"{{"kind": "AverageLoad", "scaleIntervalInSeconds": {}}}"#,
                raw
            ))
            .unwrap();
            let err = codec.decode_value(&payload, "AutoScalingTrigger").unwrap_err();
            assert!(
                matches!(err, DecodeError::TypeCoercion { ref path, .. } if path == "$.scaleIntervalInSeconds"),
                "{} decoded as {:?}",
                raw,
                err
            );
        }

        let decoded = codec
            .decode(
                &obj(json!({"kind": "AverageLoad", "scaleIntervalInSeconds": 9223372036854775807i64})),
                "AutoScalingTrigger",
            )
            .unwrap();
        assert_eq!(decoded.get("scale_interval_in_seconds"), Some(&Value::Int(i64::MAX)));

        let decoded = codec
            .decode(
                &obj(json!({"kind": "AverageLoad", "scaleIntervalInSeconds": 120.0})),
                "AutoScalingTrigger",
            )
            .unwrap();
        assert_eq!(decoded.get("scale_interval_in_seconds"), Some(&Value::Int(120)));
    }

    #[test]
    fn test_bool_accepts_strings_and_bits() {
        for (raw, expected) in [
            (json!(true), true),
            (json!("FALSE"), false),
            (json!(1), true),
            (json!(0), false),
        ] {
            let decoded = codec()
                .decode(&obj(json!({"Enabled": raw})), "Settings")
                .unwrap();
            assert_eq!(decoded.get("enabled"), Some(&Value::Bool(expected)));
        }
        let err = codec()
            .decode(&obj(json!({"Enabled": 2})), "Settings")
            .unwrap_err();
        assert!(matches!(err, DecodeError::TypeCoercion { .. }));
    }

    #[test]
    fn test_coercion_error_carries_nested_path() {
        let err = codec()
            .decode(
                &obj(json!({
                    "Triggers": [
                        {"kind": "AverageLoad"},
                        {"kind": "AverageLoad", "upperLoadThreshold": [1]}
                    ]
                })),
                "Settings",
            )
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::TypeCoercion {
                attribute: "upper_load_threshold".to_string(),
                expected: "float".to_string(),
                found: "array".to_string(),
                path: "$.Triggers[1].upperLoadThreshold".to_string(),
            }
        );
    }

    #[test]
    fn test_nested_missing_discriminator_reports_path() {
        let err = codec()
            .decode(&obj(json!({"Triggers": [{}]})), "Settings")
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingDiscriminator {
                type_name: "AutoScalingTrigger".to_string(),
                key: "kind".to_string(),
                path: "$.Triggers[0]".to_string(),
            }
        );
    }

    #[test]
    fn test_non_string_discriminator_rejected() {
        let err = codec()
            .decode(&obj(json!({"kind": 7})), "AutoScalingTrigger")
            .unwrap_err();
        assert!(matches!(err, DecodeError::TypeCoercion { ref path, .. } if path == "$.kind"));
    }

    #[test]
    fn test_null_counts_as_absent() {
        let err = codec()
            .decode(&obj(json!({"kind": null})), "AutoScalingTrigger")
            .unwrap_err();
        assert!(matches!(err, DecodeError::MissingDiscriminator { .. }));

        let decoded = codec()
            .decode(
                &obj(json!({"kind": "AverageLoad", "upperLoadThreshold": null})),
                "AutoScalingTrigger",
            )
            .unwrap();
        assert!(!decoded.contains("upper_load_threshold"));
    }

    #[test]
    fn test_constraint_violation() {
        let err = codec()
            .decode(
                &obj(json!({"kind": "AverageLoad", "scaleIntervalInSeconds": 0})),
                "AutoScalingTrigger",
            )
            .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::ConstraintViolation { ref attribute, .. } if attribute == "scale_interval_in_seconds"
        ));
    }

    #[test]
    fn test_map_and_untyped_object() {
        let decoded = codec()
            .decode(
                &obj(json!({
                    "Labels": {"tier": "front", "zone": 3},
                    "Raw": {"anything": [1, 2]}
                })),
                "Settings",
            )
            .unwrap();
        let labels = decoded.get("labels").and_then(Value::as_map).unwrap();
        assert_eq!(labels.get("zone"), Some(&Value::Str("3".to_string())));
        assert_eq!(
            decoded.get("raw"),
            Some(&Value::Json(json!({"anything": [1, 2]})))
        );
    }

    #[test]
    fn test_strict_policy_rejects_unknown_subtype() {
        let strict = Codec::with_options(
            Arc::new(codec().registry().clone()),
            CodecOptions {
                unknown_subtype: SubtypePolicy::Reject,
                pass_through: true,
            },
        );
        let err = strict
            .decode(&obj(json!({"kind": "Unknown"})), "AutoScalingTrigger")
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownSubtype {
                base: "AutoScalingTrigger".to_string(),
                value: "Unknown".to_string(),
                path: "$".to_string(),
            }
        );
    }

    #[test]
    fn test_decode_against_concrete_type_with_own_tag() {
        let decoded = codec()
            .decode(
                &obj(json!({"kind": "AverageLoad"})),
                "AverageLoadScalingTrigger",
            )
            .unwrap();
        assert_eq!(decoded.type_name(), "AverageLoadScalingTrigger");
    }

    #[test]
    fn test_pass_through_can_be_disabled() {
        let dropping = Codec::with_options(
            Arc::new(codec().registry().clone()),
            CodecOptions {
                unknown_subtype: SubtypePolicy::Fallback,
                pass_through: false,
            },
        );
        let decoded = dropping
            .decode(&obj(json!({"kind": "AverageLoad", "Extra": 1})), "AutoScalingTrigger")
            .unwrap();
        assert!(decoded.extra().is_empty());
    }

    #[test]
    fn test_decode_value_requires_object() {
        let err = codec()
            .decode_value(&json!([1, 2]), "AutoScalingTrigger")
            .unwrap_err();
        assert!(matches!(err, DecodeError::TypeCoercion { ref found, .. } if found == "array"));
    }

    #[test]
    fn test_unknown_base_type() {
        let err = codec().decode(&Map::new(), "Nope").unwrap_err();
        assert_eq!(err, DecodeError::UnknownType("Nope".to_string()));
    }
}
