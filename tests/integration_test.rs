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

use fabric_models::domain::schema::ResolvedAttribute;
use fabric_models::*;
use serde_json::{json, Map, Value as JsonValue};
use std::collections::BTreeMap;
use std::sync::Arc;

mod test_utils {
    use super::*;

    pub fn codec() -> Codec {
        Codec::new(Arc::new(builtin_registry().unwrap()))
    }

    pub fn payload(value: JsonValue) -> Map<String, JsonValue> {
        match value {
            JsonValue::Object(map) => map,
            other => panic!("payload must be an object, got {}", other),
        }
    }

    /// A fully populated instance of `type_name`, satisfying its constraints.
    pub fn sample_object(registry: &TypeRegistry, type_name: &str) -> DecodedObject {
        let ty = registry.get(type_name).unwrap();
        let mut object = DecodedObject::new(type_name);
        let disc_name = ty.discriminator().map(|d| d.name().to_string());

        for attr in ty.attributes() {
            if disc_name.as_deref() == Some(attr.name()) {
                let tag = ty.discriminator_value().unwrap_or("FutureKind");
                object.set(attr.name(), tag);
            } else {
                object.set(attr.name(), sample_value(registry, attr, attr.kind()));
            }
        }
        object
    }

    fn sample_value(registry: &TypeRegistry, attr: &ResolvedAttribute, kind: &ValueKind) -> Value {
        match kind {
            ValueKind::Str => {
                let text = match attr.pattern() {
                    Some(re) => ["cpu", "Low", "sample"]
                        .into_iter()
                        .find(|c| re.is_match(c))
                        .unwrap(),
                    None => "sample",
                };
                Value::from(text)
            }
            ValueKind::Int => Value::Int(attr.spec.constraints.minimum.map(|m| m as i64).unwrap_or(7)),
            ValueKind::Float => Value::Float(0.5),
            ValueKind::Bool => Value::Bool(true),
            ValueKind::DateTime => {
                Value::DateTime(chrono::DateTime::parse_from_rfc3339("2024-03-01T12:30:00Z").unwrap())
            }
            ValueKind::Object => Value::Json(json!({"MaxPercentUnhealthyNodes": 10})),
            ValueKind::Model(name) => {
                let concrete = registry
                    .subtypes_of(name)
                    .first()
                    .map(|t| t.name().to_string())
                    .unwrap_or_else(|| name.clone());
                Value::from(sample_object(registry, &concrete))
            }
            ValueKind::List(inner) => Value::List(vec![
                sample_value(registry, attr, inner),
                sample_value(registry, attr, inner),
            ]),
            ValueKind::Map(inner) => Value::Map(BTreeMap::from([(
                "key".to_string(),
                sample_value(registry, attr, inner),
            )])),
        }
    }
}

use test_utils::*;

#[test]
fn test_round_trip_every_catalog_type() {
    let codec = codec();
    let registry = codec.registry();

    for ty in registry.types() {
        let original = sample_object(registry, ty.name());
        let wire = codec
            .encode(&original)
            .unwrap_or_else(|e| panic!("encode {}: {}", ty.name(), e));
        let decoded = codec
            .decode(&wire, ty.root())
            .unwrap_or_else(|e| panic!("decode {}: {}", ty.name(), e));
        assert_eq!(decoded, original, "round trip of {}", ty.name());
    }
}

#[test]
fn test_decode_average_load_trigger() {
    let decoded = codec()
        .decode(&payload(json!({"kind": "AverageLoad"})), "AutoScalingTrigger")
        .unwrap();
    assert_eq!(decoded.type_name(), "AverageLoadScalingTrigger");
    assert_eq!(decoded.get_str("kind"), Some("AverageLoad"));
}

#[test]
fn test_decode_empty_payload_misses_discriminator() {
    let err = codec()
        .decode(&payload(json!({})), "AutoScalingTrigger")
        .unwrap_err();
    assert!(matches!(err, DecodeError::MissingDiscriminator { ref key, .. } if key == "kind"));
}

#[test]
fn test_unknown_discriminator_falls_back_to_base() {
    let decoded = codec()
        .decode(&payload(json!({"kind": "Unknown"})), "AutoScalingTrigger")
        .unwrap();
    assert_eq!(decoded.type_name(), "AutoScalingTrigger");
    assert_eq!(decoded.get_str("kind"), Some("Unknown"));

    let wire = codec().encode(&decoded).unwrap();
    assert_eq!(JsonValue::Object(wire), json!({"kind": "Unknown"}));
}

#[test]
fn test_missing_discriminator_for_every_polymorphic_type() {
    let codec = codec();
    for ty in codec.registry().types().filter(|t| t.is_polymorphic()) {
        let err = codec.decode(&Map::new(), ty.name()).unwrap_err();
        assert!(
            matches!(err, DecodeError::MissingDiscriminator { .. }),
            "{} gave {:?}",
            ty.name(),
            err
        );
    }
}

#[test]
fn test_missing_required_field_names_attribute() {
    let err = codec()
        .decode(
            &payload(json!({"kind": "AddRemoveReplica", "minCount": 1, "maxCount": 3})),
            "AutoScalingMechanism",
        )
        .unwrap_err();
    assert_eq!(
        err,
        DecodeError::MissingRequiredField {
            type_name: "AddRemoveReplicaScalingMechanism".to_string(),
            attribute: "scale_increment".to_string(),
            path: "$.scaleIncrement".to_string(),
        }
    );
}

#[test]
fn test_sparse_encoding_omits_unset_optional() {
    let trigger = DecodedObject::new("AverageLoadScalingTrigger").with("upper_load_threshold", 0.8);
    let wire = codec().encode(&trigger).unwrap();
    assert_eq!(
        JsonValue::Object(wire.clone()),
        json!({"kind": "AverageLoad", "upperLoadThreshold": 0.8})
    );
    assert!(!wire.contains_key("lowerLoadThreshold"));
    assert!(!wire.contains_key("metric"));
}

#[test]
fn test_unknown_keys_pass_through_round_trip() {
    let codec = codec();
    let input = json!({
        "kind": "AverageLoad",
        "upperLoadThreshold": 0.9,
        "serverAddedField": {"nested": [1, 2]}
    });
    let decoded = codec.decode_value(&input, "AutoScalingTrigger").unwrap();
    assert_eq!(
        decoded.extra().get("serverAddedField"),
        Some(&json!({"nested": [1, 2]}))
    );

    let wire = codec.encode(&decoded).unwrap();
    assert_eq!(JsonValue::Object(wire), input);
}

#[test]
fn test_strict_codec_rejects_unknown_discriminator() {
    let codec = Codec::with_options(
        Arc::new(builtin_registry().unwrap()),
        CodecOptions {
            unknown_subtype: SubtypePolicy::Reject,
            ..CodecOptions::default()
        },
    );
    let err = codec
        .decode(&payload(json!({"kind": "Unknown"})), "AutoScalingTrigger")
        .unwrap_err();
    assert!(matches!(err, DecodeError::UnknownSubtype { ref value, .. } if value == "Unknown"));
}

#[test]
fn test_codec_shared_across_threads() {
    let codec = codec();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let codec = codec.clone();
            std::thread::spawn(move || {
                let input = json!({"kind": "AddRemoveReplica", "minCount": i, "maxCount": 10, "scaleIncrement": 1});
                let decoded = codec.decode_value(&input, "AutoScalingMechanism").unwrap();
                codec.encode(&decoded).unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let wire = handle.join().unwrap();
        assert_eq!(wire.get("minCount"), Some(&json!(i)));
    }
}
