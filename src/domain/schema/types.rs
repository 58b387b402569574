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

use super::kind::ValueKind;
use serde::{Deserialize, Serialize};

/// Optional value constraints checked after coercion and before encoding.
///
/// `minimum`/`maximum` apply to numbers, `min_length`/`max_length` to
/// strings (in characters), sequences and maps, `pattern` to strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl Constraints {
    pub fn is_empty(&self) -> bool {
        self.minimum.is_none()
            && self.maximum.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.pattern.is_none()
    }

    /// Short human form, e.g. `min=1, pattern=^fabric:`.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(v) = self.minimum {
            parts.push(format!("min={}", v));
        }
        if let Some(v) = self.maximum {
            parts.push(format!("max={}", v));
        }
        if let Some(v) = self.min_length {
            parts.push(format!("min_len={}", v));
        }
        if let Some(v) = self.max_length {
            parts.push(format!("max_len={}", v));
        }
        if let Some(ref p) = self.pattern {
            parts.push(format!("pattern={}", p));
        }
        parts.join(", ")
    }
}

/// One attribute row: attribute name, wire key, value kind, required flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSpec {
    pub name: String,
    pub key: String,
    #[serde(rename = "type")]
    pub kind: ValueKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Constraints::is_empty")]
    pub constraints: Constraints,
}

impl AttributeSpec {
    pub fn new(name: impl Into<String>, key: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            kind,
            required: false,
            constraints: Constraints::default(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }
}

/// Declarative description of a decodable type.
///
/// Roots of a polymorphic family set `discriminator` to the name of one of
/// their attributes. Subtypes set `base` and `discriminator_value` and
/// inherit every ancestor attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator_value: Option<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeSpec>,
}

impl TypeSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            base: None,
            discriminator: None,
            discriminator_value: None,
            attributes: Vec::new(),
        }
    }

    pub fn with_discriminator(mut self, attribute: impl Into<String>) -> Self {
        self.discriminator = Some(attribute.into());
        self
    }

    pub fn extends(mut self, base: impl Into<String>, value: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self.discriminator_value = Some(value.into());
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeSpec) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
