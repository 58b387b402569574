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

//! Value kinds, written in catalogs with the generated models' type strings:
//! `str`, `int`, `float`, `bool`, `iso-8601`, `object`, a model name,
//! `[kind]` for sequences and `{kind}` for string-keyed maps.

use crate::shared::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ValueKind {
    Str,
    Int,
    Float,
    Bool,
    /// RFC 3339 timestamp.
    DateTime,
    /// Untyped JSON, passed through as-is.
    Object,
    /// Nested model decoded against the named type.
    Model(String),
    List(Box<ValueKind>),
    Map(Box<ValueKind>),
}

impl ValueKind {
    pub fn model(name: impl Into<String>) -> Self {
        Self::Model(name.into())
    }

    pub fn list_of(inner: ValueKind) -> Self {
        Self::List(Box::new(inner))
    }

    pub fn map_of(inner: ValueKind) -> Self {
        Self::Map(Box::new(inner))
    }

    /// The model name this kind ultimately refers to, looking through
    /// sequences and maps.
    pub fn referenced_model(&self) -> Option<&str> {
        match self {
            Self::Model(name) => Some(name),
            Self::List(inner) | Self::Map(inner) => inner.referenced_model(),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Str | Self::Int | Self::Float | Self::Bool | Self::DateTime
        )
    }
}

impl std::str::FromStr for ValueKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(inner) = s.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            return Ok(Self::list_of(inner.parse()?));
        }
        if let Some(inner) = s.strip_prefix('{').and_then(|r| r.strip_suffix('}')) {
            return Ok(Self::map_of(inner.parse()?));
        }

        match s {
            "str" | "string" => Ok(Self::Str),
            "int" | "long" => Ok(Self::Int),
            "float" | "double" => Ok(Self::Float),
            "bool" => Ok(Self::Bool),
            "iso-8601" => Ok(Self::DateTime),
            "object" => Ok(Self::Object),
            name if is_model_name(name) => Ok(Self::Model(name.to_string())),
            _ => Err(SchemaError::InvalidKind(s.to_string())),
        }
    }
}

impl TryFrom<String> for ValueKind {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ValueKind> for String {
    fn from(kind: ValueKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str => f.write_str("str"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Bool => f.write_str("bool"),
            Self::DateTime => f.write_str("iso-8601"),
            Self::Object => f.write_str("object"),
            Self::Model(name) => f.write_str(name),
            Self::List(inner) => write!(f, "[{}]", inner),
            Self::Map(inner) => write!(f, "{{{}}}", inner),
        }
    }
}

fn is_model_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalar_kinds() {
        assert_eq!("str".parse::<ValueKind>().unwrap(), ValueKind::Str);
        assert_eq!("long".parse::<ValueKind>().unwrap(), ValueKind::Int);
        assert_eq!("double".parse::<ValueKind>().unwrap(), ValueKind::Float);
        assert_eq!("iso-8601".parse::<ValueKind>().unwrap(), ValueKind::DateTime);
    }

    #[test]
    fn test_parse_nested_kinds() {
        let kind: ValueKind = "[ScalingPolicyDescription]".parse().unwrap();
        assert_eq!(
            kind,
            ValueKind::list_of(ValueKind::model("ScalingPolicyDescription"))
        );
        assert_eq!(kind.referenced_model(), Some("ScalingPolicyDescription"));

        let kind: ValueKind = "{[str]}".parse().unwrap();
        assert_eq!(kind, ValueKind::map_of(ValueKind::list_of(ValueKind::Str)));
        assert_eq!(kind.to_string(), "{[str]}");
        assert_eq!(kind.referenced_model(), None);
    }

    #[test]
    fn test_scalar_kinds() {
        for scalar in ["str", "int", "float", "bool", "iso-8601"] {
            assert!(scalar.parse::<ValueKind>().unwrap().is_scalar(), "{}", scalar);
        }
        assert!(!ValueKind::Object.is_scalar());
        assert!(!ValueKind::model("ChaosContext").is_scalar());
        assert!(!ValueKind::list_of(ValueKind::Str).is_scalar());
        assert!(!ValueKind::map_of(ValueKind::Int).is_scalar());
    }

    #[test]
    fn test_reject_malformed_kinds() {
        assert!("".parse::<ValueKind>().is_err());
        assert!("lowercase".parse::<ValueKind>().is_err());
        assert!("[str".parse::<ValueKind>().is_err());
        assert!("Has Space".parse::<ValueKind>().is_err());
    }

    #[test]
    fn test_kind_deserializes_from_yaml_string() {
        let kinds: Vec<ValueKind> = serde_yaml::from_str("[int, '[str]', AutoScalingTrigger]").unwrap();
        assert_eq!(
            kinds,
            vec![
                ValueKind::Int,
                ValueKind::list_of(ValueKind::Str),
                ValueKind::model("AutoScalingTrigger"),
            ]
        );
    }
}
