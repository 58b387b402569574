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

use thiserror::Error;
pub type Result<T> = std::result::Result<T, FabricError>;

/// Top-level error for catalog loading, configuration and the codec.
#[derive(Error, Debug)]
pub enum FabricError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Catalog error: {0}")]
    CatalogError(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl FabricError {
    pub fn config_error(context: impl Into<String>) -> Self {
        Self::ConfigError(context.into())
    }

    pub fn catalog_error(context: impl Into<String>) -> Self {
        Self::CatalogError(context.into())
    }
}

/// Raised while building a `TypeRegistry` from catalog schemas.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Type '{0}' is defined more than once")]
    DuplicateType(String),

    #[error("Type '{type_name}' extends unknown base '{base}'")]
    UnknownBase { type_name: String, base: String },

    #[error("Inheritance cycle through type '{0}'")]
    InheritanceCycle(String),

    #[error("Subtype '{0}' has no discriminator_value")]
    MissingDiscriminatorValue(String),

    #[error("Subtype '{type_name}' extends '{root}', which declares no discriminator")]
    RootWithoutDiscriminator { type_name: String, root: String },

    #[error("Type '{type_name}' names discriminator '{attribute}' but declares no such attribute")]
    MissingDiscriminatorAttribute { type_name: String, attribute: String },

    #[error("Discriminator value '{value}' is claimed by both '{first}' and '{second}' under '{base}'")]
    DuplicateDiscriminatorValue {
        base: String,
        value: String,
        first: String,
        second: String,
    },

    #[error("Type '{type_name}' declares '{attribute}' more than once (name or wire key)")]
    DuplicateAttribute { type_name: String, attribute: String },

    #[error("Attribute '{type_name}.{attribute}' references unknown type '{model}'")]
    UnknownModel {
        type_name: String,
        attribute: String,
        model: String,
    },

    #[error("Invalid value kind '{0}'")]
    InvalidKind(String),

    #[error("Invalid schema for '{type_name}': {reason}")]
    Invalid { type_name: String, reason: String },
}

/// Raised by `Codec::decode`. Paths use `$` for the payload root.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Unknown model type '{0}'")]
    UnknownType(String),

    #[error("Payload for {type_name} is missing discriminator '{key}' at {path}")]
    MissingDiscriminator {
        type_name: String,
        key: String,
        path: String,
    },

    #[error("Discriminator value '{value}' is not a known subtype of {base} at {path}")]
    UnknownSubtype {
        base: String,
        value: String,
        path: String,
    },

    #[error("Missing required field '{attribute}' of {type_name} at {path}")]
    MissingRequiredField {
        type_name: String,
        attribute: String,
        path: String,
    },

    #[error("Cannot coerce {found} to {expected} for '{attribute}' at {path}")]
    TypeCoercion {
        attribute: String,
        expected: String,
        found: String,
        path: String,
    },

    #[error("Value of '{attribute}' at {path} violates {constraint}")]
    ConstraintViolation {
        attribute: String,
        constraint: String,
        path: String,
    },
}

/// Raised by `Codec::encode`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Unknown model type '{0}'")]
    UnknownType(String),

    #[error("Missing required field '{attribute}' of {type_name} at {path}")]
    MissingRequiredField {
        type_name: String,
        attribute: String,
        path: String,
    },

    #[error("Expected {expected} but found {found} for '{attribute}' at {path}")]
    TypeMismatch {
        attribute: String,
        expected: String,
        found: String,
        path: String,
    },

    #[error("Value of '{attribute}' at {path} violates {constraint}")]
    ConstraintViolation {
        attribute: String,
        constraint: String,
        path: String,
    },
}
