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

//! Discriminated model codec
//!
//! Decodes wire payloads into `DecodedObject`s chosen by a discriminator and
//! encodes them back to the same shape. The codec holds nothing but a shared
//! read-only registry, so clones can be used from any thread.

mod constraints;
mod decode;
mod encode;
pub mod value;

pub use self::value::{DecodedObject, Value};

use crate::domain::schema::TypeRegistry;
use crate::shared::error::FabricError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What to do with a discriminator value the registry does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubtypePolicy {
    /// Decode as the requested base type, keeping the raw tag.
    #[default]
    Fallback,
    /// Fail with `DecodeError::UnknownSubtype`.
    Reject,
}

impl std::str::FromStr for SubtypePolicy {
    type Err = FabricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fallback" => Ok(SubtypePolicy::Fallback),
            "reject" | "strict" => Ok(SubtypePolicy::Reject),
            _ => Err(FabricError::ConfigError(format!(
                "Invalid unknown-subtype policy: {}",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    pub unknown_subtype: SubtypePolicy,
    /// Keep wire keys the schema does not declare.
    pub pass_through: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            unknown_subtype: SubtypePolicy::Fallback,
            pass_through: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Codec {
    registry: Arc<TypeRegistry>,
    options: CodecOptions,
}

impl Codec {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self::with_options(registry, CodecOptions::default())
    }

    pub fn with_options(registry: Arc<TypeRegistry>, options: CodecOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn options(&self) -> CodecOptions {
        self.options
    }
}

pub(crate) const ROOT_PATH: &str = "$";

pub(crate) fn child_path(path: &str, key: &str) -> String {
    format!("{}.{}", path, key)
}

pub(crate) fn index_path(path: &str, index: usize) -> String {
    format!("{}[{}]", path, index)
}
