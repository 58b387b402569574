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

//! Application configuration, loaded from TOML

use crate::domain::codec::{CodecOptions, SubtypePolicy};
use crate::infrastructure::constants::CONF_FILE_ENV;
use crate::shared::error::{FabricError, Result};
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FabricConfig {
    pub codec: CodecConf,
    pub catalog: CatalogConf,
    pub output: OutputConf,
}

impl FabricConfig {
    /// Load configuration from TOML file
    pub fn from<T: AsRef<str>>(path: T) -> Result<Self> {
        let content = read_to_string(path.as_ref()).map_err(|e| {
            FabricError::config_error(format!(
                "Failed to read config file {}: {}",
                path.as_ref(),
                e
            ))
        })?;

        Ok(toml::from_str(&content)?)
    }

    /// Explicit path first, then `FABRIC_MODELS_CONF`, then defaults.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from(path);
        }

        match std::env::var(CONF_FILE_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                tracing::debug!(path = %path, "using config file from {}", CONF_FILE_ENV);
                Self::from(path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn codec_options(&self) -> CodecOptions {
        CodecOptions {
            unknown_subtype: self.codec.unknown_subtype,
            pass_through: self.codec.pass_through,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConf {
    pub unknown_subtype: SubtypePolicy,
    pub pass_through: bool,
}

impl Default for CodecConf {
    fn default() -> Self {
        Self {
            unknown_subtype: SubtypePolicy::Fallback,
            pass_through: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConf {
    pub builtin: bool,
    pub files: Vec<String>,
}

impl Default for CatalogConf {
    fn default() -> Self {
        Self {
            builtin: true,
            files: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = FabricError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(FabricError::ConfigError(format!(
                "Invalid output format: {}",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConf {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl Default for OutputConf {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            pretty: true,
        }
    }
}
