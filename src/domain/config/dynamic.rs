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

use super::fabric::{FabricConfig, OutputFormat};
use crate::domain::codec::SubtypePolicy;
use crate::infrastructure::constants::{
    KEY_CATALOG_BUILTIN, KEY_CATALOG_FILES, KEY_OUTPUT_FORMAT, KEY_OUTPUT_PRETTY,
    KEY_PASS_THROUGH, KEY_UNKNOWN_SUBTYPE,
};
use crate::shared::error::{FabricError, Result};
use std::collections::HashMap;

/// Parse dynamic configuration properties from -D key=value format
pub fn parse_dynamic_configs(configs: &[String]) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();

    for config in configs {
        let Some((key, value)) = config.split_once('=') else {
            return Err(FabricError::config_error(format!(
                "Invalid config format: '{}'. Expected 'key=value'",
                config
            )));
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(FabricError::config_error(format!(
                "Empty key in config: '{}'",
                config
            )));
        }

        map.insert(key.to_string(), value.trim().to_string());
    }

    Ok(map)
}

/// Apply -D overrides on top of a loaded configuration.
pub fn apply_to_config(configs: &HashMap<String, String>, conf: &mut FabricConfig) -> Result<()> {
    for key in configs.keys() {
        if ![
            KEY_UNKNOWN_SUBTYPE,
            KEY_PASS_THROUGH,
            KEY_CATALOG_BUILTIN,
            KEY_CATALOG_FILES,
            KEY_OUTPUT_FORMAT,
            KEY_OUTPUT_PRETTY,
        ]
        .contains(&key.as_str())
        {
            return Err(FabricError::config_error(format!(
                "Unknown configuration key: {}",
                key
            )));
        }
    }

    if let Some(policy) = configs.get(KEY_UNKNOWN_SUBTYPE) {
        conf.codec.unknown_subtype = policy.parse::<SubtypePolicy>()?;
    }

    if let Some(flag) = configs.get(KEY_PASS_THROUGH) {
        conf.codec.pass_through = parse_flag(KEY_PASS_THROUGH, flag)?;
    }

    if let Some(flag) = configs.get(KEY_CATALOG_BUILTIN) {
        conf.catalog.builtin = parse_flag(KEY_CATALOG_BUILTIN, flag)?;
    }

    if let Some(files) = configs.get(KEY_CATALOG_FILES) {
        conf.catalog.files.extend(
            files
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(String::from),
        );
    }

    if let Some(format) = configs.get(KEY_OUTPUT_FORMAT) {
        conf.output.format = format.parse::<OutputFormat>()?;
    }

    if let Some(flag) = configs.get(KEY_OUTPUT_PRETTY) {
        conf.output.pretty = parse_flag(KEY_OUTPUT_PRETTY, flag)?;
    }

    Ok(())
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(FabricError::config_error(format!(
            "Invalid boolean for {}: {}",
            key, value
        ))),
    }
}
