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

//! Schema catalog loading
//!
//! The builtin Service Fabric catalog is compiled into the binary. Extra
//! catalogs may add types at startup; they cannot redefine builtin ones.

use crate::domain::schema::{TypeRegistry, TypeSchema};
use crate::shared::error::{FabricError, Result};
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

const BUILTIN_CATALOG: &str = include_str!("servicefabric.yaml");

/// A catalog file: `{ version, types: [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub types: Vec<TypeSchema>,
}

impl CatalogDocument {
    pub fn builtin() -> Result<Self> {
        Ok(serde_yaml::from_str(BUILTIN_CATALOG)?)
    }

    /// Load from disk; `.json` files are parsed as JSON, anything else as YAML.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = read_to_string(path).map_err(|e| {
            FabricError::catalog_error(format!(
                "Failed to read catalog file {}: {}",
                path.display(),
                e
            ))
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let document = if is_json {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        Ok(document)
    }
}

/// Collects catalog documents and builds the registry once.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    include_builtin: bool,
    files: Vec<PathBuf>,
}

impl Default for CatalogLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogLoader {
    pub fn new() -> Self {
        Self {
            include_builtin: true,
            files: Vec::new(),
        }
    }

    pub fn with_builtin(mut self, include: bool) -> Self {
        self.include_builtin = include;
        self
    }

    pub fn add_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    pub fn add_files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.files.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn load(&self) -> Result<TypeRegistry> {
        let mut builder = TypeRegistry::builder();

        if self.include_builtin {
            let builtin = CatalogDocument::builtin()?;
            tracing::debug!(
                version = builtin.version.as_deref().unwrap_or("unversioned"),
                types = builtin.types.len(),
                "loaded builtin catalog"
            );
            builder = builder.extend(builtin.types);
        }

        for path in &self.files {
            let document = CatalogDocument::from_path(path)?;
            tracing::info!(
                path = %path.display(),
                types = document.types.len(),
                "loaded catalog file"
            );
            builder = builder.extend(document.types);
        }

        let registry = builder.build()?;
        if registry.is_empty() {
            return Err(FabricError::catalog_error(
                "No model types loaded; enable the builtin catalog or pass --catalog",
            ));
        }

        Ok(registry)
    }
}

/// Registry over the builtin catalog only.
pub fn builtin_registry() -> Result<TypeRegistry> {
    CatalogLoader::new().load()
}
