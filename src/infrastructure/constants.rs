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

/// Environment variable naming the default configuration file
pub const CONF_FILE_ENV: &str = "FABRIC_MODELS_CONF";

/// Prefix marking a command-line argument as a path to a JSON file
pub const FILE_ARG_PREFIX: char = '@';

/// Dynamic configuration keys (-D key=value)
pub const KEY_UNKNOWN_SUBTYPE: &str = "codec.unknown-subtype";
pub const KEY_PASS_THROUGH: &str = "codec.pass-through";
pub const KEY_CATALOG_BUILTIN: &str = "catalog.builtin";
pub const KEY_CATALOG_FILES: &str = "catalog.files";
pub const KEY_OUTPUT_FORMAT: &str = "output.format";
pub const KEY_OUTPUT_PRETTY: &str = "output.pretty";
