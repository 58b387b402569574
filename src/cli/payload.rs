//! JSON argument handling
//!
//! Arguments are either inline JSON or `@path` to a file holding the JSON.

use crate::infrastructure::constants::FILE_ARG_PREFIX;
use anyhow::Context;
use serde_json::Value as JsonValue;
use std::fs::read_to_string;

/// Convert a JSON argument string, or an `@`-prefixed file path, into a JSON value.
pub fn json_encoded(arg: &str) -> anyhow::Result<JsonValue> {
    if let Some(path) = arg.strip_prefix(FILE_ARG_PREFIX) {
        let content =
            read_to_string(path).with_context(|| format!("File not found at {}", path))?;
        return serde_json::from_str(&content)
            .with_context(|| format!("Decoding JSON value from file {} failed", path));
    }

    serde_json::from_str(arg).context(
        "Loading JSON from string input failed. \
         You can also pass the JSON argument in a file: \
         set the argument value to the file path prefixed by \"@\"",
    )
}
