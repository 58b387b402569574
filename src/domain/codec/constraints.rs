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

use super::value::Value;
use crate::domain::schema::ResolvedAttribute;

/// Returns the first constraint `value` violates, described for error
/// messages. Constraints that do not apply to the value's kind are skipped.
pub(super) fn violation(attr: &ResolvedAttribute, value: &Value) -> Option<String> {
    let c = &attr.spec.constraints;
    if c.is_empty() {
        return None;
    }

    if let Some(n) = value.as_f64() {
        if let Some(min) = c.minimum.filter(|min| n < *min) {
            return Some(format!("minimum {} (got {})", min, n));
        }
        if let Some(max) = c.maximum.filter(|max| n > *max) {
            return Some(format!("maximum {} (got {})", max, n));
        }
    }

    let length = match value {
        Value::Str(s) => Some(s.chars().count()),
        Value::List(items) => Some(items.len()),
        Value::Map(map) => Some(map.len()),
        _ => None,
    };
    if let Some(len) = length {
        if let Some(min) = c.min_length.filter(|min| len < *min) {
            return Some(format!("min_length {} (got {})", min, len));
        }
        if let Some(max) = c.max_length.filter(|max| len > *max) {
            return Some(format!("max_length {} (got {})", max, len));
        }
    }

    if let (Value::Str(s), Some(pattern)) = (value, attr.pattern()) {
        if !pattern.is_match(s) {
            return Some(format!("pattern {}", pattern.as_str()));
        }
    }

    None
}
