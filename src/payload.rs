//! Typed field access over a parsed webhook payload.
//!
//! GitHub payloads arrive as untyped JSON; the translator only ever needs a
//! handful of leaf values per event. These helpers walk a key path and hand
//! back the leaf in the requested shape, or a `FieldError` naming the path
//! that failed and why.

use serde_json::Value;

/// Error resolving a field path inside a webhook payload.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("no value at '{path}'")]
    PathNotFound { path: String },

    #[error("'{path}' is {found}, expected {expected}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Helper type for Results that use FieldError
pub type Result<T> = std::result::Result<T, FieldError>;

/// Resolves `path` to a string leaf.
pub fn string_at<'a>(payload: &'a Value, path: &[&str]) -> Result<&'a str> {
    let leaf = walk(payload, path)?;
    leaf.as_str()
        .ok_or_else(|| mismatch(path, "a string", leaf))
}

/// Resolves `path` to a numeric leaf.
pub fn number_at(payload: &Value, path: &[&str]) -> Result<f64> {
    let leaf = walk(payload, path)?;
    leaf.as_f64()
        .ok_or_else(|| mismatch(path, "a number", leaf))
}

/// Resolves `path` to an array and returns its element count.
/// Cheaper than materializing the elements (used for commit counts).
pub fn len_at(payload: &Value, path: &[&str]) -> Result<usize> {
    let leaf = walk(payload, path)?;
    leaf.as_array()
        .map(|a| a.len())
        .ok_or_else(|| mismatch(path, "an array", leaf))
}

/// Walks keys left to right. A missing key reports the dotted path up to
/// and including the key that was absent.
fn walk<'a>(payload: &'a Value, path: &[&str]) -> Result<&'a Value> {
    let mut current = payload;
    for (idx, key) in path.iter().enumerate() {
        current = current.get(key).ok_or_else(|| FieldError::PathNotFound {
            path: path[..=idx].join("."),
        })?;
    }
    Ok(current)
}

fn mismatch(path: &[&str], expected: &'static str, found: &Value) -> FieldError {
    FieldError::TypeMismatch {
        path: path.join("."),
        expected,
        found: shape_of(found),
    }
}

fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
