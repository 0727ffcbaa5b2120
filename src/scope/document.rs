use serde_json::{Map, Value};

use super::error::ScopeError;

/// Short name of a JSON value's type, for error messages
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Walk `keys` from the root of `document`, creating empty objects for
/// missing (or null) keys, and return the object at the end of the path.
///
/// Sibling keys at every level are left untouched. Walking through a value
/// that is neither an object nor null is an error.
pub fn ensure_path<'a>(
    document: &'a mut Value,
    keys: &[&str],
) -> Result<&'a mut Map<String, Value>, ScopeError> {
    let mut current = document;
    let mut walked: Vec<&str> = Vec::with_capacity(keys.len());

    for key in keys {
        let map = as_object(current, &walked)?;
        walked.push(*key);
        current = map
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    as_object(current, &walked)
}

fn as_object<'a>(
    value: &'a mut Value,
    walked: &[&str],
) -> Result<&'a mut Map<String, Value>, ScopeError> {
    if value.is_null() {
        *value = Value::Object(Map::new());
    }
    let found = value_kind(value);
    value.as_object_mut().ok_or_else(|| ScopeError::NotAnObject {
        path: display_path(walked),
        found,
    })
}

fn display_path(walked: &[&str]) -> String {
    if walked.is_empty() {
        "<root>".to_string()
    } else {
        walked.join(".")
    }
}
