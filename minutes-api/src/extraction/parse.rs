//! Model response sanitization and shape validation
//!
//! The response is untrusted text. It is parsed into an untyped JSON tree and
//! then checked field by field; any mismatch fails the whole response.

use minutes_common::db::ExtractedItem;
use serde_json::{Map, Value};

use super::ExtractionError;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Strip code-fence markers and surrounding whitespace
///
/// Every ```` ```json ```` marker (any case) is removed first, then every
/// remaining ```` ``` ````.
pub fn sanitize_response(raw: &str) -> String {
    // ASCII lowercasing keeps byte offsets identical to `raw`
    let lowered = raw.to_ascii_lowercase();
    let mut stripped = String::with_capacity(raw.len());
    let mut cursor = 0;

    while let Some(pos) = lowered[cursor..].find(JSON_FENCE) {
        stripped.push_str(&raw[cursor..cursor + pos]);
        cursor += pos + JSON_FENCE.len();
    }
    stripped.push_str(&raw[cursor..]);

    stripped.replace(FENCE, "").trim().to_string()
}

/// Parse sanitized text into extracted items
pub fn parse_items(sanitized: &str) -> Result<Vec<ExtractedItem>, ExtractionError> {
    let tree: Value = serde_json::from_str(sanitized).map_err(ExtractionError::MalformedJson)?;
    let elements = tree.as_array().ok_or(ExtractionError::NotAnArray)?;

    elements
        .iter()
        .enumerate()
        .map(|(index, element)| parse_item(index, element))
        .collect()
}

fn parse_item(index: usize, element: &Value) -> Result<ExtractedItem, ExtractionError> {
    let invalid = |reason: &str| ExtractionError::InvalidItem {
        index,
        reason: reason.to_string(),
    };

    let object = element.as_object().ok_or_else(|| invalid("expected an object"))?;

    let task_description = match object.get("taskDescription") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::String(_)) => return Err(invalid("taskDescription is empty")),
        Some(_) => return Err(invalid("taskDescription must be a string")),
        None => return Err(invalid("taskDescription is missing")),
    };

    Ok(ExtractedItem {
        task_description,
        owner: nullable_string(object, "owner").map_err(|r| invalid(&r))?,
        due_date: nullable_string(object, "dueDate").map_err(|r| invalid(&r))?,
    })
}

/// The key must be present; `null` reads as `None`
fn nullable_string(object: &Map<String, Value>, key: &str) -> Result<Option<String>, String> {
    match object.get(key) {
        None => Err(format!("{key} is missing")),
        Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(format!("{key} must be a string or null")),
    }
}
