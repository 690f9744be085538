//! Request payload validation
//!
//! Pure functions from untyped input to typed values. Nothing here touches
//! storage or the model backend.

use minutes_common::db::ActionItemPatch;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Minimum transcript length in characters
pub const MIN_TRANSCRIPT_CHARS: usize = 10;

/// Fields accepted by the action item update payload
pub const UPDATE_FIELDS: [&str; 5] = ["taskDescription", "owner", "dueDate", "isDone", "tags"];

/// One invalid field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Payload failed validation; carries every invalid field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", summarize(.issues))]
pub struct ValidationErrors {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![ValidationIssue::new(field, message)],
        }
    }

    /// True when `field` has at least one issue
    pub fn has_field(&self, field: &str) -> bool {
        self.issues.iter().any(|i| i.field == field)
    }
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{}: {}", i.field, i.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Path identifier could not be coerced to a positive integer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid identifier {raw:?}: {reason}")]
pub struct InvalidIdentifier {
    pub raw: String,
    pub reason: &'static str,
}

/// Validated body of `POST /processTranscript`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptRequest {
    pub transcript: String,
}

/// Coerce a path segment to a positive integer id
///
/// Numeric-string semantics: surrounding whitespace is ignored and a decimal
/// with zero fraction (`"7.0"`) is accepted.
pub fn parse_id(raw: &str) -> Result<i64, InvalidIdentifier> {
    let fail = |reason| InvalidIdentifier {
        raw: raw.to_string(),
        reason,
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(fail("Id is required"));
    }

    let value = match trimmed.parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            let float: f64 = trimmed.parse().map_err(|_| fail("Id must be a number"))?;
            // i64::MAX as f64 rounds up to 2^63, hence the strict bound
            if !float.is_finite() || float.fract() != 0.0 || float.abs() >= i64::MAX as f64 {
                return Err(fail("Id must be an integer"));
            }
            float as i64
        }
    };

    if value <= 0 {
        return Err(fail("Id must be positive"));
    }
    Ok(value)
}

/// Validate the transcript submission body
///
/// Fields other than `transcript` are ignored.
pub fn validate_transcript_request(body: &Value) -> Result<TranscriptRequest, ValidationErrors> {
    let object = body
        .as_object()
        .ok_or_else(|| ValidationErrors::single("body", "Expected object"))?;

    match object.get("transcript") {
        Some(Value::String(s)) if s.chars().count() >= MIN_TRANSCRIPT_CHARS => Ok(TranscriptRequest {
            transcript: s.clone(),
        }),
        Some(Value::String(_)) => Err(ValidationErrors::single(
            "transcript",
            "Please enter a valid transcript",
        )),
        Some(_) => Err(ValidationErrors::single("transcript", "Expected string")),
        None => Err(ValidationErrors::single("transcript", "Required")),
    }
}

/// Validate a partial action item update
///
/// Closed shape: any key outside [`UPDATE_FIELDS`] fails the whole payload.
pub fn validate_action_item_update(body: &Value) -> Result<ActionItemPatch, ValidationErrors> {
    let object = body
        .as_object()
        .ok_or_else(|| ValidationErrors::single("body", "Expected object"))?;

    let mut issues: Vec<ValidationIssue> = object
        .keys()
        .filter(|key| !UPDATE_FIELDS.contains(&key.as_str()))
        .map(|key| ValidationIssue::new(key.as_str(), "Unrecognized field"))
        .collect();

    let mut patch = ActionItemPatch::default();

    match object.get("taskDescription") {
        None => {}
        Some(Value::String(s)) if !s.is_empty() => patch.task_description = Some(s.clone()),
        Some(Value::String(_)) => {
            issues.push(ValidationIssue::new("taskDescription", "Please add valid details"))
        }
        Some(_) => issues.push(ValidationIssue::new("taskDescription", "Expected string")),
    }

    match nullable_string(object, "owner") {
        Ok(value) => patch.owner = value,
        Err(issue) => issues.push(issue),
    }

    match nullable_string(object, "dueDate") {
        Ok(value) => patch.due_date = value,
        Err(issue) => issues.push(issue),
    }

    match object.get("isDone") {
        None => {}
        Some(Value::Bool(b)) => patch.is_done = Some(*b),
        Some(_) => issues.push(ValidationIssue::new("isDone", "Expected boolean")),
    }

    match object.get("tags") {
        None => {}
        Some(Value::Array(values)) => {
            let mut tags = Vec::with_capacity(values.len());
            for (i, value) in values.iter().enumerate() {
                match value {
                    Value::String(s) => tags.push(s.clone()),
                    _ => issues.push(ValidationIssue::new(format!("tags[{i}]"), "Expected string")),
                }
            }
            patch.tags = Some(tags);
        }
        Some(_) => issues.push(ValidationIssue::new("tags", "Expected array")),
    }

    if issues.is_empty() {
        Ok(patch)
    } else {
        Err(ValidationErrors { issues })
    }
}

/// Absent → `None`, `null` → `Some(None)`, string → `Some(Some(_))`
fn nullable_string(
    object: &Map<String, Value>,
    field: &str,
) -> Result<Option<Option<String>>, ValidationIssue> {
    match object.get(field) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::String(s)) => Ok(Some(Some(s.clone()))),
        Some(_) => Err(ValidationIssue::new(field, "Expected string or null")),
    }
}
