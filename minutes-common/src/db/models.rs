//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of characters kept in a history preview
pub const PREVIEW_CHARS: usize = 100;

/// Stored meeting transcript with its action items
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub id: i64,
    pub raw_text: String,
    pub created_at: DateTime<Utc>,
    pub action_items: Vec<ActionItem>,
}

/// One extracted task tied to a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    pub id: i64,
    pub transcript_id: i64,
    pub task_description: String,
    pub owner: Option<String>,
    /// Opaque text, never parsed as a date
    pub due_date: Option<String>,
    pub is_done: bool,
    pub tags: Vec<String>,
}

/// Action item as returned by the language model, before persistence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedItem {
    pub task_description: String,
    pub owner: Option<String>,
    pub due_date: Option<String>,
}

/// Partial update of an action item
///
/// `None` leaves a column untouched. For nullable columns `Some(None)`
/// clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionItemPatch {
    pub task_description: Option<String>,
    pub owner: Option<Option<String>>,
    pub due_date: Option<Option<String>>,
    pub is_done: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl ActionItemPatch {
    /// True when no field is supplied
    pub fn is_empty(&self) -> bool {
        self.task_description.is_none()
            && self.owner.is_none()
            && self.due_date.is_none()
            && self.is_done.is_none()
            && self.tags.is_none()
    }
}

/// Row of the recent-transcripts listing
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub preview_text: String,
    pub created_at: DateTime<Utc>,
    pub action_item_count: i64,
}

/// Shorten transcript text for the history listing
///
/// Text longer than [`PREVIEW_CHARS`] characters is cut and suffixed with
/// `...`; anything shorter is returned unchanged.
pub fn preview_text(raw_text: &str) -> String {
    match raw_text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &raw_text[..cut]),
        None => raw_text.to_string(),
    }
}
