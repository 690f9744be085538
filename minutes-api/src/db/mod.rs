//! Persistence gateway
//!
//! Every operation either fully succeeds or leaves storage unchanged.
//! Last writer wins; there is no versioning or soft delete.

pub mod action_items;
pub mod transcripts;

pub use action_items::{delete_item, get_item, list_items_for_transcript, update_item};
pub use transcripts::{
    create_transcript_with_items, delete_transcript, list_recent_transcripts, DEFAULT_HISTORY_LIMIT,
};

use minutes_common::db::ActionItem;
use minutes_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// Columns selected for every action item query
pub(crate) const ACTION_ITEM_COLUMNS: &str =
    "id, transcript_id, task_description, owner, due_date, is_done, tags";

pub(crate) fn action_item_from_row(row: &SqliteRow) -> Result<ActionItem> {
    let tags_json: String = row.try_get("tags")?;

    Ok(ActionItem {
        id: row.try_get("id")?,
        transcript_id: row.try_get("transcript_id")?,
        task_description: row.try_get("task_description")?,
        owner: row.try_get("owner")?,
        due_date: row.try_get("due_date")?,
        is_done: row.try_get("is_done")?,
        tags: serde_json::from_str(&tags_json)?,
    })
}
