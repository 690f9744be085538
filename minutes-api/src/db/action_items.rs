//! Action item persistence

use minutes_common::db::{ActionItem, ActionItemPatch};
use minutes_common::{Error, Result};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use super::{action_item_from_row, ACTION_ITEM_COLUMNS};

/// All action items of a transcript, ordered by id
///
/// An unknown transcript yields an empty list.
pub async fn list_items_for_transcript(pool: &SqlitePool, transcript_id: i64) -> Result<Vec<ActionItem>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM action_items WHERE transcript_id = ? ORDER BY id ASC",
        ACTION_ITEM_COLUMNS
    ))
    .bind(transcript_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(action_item_from_row).collect()
}

/// Load one action item
pub async fn get_item(pool: &SqlitePool, id: i64) -> Result<ActionItem> {
    let mut conn = pool.acquire().await?;
    fetch_item(&mut conn, id).await
}

/// Apply the supplied fields of `patch` to an action item
///
/// Returns the item as stored after the update.
pub async fn update_item(pool: &SqlitePool, id: i64, patch: &ActionItemPatch) -> Result<ActionItem> {
    if patch.is_empty() {
        return get_item(pool, id).await;
    }

    let mut tx = pool.begin().await?;

    let mut builder = QueryBuilder::<Sqlite>::new("UPDATE action_items SET ");
    {
        let mut assignments = builder.separated(", ");
        if let Some(task_description) = &patch.task_description {
            assignments.push("task_description = ");
            assignments.push_bind_unseparated(task_description.clone());
        }
        if let Some(owner) = &patch.owner {
            assignments.push("owner = ");
            assignments.push_bind_unseparated(owner.clone());
        }
        if let Some(due_date) = &patch.due_date {
            assignments.push("due_date = ");
            assignments.push_bind_unseparated(due_date.clone());
        }
        if let Some(is_done) = patch.is_done {
            assignments.push("is_done = ");
            assignments.push_bind_unseparated(is_done);
        }
        if let Some(tags) = &patch.tags {
            assignments.push("tags = ");
            assignments.push_bind_unseparated(serde_json::to_string(tags)?);
        }
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder.build().execute(&mut *tx).await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Action item {}", id)));
    }

    let item = fetch_item(&mut tx, id).await?;
    tx.commit().await?;

    debug!(action_item_id = id, "Updated action item");
    Ok(item)
}

/// Remove an action item
pub async fn delete_item(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM action_items WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Action item {}", id)));
    }

    debug!(action_item_id = id, "Deleted action item");
    Ok(())
}

async fn fetch_item(conn: &mut SqliteConnection, id: i64) -> Result<ActionItem> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM action_items WHERE id = ?",
        ACTION_ITEM_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => action_item_from_row(&row),
        None => Err(Error::NotFound(format!("Action item {}", id))),
    }
}
