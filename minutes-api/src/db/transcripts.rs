//! Transcript persistence

use minutes_common::db::{preview_text, ActionItem, ExtractedItem, HistoryEntry, Transcript};
use minutes_common::{time, Error, Result};
use sqlx::{Row, SqlitePool};
use tracing::debug;

/// Number of entries returned by the history listing
pub const DEFAULT_HISTORY_LIMIT: i64 = 5;

/// Insert a transcript and its extracted items in one transaction
///
/// Items are returned in insertion order with default `is_done` and `tags`.
pub async fn create_transcript_with_items(
    pool: &SqlitePool,
    raw_text: &str,
    items: &[ExtractedItem],
) -> Result<Transcript> {
    let created_at = time::now();
    let mut tx = pool.begin().await?;

    let transcript_id = sqlx::query("INSERT INTO transcripts (raw_text, created_at) VALUES (?, ?)")
        .bind(raw_text)
        .bind(time::to_storage(&created_at))
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

    let mut action_items = Vec::with_capacity(items.len());
    for item in items {
        let id = sqlx::query(
            r#"
            INSERT INTO action_items (transcript_id, task_description, owner, due_date, is_done, tags)
            VALUES (?, ?, ?, ?, 0, '[]')
            "#,
        )
        .bind(transcript_id)
        .bind(&item.task_description)
        .bind(&item.owner)
        .bind(&item.due_date)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        action_items.push(ActionItem {
            id,
            transcript_id,
            task_description: item.task_description.clone(),
            owner: item.owner.clone(),
            due_date: item.due_date.clone(),
            is_done: false,
            tags: Vec::new(),
        });
    }

    tx.commit().await?;

    debug!(
        transcript_id,
        item_count = action_items.len(),
        "Stored transcript with action items"
    );

    Ok(Transcript {
        id: transcript_id,
        raw_text: raw_text.to_string(),
        created_at,
        action_items,
    })
}

/// Most recent transcripts, newest first, with preview and item count
pub async fn list_recent_transcripts(pool: &SqlitePool, limit: i64) -> Result<Vec<HistoryEntry>> {
    let rows = sqlx::query(
        r#"
        SELECT t.id, t.raw_text, t.created_at,
               (SELECT COUNT(*) FROM action_items a WHERE a.transcript_id = t.id) AS action_item_count
        FROM transcripts t
        ORDER BY t.created_at DESC, t.id DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| -> Result<HistoryEntry> {
            let raw_text: String = row.try_get("raw_text")?;
            let created_at: String = row.try_get("created_at")?;
            Ok(HistoryEntry {
                id: row.try_get("id")?,
                preview_text: preview_text(&raw_text),
                created_at: time::from_storage(&created_at)?,
                action_item_count: row.try_get("action_item_count")?,
            })
        })
        .collect()
}

/// Delete a transcript; its action items go with it
pub async fn delete_transcript(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM transcripts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Transcript {}", id)));
    }
    Ok(())
}
