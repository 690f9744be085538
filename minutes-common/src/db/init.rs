//! Database initialization
//!
//! Opens (or creates) the SQLite database and applies the schema. Schema
//! creation is idempotent and safe to run on every startup.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Initialize database connection pool and create tables if needed
///
/// In-memory URLs get a single long-lived connection so the schema and data
/// survive for the lifetime of the pool.
pub async fn init_database(database_url: &str) -> Result<SqlitePool> {
    let in_memory = is_in_memory_url(database_url);

    let mut options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_millis(5000));

    if !in_memory {
        // Create parent directory if it doesn't exist
        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        // WAL allows concurrent readers with one writer
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(10)
    };

    debug!("Connecting to database: {}", database_url);
    let pool = pool_options.connect_with(options).await?;

    create_schema(&pool).await?;

    if in_memory {
        info!("Initialized in-memory database");
    } else {
        info!("Opened database: {}", database_url);
    }

    Ok(pool)
}

/// Create all tables (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_transcripts_table(pool).await?;
    create_action_items_table(pool).await?;
    Ok(())
}

async fn create_transcripts_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transcripts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            raw_text TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_transcripts_created_at ON transcripts(created_at)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_action_items_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS action_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            transcript_id INTEGER NOT NULL REFERENCES transcripts(id) ON DELETE CASCADE,
            task_description TEXT NOT NULL,
            owner TEXT,
            due_date TEXT,
            is_done INTEGER NOT NULL DEFAULT 0,
            tags TEXT NOT NULL DEFAULT '[]'
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_action_items_transcript ON action_items(transcript_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

fn is_in_memory_url(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_has_schema() {
        let pool = init_database("sqlite::memory:").await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('transcripts', 'action_items') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        assert_eq!(tables, vec!["action_items".to_string(), "transcripts".to_string()]);
    }

    #[tokio::test]
    async fn test_create_schema_is_idempotent() {
        let pool = init_database("sqlite::memory:").await.unwrap();
        create_schema(&pool).await.unwrap();
        create_schema(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let pool = init_database("sqlite::memory:").await.unwrap();
        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[tokio::test]
    async fn test_orphan_action_item_rejected() {
        let pool = init_database("sqlite::memory:").await.unwrap();
        let result = sqlx::query(
            "INSERT INTO action_items (transcript_id, task_description) VALUES (999, 'orphan')",
        )
        .execute(&pool)
        .await;
        assert!(result.is_err(), "foreign key should reject unknown transcript");
    }

    #[tokio::test]
    async fn test_delete_transcript_cascades() {
        let pool = init_database("sqlite::memory:").await.unwrap();

        let transcript_id = sqlx::query(
            "INSERT INTO transcripts (raw_text, created_at) VALUES ('some meeting text', '2024-01-01T00:00:00.000000Z')",
        )
        .execute(&pool)
        .await
        .unwrap()
        .last_insert_rowid();

        sqlx::query("INSERT INTO action_items (transcript_id, task_description) VALUES (?, 'a')")
            .bind(transcript_id)
            .execute(&pool)
            .await
            .unwrap();

        sqlx::query("DELETE FROM transcripts WHERE id = ?")
            .bind(transcript_id)
            .execute(&pool)
            .await
            .unwrap();

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM action_items")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[test]
    fn test_in_memory_url_detection() {
        assert!(is_in_memory_url("sqlite::memory:"));
        assert!(is_in_memory_url("sqlite://file:test?mode=memory&cache=shared"));
        assert!(!is_in_memory_url("sqlite:///var/lib/minutes/minutes.db?mode=rwc"));
    }
}
