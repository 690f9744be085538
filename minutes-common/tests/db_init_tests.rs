//! Integration tests for on-disk database initialization

use minutes_common::db::init::init_database;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("minutes.db");
    let url = format!("sqlite://{}?mode=rwc", db_path.display());

    let result = init_database(&url).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("minutes.db");
    let url = format!("sqlite://{}?mode=rwc", db_path.display());

    let pool1 = init_database(&url).await.unwrap();
    sqlx::query("INSERT INTO transcripts (raw_text, created_at) VALUES ('kept across opens', '2024-01-01T00:00:00.000000Z')")
        .execute(&pool1)
        .await
        .unwrap();
    pool1.close().await;

    let pool2 = init_database(&url).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.as_ref().err());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transcripts")
        .fetch_one(&pool2.unwrap())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_file_database_uses_wal() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("minutes.db");
    let url = format!("sqlite://{}?mode=rwc", db_path.display());

    let pool = init_database(&url).await.unwrap();
    let mode: String = sqlx::query_scalar("PRAGMA journal_mode")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");
}
