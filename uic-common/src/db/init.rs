//! Database initialization
//!
//! Creates the SQLite database on first run and brings the schema up
//! idempotently. Two tables: in-flight conversation sessions keyed by
//! phone number, and the registry of issued UIC codes keyed by the
//! unsalted fingerprint of their normalized inputs.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows the expiry sweep to run alongside webhook traffic
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// In-memory database with full schema, for tests
pub async fn init_in_memory() -> Result<SqlitePool> {
    // A single connection keeps every query on the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    create_schema(&pool).await?;
    Ok(pool)
}

/// Create all tables (idempotent - safe to call multiple times)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_sessions_table(pool).await?;
    create_uic_records_table(pool).await?;
    Ok(())
}

async fn create_sessions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS conversation_sessions (
            phone_number TEXT PRIMARY KEY,
            current_step INTEGER NOT NULL DEFAULT 0,
            last_name_code TEXT,
            first_name_code TEXT,
            birth_year_digit TEXT,
            city_code TEXT,
            gender_code TEXT,
            language TEXT NOT NULL DEFAULT 'fr',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            expires_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_sessions_expires_at
         ON conversation_sessions(expires_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_uic_records_table(pool: &SqlitePool) -> Result<()> {
    // fingerprint UNIQUE is load-bearing: a concurrent double mint for
    // the same normalized inputs must fail distinctly on the second
    // insert so the caller can fall back to the winner's record.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS uic_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            uic_code TEXT NOT NULL UNIQUE,
            phone_number TEXT NOT NULL,
            last_name_code TEXT NOT NULL,
            first_name_code TEXT NOT NULL,
            birth_year_digit TEXT NOT NULL,
            city_code TEXT NOT NULL,
            gender_code TEXT NOT NULL,
            fingerprint TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL,
            last_requested_at TEXT NOT NULL,
            request_count INTEGER NOT NULL DEFAULT 1,
            is_active INTEGER NOT NULL DEFAULT 1
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_uic_records_phone
         ON uic_records(phone_number)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn schema_creation_is_idempotent() {
        let pool = init_in_memory().await.expect("in-memory pool");
        create_schema(&pool).await.expect("second pass");

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .expect("list tables");

        assert!(tables.iter().any(|t| t == "conversation_sessions"));
        assert!(tables.iter().any(|t| t == "uic_records"));
    }

    #[tokio::test]
    async fn fingerprint_column_is_unique() {
        let pool = init_in_memory().await.expect("in-memory pool");

        let insert = "INSERT INTO uic_records
            (uic_code, phone_number, last_name_code, first_name_code,
             birth_year_digit, city_code, gender_code, fingerprint,
             created_at, last_requested_at)
            VALUES (?, ?, 'MBE', 'IBR', '7', 'DA', '1', ?, 'now', 'now')";

        sqlx::query(insert)
            .bind("MBEIBR7DA1")
            .bind("+1000")
            .bind("fp-1")
            .execute(&pool)
            .await
            .expect("first insert");

        let err = sqlx::query(insert)
            .bind("OTHERCODE1")
            .bind("+2000")
            .bind("fp-1")
            .execute(&pool)
            .await
            .expect_err("duplicate fingerprint must fail");

        match err {
            sqlx::Error::Database(db) => assert!(db.is_unique_violation()),
            other => panic!("expected database error, got {:?}", other),
        }
    }
}
