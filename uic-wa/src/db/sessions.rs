//! Conversation session persistence
//!
//! One row per phone number. The UPSERT path is last-committed-wins:
//! two racing messages for the same user never merge partial answers,
//! the later commit simply replaces the snapshot.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uic_common::{Error, Result};

use super::parse_timestamp;
use crate::flow::session::Session;
use uic_common::config::Language;

/// Session persistence contract
#[allow(async_fn_in_trait)]
pub trait SessionStore {
    async fn get(&self, phone_number: &str) -> Result<Option<Session>>;
    async fn upsert(&self, session: &Session) -> Result<()>;
    async fn delete(&self, phone_number: &str) -> Result<()>;
    /// Idempotent bulk delete of every session past its deadline;
    /// returns the number removed.
    async fn delete_all_expired(&self, now: DateTime<Utc>) -> Result<u64>;
}

/// SQLite-backed session store
#[derive(Clone)]
pub struct SqliteSessionStore {
    pool: SqlitePool,
}

impl SqliteSessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl SessionStore for SqliteSessionStore {
    async fn get(&self, phone_number: &str) -> Result<Option<Session>> {
        let row = sqlx::query(
            r#"
            SELECT phone_number, current_step, last_name_code, first_name_code,
                   birth_year_digit, city_code, gender_code, language,
                   created_at, updated_at, expires_at
            FROM conversation_sessions
            WHERE phone_number = ?
            "#,
        )
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let current_step: i64 = row.get("current_step");
        let language: String = row.get("language");
        let created_at: String = row.get("created_at");
        let updated_at: String = row.get("updated_at");
        let expires_at: String = row.get("expires_at");

        Ok(Some(Session {
            phone_number: row.get("phone_number"),
            current_step: usize::try_from(current_step)
                .map_err(|_| Error::Internal(format!("Negative current_step: {}", current_step)))?,
            last_name_code: row.get("last_name_code"),
            first_name_code: row.get("first_name_code"),
            birth_year_digit: row.get("birth_year_digit"),
            city_code: row.get("city_code"),
            gender_code: row.get("gender_code"),
            language: Language::parse(&language)
                .map_err(|_| Error::Internal(format!("Unknown session language: {}", language)))?,
            created_at: parse_timestamp("created_at", &created_at)?,
            updated_at: parse_timestamp("updated_at", &updated_at)?,
            expires_at: parse_timestamp("expires_at", &expires_at)?,
        }))
    }

    async fn upsert(&self, session: &Session) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO conversation_sessions (
                phone_number, current_step, last_name_code, first_name_code,
                birth_year_digit, city_code, gender_code, language,
                created_at, updated_at, expires_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(phone_number) DO UPDATE SET
                current_step = excluded.current_step,
                last_name_code = excluded.last_name_code,
                first_name_code = excluded.first_name_code,
                birth_year_digit = excluded.birth_year_digit,
                city_code = excluded.city_code,
                gender_code = excluded.gender_code,
                language = excluded.language,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at,
                expires_at = excluded.expires_at
            "#,
        )
        .bind(&session.phone_number)
        .bind(session.current_step as i64)
        .bind(&session.last_name_code)
        .bind(&session.first_name_code)
        .bind(&session.birth_year_digit)
        .bind(&session.city_code)
        .bind(&session.gender_code)
        .bind(session.language.as_str())
        .bind(session.created_at.to_rfc3339())
        .bind(session.updated_at.to_rfc3339())
        .bind(session.expires_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, phone_number: &str) -> Result<()> {
        sqlx::query("DELETE FROM conversation_sessions WHERE phone_number = ?")
            .bind(phone_number)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_all_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM conversation_sessions WHERE expires_at < ?")
            .bind(now.to_rfc3339())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uic_common::db::init_in_memory;

    fn session(phone: &str, now: DateTime<Utc>) -> Session {
        Session::new(phone, Language::Fr, now, Duration::minutes(15))
    }

    #[tokio::test]
    async fn round_trips_a_session() {
        let store = SqliteSessionStore::new(init_in_memory().await.unwrap());
        let now = Utc::now();
        let original = session("+243811111111", now).advance(
            crate::flow::session::Field::LastNameCode,
            "Mbemba",
            now,
        );

        store.upsert(&original).await.unwrap();
        let loaded = store.get("+243811111111").await.unwrap().expect("present");

        assert_eq!(loaded.current_step, 1);
        assert_eq!(loaded.last_name_code.as_deref(), Some("Mbemba"));
        assert_eq!(loaded.language, Language::Fr);
        assert_eq!(loaded.expires_at, original.expires_at);
        assert!(loaded.first_name_code.is_none());
    }

    #[tokio::test]
    async fn get_unknown_user_is_none() {
        let store = SqliteSessionStore::new(init_in_memory().await.unwrap());
        assert!(store.get("+10000000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_replaces_the_snapshot() {
        let store = SqliteSessionStore::new(init_in_memory().await.unwrap());
        let now = Utc::now();
        let s = session("+243822222222", now);
        store.upsert(&s).await.unwrap();

        let advanced = s.advance(crate::flow::session::Field::LastNameCode, "KAB", now);
        store.upsert(&advanced).await.unwrap();

        let loaded = store.get("+243822222222").await.unwrap().unwrap();
        assert_eq!(loaded.current_step, 1);
        assert_eq!(loaded.last_name_code.as_deref(), Some("KAB"));
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let store = SqliteSessionStore::new(init_in_memory().await.unwrap());
        let now = Utc::now();
        store.upsert(&session("+243833333333", now)).await.unwrap();
        store.delete("+243833333333").await.unwrap();
        assert!(store.get("+243833333333").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expiry_sweep_only_removes_expired_rows() {
        let store = SqliteSessionStore::new(init_in_memory().await.unwrap());
        let now = Utc::now();

        let mut expired = session("+1", now - Duration::hours(2));
        expired.expires_at = now - Duration::hours(1);
        store.upsert(&expired).await.unwrap();
        store.upsert(&session("+2", now)).await.unwrap();

        let removed = store.delete_all_expired(now).await.unwrap();
        assert_eq!(removed, 1);
        assert!(store.get("+1").await.unwrap().is_none());
        assert!(store.get("+2").await.unwrap().is_some());

        // Idempotent
        assert_eq!(store.delete_all_expired(now).await.unwrap(), 0);
    }
}
