//! Issued-code registry persistence
//!
//! Lookup is by the unsalted fingerprint and considers active records
//! only. The UNIQUE fingerprint column makes a racing double insert
//! fail distinctly so the minter can fall back to the winner's row.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uic_common::{Error, Result};

use super::parse_timestamp;
use crate::uic::{NormalizedAnswers, UicRecord};

/// Identifier persistence contract
#[allow(async_fn_in_trait)]
pub trait FingerprintIndex {
    /// Active record previously issued for this fingerprint, if any
    async fn find_by_fingerprint(&self, fingerprint: &str) -> Result<Option<UicRecord>>;
    /// Insert a new record; fails with [`Error::Conflict`] if the
    /// fingerprint (or code) already exists
    async fn insert(&self, record: &UicRecord) -> Result<()>;
    /// Refresh `last_requested_at` and increment `request_count`
    async fn touch(&self, fingerprint: &str, now: DateTime<Utc>) -> Result<()>;
}

/// SQLite-backed fingerprint index
#[derive(Clone)]
pub struct SqliteFingerprintIndex {
    pool: SqlitePool,
}

impl SqliteFingerprintIndex {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl FingerprintIndex for SqliteFingerprintIndex {
    async fn find_by_fingerprint(&self, fingerprint: &str) -> Result<Option<UicRecord>> {
        let row = sqlx::query(
            r#"
            SELECT uic_code, phone_number, last_name_code, first_name_code,
                   birth_year_digit, city_code, gender_code, fingerprint,
                   created_at, last_requested_at, request_count, is_active
            FROM uic_records
            WHERE fingerprint = ? AND is_active = 1
            "#,
        )
        .bind(fingerprint)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let created_at: String = row.get("created_at");
        let last_requested_at: String = row.get("last_requested_at");

        Ok(Some(UicRecord {
            uic_code: row.get("uic_code"),
            phone_number: row.get("phone_number"),
            answers: NormalizedAnswers {
                last_name_code: row.get("last_name_code"),
                first_name_code: row.get("first_name_code"),
                birth_year_digit: row.get("birth_year_digit"),
                city_code: row.get("city_code"),
                gender_code: row.get("gender_code"),
            },
            fingerprint: row.get("fingerprint"),
            created_at: parse_timestamp("created_at", &created_at)?,
            last_requested_at: parse_timestamp("last_requested_at", &last_requested_at)?,
            request_count: row.get("request_count"),
            is_active: row.get::<i64, _>("is_active") != 0,
        }))
    }

    async fn insert(&self, record: &UicRecord) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO uic_records (
                uic_code, phone_number, last_name_code, first_name_code,
                birth_year_digit, city_code, gender_code, fingerprint,
                created_at, last_requested_at, request_count, is_active
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.uic_code)
        .bind(&record.phone_number)
        .bind(&record.answers.last_name_code)
        .bind(&record.answers.first_name_code)
        .bind(&record.answers.birth_year_digit)
        .bind(&record.answers.city_code)
        .bind(&record.answers.gender_code)
        .bind(&record.fingerprint)
        .bind(record.created_at.to_rfc3339())
        .bind(record.last_requested_at.to_rfc3339())
        .bind(record.request_count)
        .bind(record.is_active as i64)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(Error::Conflict(
                format!("UIC record already exists for code {}", record.uic_code),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn touch(&self, fingerprint: &str, now: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE uic_records
            SET last_requested_at = ?, request_count = request_count + 1
            WHERE fingerprint = ? AND is_active = 1
            "#,
        )
        .bind(now.to_rfc3339())
        .bind(fingerprint)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uic_common::db::init_in_memory;

    fn record(code: &str, fingerprint: &str) -> UicRecord {
        let now = Utc::now();
        UicRecord {
            uic_code: code.to_string(),
            phone_number: "+243810000000".to_string(),
            answers: NormalizedAnswers {
                last_name_code: "MBE".to_string(),
                first_name_code: "IBR".to_string(),
                birth_year_digit: "7".to_string(),
                city_code: "DA".to_string(),
                gender_code: "1".to_string(),
            },
            fingerprint: fingerprint.to_string(),
            created_at: now,
            last_requested_at: now,
            request_count: 1,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn insert_then_find() {
        let index = SqliteFingerprintIndex::new(init_in_memory().await.unwrap());
        index.insert(&record("MBEIBR7DA1", "fp-a")).await.unwrap();

        let found = index.find_by_fingerprint("fp-a").await.unwrap().unwrap();
        assert_eq!(found.uic_code, "MBEIBR7DA1");
        assert_eq!(found.request_count, 1);
        assert!(found.is_active);

        assert!(index.find_by_fingerprint("fp-b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_fingerprint_is_a_distinct_conflict() {
        let index = SqliteFingerprintIndex::new(init_in_memory().await.unwrap());
        index.insert(&record("MBEIBR7DA1", "fp-a")).await.unwrap();

        let err = index
            .insert(&record("OTHERCODE1", "fp-a"))
            .await
            .expect_err("second insert must fail");
        assert!(matches!(err, Error::Conflict(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn touch_bumps_count_and_timestamp() {
        let index = SqliteFingerprintIndex::new(init_in_memory().await.unwrap());
        index.insert(&record("MBEIBR7DA1", "fp-a")).await.unwrap();

        let later = Utc::now() + chrono::Duration::minutes(5);
        index.touch("fp-a", later).await.unwrap();

        let found = index.find_by_fingerprint("fp-a").await.unwrap().unwrap();
        assert_eq!(found.request_count, 2);
        assert_eq!(found.last_requested_at, later);
    }

    #[tokio::test]
    async fn deactivated_records_are_invisible_to_lookup() {
        let pool = init_in_memory().await.unwrap();
        let index = SqliteFingerprintIndex::new(pool.clone());
        index.insert(&record("MBEIBR7DA1", "fp-a")).await.unwrap();

        sqlx::query("UPDATE uic_records SET is_active = 0 WHERE fingerprint = 'fp-a'")
            .execute(&pool)
            .await
            .unwrap();

        assert!(index.find_by_fingerprint("fp-a").await.unwrap().is_none());
    }
}
