//! SQLite persistence for sessions and issued codes
//!
//! Timestamps are stored as RFC 3339 TEXT and parsed back on load;
//! all schema creation lives in uic-common's database initializer.

use chrono::{DateTime, Utc};
use uic_common::{Error, Result};

pub mod records;
pub mod sessions;

pub use records::{FingerprintIndex, SqliteFingerprintIndex};
pub use sessions::{SessionStore, SqliteSessionStore};

pub(crate) fn parse_timestamp(column: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Failed to parse {}: {}", column, e)))
}
