//! UIC derivation engine
//!
//! Turns the five raw conversation answers into a Unique Identifier
//! Code: normalization to canonical form, fixed-width encoding, an
//! unsalted fingerprint for duplicate detection, and the get-or-create
//! arbitration against the registry of issued codes.

use chrono::{DateTime, Utc};

pub mod codec;
pub mod minter;
pub mod normalize;

pub use minter::{MintOutcome, UicMinter};

/// The five raw answers handed over when a conversation completes.
///
/// A closed record rather than a string-keyed bag: the terminal
/// transition fails loudly if any slot is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedAnswers {
    pub last_name_code: String,
    pub first_name_code: String,
    pub birth_year_digit: String,
    pub city_code: String,
    pub gender_code: String,
}

/// The five canonical (uppercase, accent-free, alphanumeric) field
/// values every hash and encoding step works from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAnswers {
    pub last_name_code: String,
    pub first_name_code: String,
    pub birth_year_digit: String,
    pub city_code: String,
    pub gender_code: String,
}

impl NormalizedAnswers {
    /// Normalize all five raw answers
    pub fn from_raw(raw: &CollectedAnswers) -> NormalizedAnswers {
        NormalizedAnswers {
            last_name_code: normalize::normalize(&raw.last_name_code),
            first_name_code: normalize::normalize(&raw.first_name_code),
            birth_year_digit: normalize::normalize(&raw.birth_year_digit),
            city_code: normalize::normalize(&raw.city_code),
            gender_code: normalize::normalize(&raw.gender_code),
        }
    }
}

/// One row of the issued-code registry.
///
/// `fingerprint` uniquely determines `uic_code` among active records;
/// repeat requests with the same normalized inputs re-read this row
/// instead of minting a second code.
#[derive(Debug, Clone)]
pub struct UicRecord {
    pub uic_code: String,
    pub phone_number: String,
    pub answers: NormalizedAnswers,
    pub fingerprint: String,
    pub created_at: DateTime<Utc>,
    pub last_requested_at: DateTime<Utc>,
    pub request_count: i64,
    pub is_active: bool,
}
