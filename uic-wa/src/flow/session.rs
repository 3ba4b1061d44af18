//! Conversation session snapshot
//!
//! The session is an immutable value: step advancement goes through
//! the pure [`Session::advance`] transition, which stamps
//! `updated_at` explicitly. The persistence layer writes snapshots
//! verbatim; there are no hidden timestamp side effects.

use chrono::{DateTime, Duration, Utc};
use uic_common::config::Language;
use uic_common::{Error, Result};

use crate::uic::CollectedAnswers;

/// The five answer slots a session fills in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    LastNameCode,
    FirstNameCode,
    BirthYearDigit,
    CityCode,
    GenderCode,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::LastNameCode => "last_name_code",
            Field::FirstNameCode => "first_name_code",
            Field::BirthYearDigit => "birth_year_digit",
            Field::CityCode => "city_code",
            Field::GenderCode => "gender_code",
        }
    }
}

/// Durable record of one user's in-progress answer collection
#[derive(Debug, Clone)]
pub struct Session {
    pub phone_number: String,
    pub current_step: usize,
    pub last_name_code: Option<String>,
    pub first_name_code: Option<String>,
    pub birth_year_digit: Option<String>,
    pub city_code: Option<String>,
    pub gender_code: Option<String>,
    pub language: Language,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Fresh session at step 0 with all answer slots empty
    pub fn new(
        phone_number: &str,
        language: Language,
        now: DateTime<Utc>,
        timeout: Duration,
    ) -> Session {
        Session {
            phone_number: phone_number.to_string(),
            current_step: 0,
            last_name_code: None,
            first_name_code: None,
            birth_year_digit: None,
            city_code: None,
            gender_code: None,
            language,
            created_at: now,
            updated_at: now,
            expires_at: now + timeout,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Pure transition: store the validated raw answer, advance one
    /// step, stamp `updated_at`.
    pub fn advance(mut self, field: Field, raw_answer: &str, now: DateTime<Utc>) -> Session {
        let slot = match field {
            Field::LastNameCode => &mut self.last_name_code,
            Field::FirstNameCode => &mut self.first_name_code,
            Field::BirthYearDigit => &mut self.birth_year_digit,
            Field::CityCode => &mut self.city_code,
            Field::GenderCode => &mut self.gender_code,
        };
        *slot = Some(raw_answer.to_string());
        self.current_step += 1;
        self.updated_at = now;
        self
    }

    /// Gather all five answers at the terminal transition.
    ///
    /// A missing slot here is a programming error, not user error.
    pub fn collect(&self) -> Result<CollectedAnswers> {
        let take = |slot: &Option<String>, field: Field| {
            slot.clone().ok_or_else(|| {
                Error::Internal(format!(
                    "Session for {} completed without answer for {}",
                    self.phone_number,
                    field.as_str()
                ))
            })
        };
        Ok(CollectedAnswers {
            last_name_code: take(&self.last_name_code, Field::LastNameCode)?,
            first_name_code: take(&self.first_name_code, Field::FirstNameCode)?,
            birth_year_digit: take(&self.birth_year_digit, Field::BirthYearDigit)?,
            city_code: take(&self.city_code, Field::CityCode)?,
            gender_code: take(&self.gender_code, Field::GenderCode)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> Session {
        Session::new("+243100000", Language::Fr, Utc::now(), Duration::minutes(15))
    }

    #[test]
    fn new_session_starts_at_step_zero() {
        let s = fresh();
        assert_eq!(s.current_step, 0);
        assert!(s.last_name_code.is_none());
        assert_eq!(s.expires_at, s.created_at + Duration::minutes(15));
    }

    #[test]
    fn advance_writes_slot_and_bumps_step() {
        let now = Utc::now();
        let s = fresh().advance(Field::LastNameCode, "Mbemba", now);
        assert_eq!(s.current_step, 1);
        assert_eq!(s.last_name_code.as_deref(), Some("Mbemba"));
        assert_eq!(s.updated_at, now);
        assert!(s.first_name_code.is_none());
    }

    #[test]
    fn expiry_is_strictly_after_deadline() {
        let s = fresh();
        assert!(!s.is_expired(s.expires_at));
        assert!(s.is_expired(s.expires_at + Duration::seconds(1)));
    }

    #[test]
    fn collect_requires_all_slots() {
        let now = Utc::now();
        let partial = fresh().advance(Field::LastNameCode, "MBE", now);
        assert!(partial.collect().is_err());

        let full = fresh()
            .advance(Field::LastNameCode, "MBE", now)
            .advance(Field::FirstNameCode, "IBR", now)
            .advance(Field::BirthYearDigit, "7", now)
            .advance(Field::CityCode, "DA", now)
            .advance(Field::GenderCode, "1", now);
        let answers = full.collect().expect("all slots filled");
        assert_eq!(answers.last_name_code, "MBE");
        assert_eq!(answers.gender_code, "1");
    }
}
