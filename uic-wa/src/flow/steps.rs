//! The fixed conversation step table
//!
//! UIC formula: LLLFFFYCG
//! - LLL = first 3 letters of the last-name code
//! - FFF = first 3 letters of the first-name code
//! - Y   = last digit of the birth year
//! - C   = city code (2 letters)
//! - G   = gender code (1 digit: 1, 2, 3, or 4)
//!
//! Steps are data only: the validator is a closed enum dispatched by
//! variant tag, never a stored closure, so the table stays
//! serializable and trivially inspectable.
//!
//! User-facing validation messages are in French for the DRC
//! deployment; question text carries both languages.

use uic_common::config::Language;

use super::session::Field;

/// Answer validator, dispatched by variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    /// Alphabetic characters only, at least `min_len` of them
    LettersOnly { min_len: usize },
    /// ASCII digits only, at least one
    DigitsOnly,
    /// Exactly `len` alphabetic characters
    ExactLetters { len: usize },
    /// Must be one of the listed values (after trimming)
    OneOf(&'static [&'static str]),
    /// Any non-empty answer
    NonEmpty,
}

impl Validator {
    /// Validate a raw answer. `Err` carries the user-facing reason.
    pub fn validate(&self, raw: &str) -> Result<(), &'static str> {
        let answer = raw.trim();
        match self {
            Validator::LettersOnly { min_len } => {
                if answer.is_empty() || !answer.chars().all(|c| c.is_alphabetic()) {
                    return Err(
                        "Veuillez entrer uniquement des lettres (pas de chiffres ou de caractères spéciaux)",
                    );
                }
                if answer.chars().count() < *min_len {
                    return Err("Veuillez entrer au moins 2 lettres");
                }
                Ok(())
            }
            Validator::DigitsOnly => {
                if answer.is_empty() || !answer.chars().all(|c| c.is_ascii_digit()) {
                    return Err(
                        "Veuillez entrer uniquement des chiffres (pas de lettres ou d'espaces)",
                    );
                }
                Ok(())
            }
            Validator::ExactLetters { len } => {
                if answer.is_empty() || !answer.chars().all(|c| c.is_alphabetic()) {
                    return Err("Le code de ville doit contenir uniquement des lettres");
                }
                if answer.chars().count() != *len {
                    return Err("Le code de ville doit contenir exactement 2 lettres");
                }
                Ok(())
            }
            Validator::OneOf(allowed) => {
                if !answer.chars().all(|c| c.is_ascii_digit()) {
                    return Err("Veuillez entrer un chiffre (1, 2, 3 ou 4)");
                }
                if !allowed.contains(&answer) {
                    return Err("Le code de genre doit être 1, 2, 3 ou 4");
                }
                Ok(())
            }
            Validator::NonEmpty => {
                if answer.is_empty() {
                    return Err("Veuillez fournir une réponse");
                }
                Ok(())
            }
        }
    }
}

/// One question/validator/field triple in the fixed sequence
#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub key: &'static str,
    pub field: Field,
    pub question_en: &'static str,
    pub question_fr: &'static str,
    pub validator: Validator,
}

impl Step {
    pub fn question(&self, language: Language) -> &'static str {
        match language {
            Language::Fr => self.question_fr,
            Language::En => self.question_en,
        }
    }
}

/// The fixed, ordered conversation flow
pub const STEPS: &[Step] = &[
    Step {
        key: "last_name_code",
        field: Field::LastNameCode,
        question_en: "Question 1 of 5:\n\n\
            What are the first 3 letters of your last name?\n\n\
            Example: MBE",
        question_fr: "Question 1 sur 5:\n\n\
            Quelles sont les 3 premières lettres de votre nom de famille?\n\n\
            Exemple: MBE",
        validator: Validator::LettersOnly { min_len: 2 },
    },
    Step {
        key: "first_name_code",
        field: Field::FirstNameCode,
        question_en: "Question 2 of 5:\n\n\
            What are the first 3 letters of your first name?\n\n\
            Example: IBR",
        question_fr: "Question 2 sur 5:\n\n\
            Quelles sont les 3 premières lettres de votre prénom?\n\n\
            Exemple: IBR",
        validator: Validator::LettersOnly { min_len: 2 },
    },
    Step {
        key: "birth_year_digit",
        field: Field::BirthYearDigit,
        question_en: "Question 3 of 5:\n\n\
            What is the last digit of your birth year?\n\n\
            Example: 7",
        question_fr: "Question 3 sur 5:\n\n\
            Quel est le dernier chiffre de votre année de naissance?\n\n\
            Exemple: 7 (pour 1997)",
        validator: Validator::DigitsOnly,
    },
    Step {
        key: "city_code",
        field: Field::CityCode,
        question_en: "Question 4 of 5:\n\n\
            What is your city code?\n\n\
            Example: DA",
        question_fr: "Question 4 sur 5:\n\n\
            Quel est le code de votre ville de naissance?\n\
            (2 lettres)\n\n\
            Exemple: DA (pour Dakar)",
        validator: Validator::ExactLetters { len: 2 },
    },
    Step {
        key: "gender_code",
        field: Field::GenderCode,
        question_en: "Question 5 of 5:\n\n\
            What is your gender code?\n\n\
            Enter 1, 2, 3, or 4",
        question_fr: "Question 5 sur 5:\n\n\
            Quel est votre code de genre?\n\n\
            1 = Homme\n\
            2 = Femme\n\
            3 = Trans\n\
            4 = Autre",
        validator: Validator::OneOf(&["1", "2", "3", "4"]),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_steps_in_schema_order() {
        assert_eq!(STEPS.len(), 5);
        assert_eq!(STEPS[0].field, Field::LastNameCode);
        assert_eq!(STEPS[4].field, Field::GenderCode);
    }

    #[test]
    fn letters_only_accepts_accented_names() {
        let v = Validator::LettersOnly { min_len: 2 };
        assert!(v.validate("Mbemba").is_ok());
        assert!(v.validate("Gédéon").is_ok());
        assert!(v.validate("  MBE  ").is_ok());
    }

    #[test]
    fn letters_only_rejects_digits_and_short_input() {
        let v = Validator::LettersOnly { min_len: 2 };
        assert!(v.validate("1985").is_err());
        assert!(v.validate("Jean-Paul").is_err());
        assert!(v.validate("M").is_err());
        assert!(v.validate("").is_err());
    }

    #[test]
    fn digits_only() {
        let v = Validator::DigitsOnly;
        assert!(v.validate("7").is_ok());
        assert!(v.validate("1997").is_ok());
        assert!(v.validate("sept").is_err());
        assert!(v.validate("").is_err());
    }

    #[test]
    fn exact_letters_for_city_code() {
        let v = Validator::ExactLetters { len: 2 };
        assert!(v.validate("DA").is_ok());
        assert!(v.validate("da").is_ok());
        assert!(v.validate("D").is_err());
        assert!(v.validate("DAK").is_err());
        assert!(v.validate("D1").is_err());
    }

    #[test]
    fn gender_code_is_enumerated() {
        let v = STEPS[4].validator;
        for ok in ["1", "2", "3", "4", " 2 "] {
            assert!(v.validate(ok).is_ok(), "{:?} should pass", ok);
        }
        for bad in ["5", "0", "homme", ""] {
            assert!(v.validate(bad).is_err(), "{:?} should fail", bad);
        }
    }

    #[test]
    fn non_empty() {
        let v = Validator::NonEmpty;
        assert!(v.validate("x").is_ok());
        assert!(v.validate("   ").is_err());
    }

    #[test]
    fn questions_exist_in_both_languages() {
        for step in STEPS {
            assert!(!step.question(Language::Fr).is_empty());
            assert!(!step.question(Language::En).is_empty());
        }
    }
}
