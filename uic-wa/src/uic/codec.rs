//! Fixed-width UIC encoding and the two hash purposes
//!
//! The public code body is `LLLFFFYCG` (10 characters):
//!
//! | field | source            | width | rule                          |
//! |-------|-------------------|-------|-------------------------------|
//! | L     | last-name code    | 3     | first 3 chars, right-pad `X`  |
//! | F     | first-name code   | 3     | first 3 chars, right-pad `X`  |
//! | Y     | birth-year digit  | 1     | last char (full year accepted)|
//! | C     | city code         | 2     | first 2 chars, right-pad `X`  |
//! | G     | gender code       | 1     | first char                    |
//!
//! Padding with `X` is deliberately lossy: two different short inputs
//! can collide on the padded field. Deployments that need extra
//! entropy append the salted [`hash_suffix`] to the public code.
//!
//! The dedup [`fingerprint`] is never salted, so duplicate detection
//! survives salt rotation.

use sha2::{Digest, Sha256};

use super::NormalizedAnswers;

/// Filler character for short fields
pub const FILLER: char = 'X';

/// Length of the salted suffix (hex digits)
pub const SUFFIX_LEN: usize = 5;

/// Encode the 10-character code body from already-normalized fields.
///
/// The codec only slices, pads, and concatenates; character-class
/// normalization happened upstream.
pub fn encode(answers: &NormalizedAnswers) -> String {
    let mut code = String::with_capacity(10);
    push_padded(&mut code, &answers.last_name_code, 3);
    push_padded(&mut code, &answers.first_name_code, 3);
    code.push(answers.birth_year_digit.chars().last().unwrap_or(FILLER));
    push_padded(&mut code, &answers.city_code, 2);
    code.push(answers.gender_code.chars().next().unwrap_or(FILLER));
    code
}

fn push_padded(out: &mut String, field: &str, width: usize) {
    let mut taken = 0;
    for c in field.chars().take(width) {
        out.push(c);
        taken += 1;
    }
    for _ in taken..width {
        out.push(FILLER);
    }
}

/// Unsalted SHA-256 over the pipe-joined normalized fields, hex-encoded.
///
/// Used solely for duplicate detection; identical normalized input
/// always maps to the same fingerprint regardless of the configured
/// salt.
pub fn fingerprint(answers: &NormalizedAnswers) -> String {
    let joined = format!(
        "{}|{}|{}|{}|{}",
        answers.last_name_code,
        answers.first_name_code,
        answers.birth_year_digit,
        answers.city_code,
        answers.gender_code
    );
    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Salted 5-hex-digit suffix, uppercased.
pub fn hash_suffix(answers: &NormalizedAnswers, salt: &str) -> String {
    let seed = format!(
        "{}{}{}{}{}{}",
        answers.last_name_code,
        answers.first_name_code,
        answers.birth_year_digit,
        answers.city_code,
        answers.gender_code,
        salt
    );
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..SUFFIX_LEN].to_ascii_uppercase()
}
