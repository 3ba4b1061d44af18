//! Text normalization for UIC derivation
//!
//! The same person must produce the same canonical text no matter how
//! they typed their answer: accents, case, punctuation, and spacing
//! all collapse. Critical for French-language deployments where
//! "Gédéon" and "gedeon" are the same name.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize raw text to canonical uppercase alphanumeric form.
///
/// 1. NFD decomposition separates base letters from combining marks
/// 2. Combining marks (accents) are discarded
/// 3. Every remaining non-ASCII-alphanumeric character is discarded
/// 4. The result is uppercased
///
/// Empty or all-whitespace input yields an empty string, not an error.
/// The function is idempotent.
pub fn normalize(text: &str) -> String {
    text.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_accents() {
        assert_eq!(normalize("Gédéon"), "GEDEON");
        assert_eq!(normalize("François"), "FRANCOIS");
        assert_eq!(normalize("Kanyinda"), "KANYINDA");
    }

    #[test]
    fn uppercases() {
        assert_eq!(normalize("jean"), "JEAN");
        assert_eq!(normalize("KaBiLa"), "KABILA");
    }

    #[test]
    fn strips_special_characters() {
        assert_eq!(normalize("N'Djamena"), "NDJAMENA");
        assert_eq!(normalize("Jean-Paul"), "JEANPAUL");
        assert_eq!(normalize("Kinshasa (Gombe)"), "KINSHASAGOMBE");
    }

    #[test]
    fn empty_and_whitespace_yield_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize(" \t\n"), "");
    }

    #[test]
    fn idempotent() {
        for input in ["Gédéon", "N'Djamena", "  jean-PAUL  ", "1997", ""] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn case_and_accent_insensitive() {
        let a = normalize("Gédéon");
        let b = normalize("gedeon");
        let c = normalize("GEDEON");
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(c, "GEDEON");
    }

    #[test]
    fn keeps_digits() {
        assert_eq!(normalize(" 1997 "), "1997");
        assert_eq!(normalize("7"), "7");
    }
}
