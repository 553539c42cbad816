//! ISBN validation, check digits, and conversion
//!
//! Implements the ISBN-10 and ISBN-13 weighted-sum check digit algorithms
//! and the conversion between the two forms. All functions are pure; the
//! checksum helpers expect their input to be pre-validated digit strings.

use rand::Rng;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// ISBN domain errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IsbnError {
    /// Input is neither a valid ISBN-13 nor a valid ISBN-10
    #[error("Unrecognized ISBN: {0:?}")]
    Unrecognized(String),

    /// Conversion input had the wrong length
    #[error("Invalid ISBN length: {0}")]
    InvalidLength(usize),
}

/// Which of the two forms was the original valid input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IsbnSource {
    Isbn13,
    Isbn10,
}

/// A book identifier carrying both forms plus a tag for the original one.
///
/// The two forms are always check-digit consistent: the sibling of the
/// valid input is derived by conversion, never supplied independently.
/// Only the identifier pair goes on the wire; the source tag does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Isbn {
    pub isbn13: String,
    pub isbn10: String,
    #[serde(skip)]
    pub source: IsbnSource,
}

impl Isbn {
    /// Classify a raw identifier string and populate both forms.
    ///
    /// The input is normalized first, so `"0-306-40615-2"` and
    /// `"0 306 40615 2"` both classify as the same ISBN-10.
    pub fn parse(input: &str) -> Result<Self, IsbnError> {
        let normalized = normalize(input);

        if is_valid_isbn13(&normalized) {
            let isbn10 = isbn13_to_10(&normalized)?;
            Ok(Self {
                isbn13: normalized,
                isbn10,
                source: IsbnSource::Isbn13,
            })
        } else if is_valid_isbn10(&normalized) {
            let isbn13 = isbn10_to_13(&normalized)?;
            Ok(Self {
                isbn13,
                isbn10: normalized,
                source: IsbnSource::Isbn10,
            })
        } else {
            Err(IsbnError::Unrecognized(input.to_string()))
        }
    }

    /// The value recorded to the ledger: the form the source originally held.
    pub fn source_value(&self) -> &str {
        match self.source {
            IsbnSource::Isbn13 => &self.isbn13,
            IsbnSource::Isbn10 => &self.isbn10,
        }
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.isbn13)
    }
}

/// Strip spaces and hyphens and uppercase the remainder.
pub fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect::<String>()
        .to_uppercase()
}

/// ISBN-13 check digit for a 12-digit prefix.
///
/// Digits are summed with alternating weights 1 and 3 starting at weight 1.
pub fn checksum13(digits: &str) -> char {
    let sum: u32 = digits
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let val = u32::from(b.wrapping_sub(b'0'));
            if i % 2 == 0 {
                val
            } else {
                val * 3
            }
        })
        .sum();

    let check = (10 - sum % 10) % 10;
    char::from(b'0' + check as u8)
}

/// ISBN-10 check symbol for a 9-digit prefix.
///
/// Digits are summed with weights 10 down to 2; a remainder of 10 maps to
/// the symbol `X`.
pub fn checksum10(digits: &str) -> char {
    let sum: u32 = digits
        .bytes()
        .enumerate()
        .map(|(i, b)| u32::from(b.wrapping_sub(b'0')) * (10 - i as u32))
        .sum();

    let check = (11 - sum % 11) % 11;
    if check == 10 {
        'X'
    } else {
        char::from(b'0' + check as u8)
    }
}

/// True iff the input is 13 ASCII digits ending in the correct check digit.
pub fn is_valid_isbn13(input: &str) -> bool {
    if input.len() != 13 || !input.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    char::from(input.as_bytes()[12]) == checksum13(&input[..12])
}

/// True iff the input is 9 ASCII digits followed by the correct check
/// symbol (a digit or `X`).
pub fn is_valid_isbn10(input: &str) -> bool {
    if input.len() != 10 {
        return false;
    }
    let (head, tail) = input.split_at(9);
    if !head.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let check = tail.as_bytes()[0];
    if !check.is_ascii_digit() && check != b'X' {
        return false;
    }
    char::from(check) == checksum10(head)
}

/// Convert a valid ISBN-13 to its ISBN-10 form.
///
/// Drops the 3-digit prefix, keeps the next 9 digits, and appends their
/// ISBN-10 check symbol.
pub fn isbn13_to_10(isbn13: &str) -> Result<String, IsbnError> {
    if isbn13.len() != 13 {
        return Err(IsbnError::InvalidLength(isbn13.len()));
    }

    let body = &isbn13[3..12];
    let mut isbn10 = String::with_capacity(10);
    isbn10.push_str(body);
    isbn10.push(checksum10(body));
    Ok(isbn10)
}

/// Convert a valid ISBN-10 to its ISBN-13 form.
///
/// Prepends the `978` prefix to the first 9 digits and appends the ISBN-13
/// check digit of the resulting 12 digits.
pub fn isbn10_to_13(isbn10: &str) -> Result<String, IsbnError> {
    if isbn10.len() != 10 {
        return Err(IsbnError::InvalidLength(isbn10.len()));
    }

    let mut isbn13 = String::with_capacity(13);
    isbn13.push_str("978");
    isbn13.push_str(&isbn10[..9]);
    isbn13.push(checksum13(&isbn13));
    Ok(isbn13)
}

/// Generate a random valid ISBN-13 with the common `978` prefix.
pub fn random_isbn13() -> String {
    let mut isbn13 = String::with_capacity(13);
    isbn13.push_str("978");
    isbn13.push_str(&random_digits(9));
    isbn13.push(checksum13(&isbn13));
    isbn13
}

/// Generate a random valid ISBN-10.
pub fn random_isbn10() -> String {
    let mut isbn10 = random_digits(9);
    isbn10.push(checksum10(&isbn10));
    isbn10
}

fn random_digits(count: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_separators() {
        assert_eq!(normalize("978-0-306-40615-7"), "9780306406157");
        assert_eq!(normalize("0 306 40615 2"), "0306406152");
        assert_eq!(normalize("080442957x"), "080442957X");
    }

    #[test]
    fn test_checksum13_known_values() {
        assert_eq!(checksum13("978030640615"), '7');
        assert_eq!(checksum13("978044101359"), '3');
    }

    #[test]
    fn test_checksum10_known_values() {
        assert_eq!(checksum10("030640615"), '2');
        // Remainder 10 maps to 'X'.
        assert_eq!(checksum10("080442957"), 'X');
    }

    #[test]
    fn test_valid_isbn13() {
        assert!(is_valid_isbn13("9780306406157"));
        assert!(!is_valid_isbn13("9780306406158"));
        assert!(!is_valid_isbn13("978030640615"));
        assert!(!is_valid_isbn13("978030640615X"));
    }

    #[test]
    fn test_valid_isbn10() {
        assert!(is_valid_isbn10("0306406152"));
        assert!(is_valid_isbn10("080442957X"));
        assert!(!is_valid_isbn10("0306406153"));
        assert!(!is_valid_isbn10("030640615"));
        // 'X' is only legal as the check symbol.
        assert!(!is_valid_isbn10("X306406152"));
    }

    #[test]
    fn test_appended_checksum13_always_validates() {
        for _ in 0..100 {
            let mut candidate = random_digits(12);
            candidate.push(checksum13(&candidate));
            assert!(is_valid_isbn13(&candidate), "failed for {candidate}");
        }
    }

    #[test]
    fn test_appended_checksum10_always_validates() {
        for _ in 0..100 {
            let mut candidate = random_digits(9);
            candidate.push(checksum10(&candidate));
            assert!(is_valid_isbn10(&candidate), "failed for {candidate}");
        }
    }

    #[test]
    fn test_conversion_known_pair() {
        assert_eq!(isbn13_to_10("9780306406157").unwrap(), "0306406152");
        assert_eq!(isbn10_to_13("0306406152").unwrap(), "9780306406157");
    }

    #[test]
    fn test_conversion_rejects_bad_length() {
        assert_eq!(isbn13_to_10("978").unwrap_err(), IsbnError::InvalidLength(3));
        assert_eq!(isbn10_to_13("123").unwrap_err(), IsbnError::InvalidLength(3));
    }

    #[test]
    fn test_roundtrip_through_isbn10() {
        // Any 978-prefixed ISBN-13 survives a trip through its ISBN-10 form.
        for _ in 0..100 {
            let original = random_isbn13();
            let via10 = isbn13_to_10(&original).unwrap();
            assert_eq!(isbn10_to_13(&via10).unwrap(), original);
        }
    }

    #[test]
    fn test_parse_classifies_isbn13() {
        let isbn = Isbn::parse("978-0-306-40615-7").unwrap();
        assert_eq!(isbn.isbn13, "9780306406157");
        assert_eq!(isbn.isbn10, "0306406152");
        assert_eq!(isbn.source, IsbnSource::Isbn13);
        assert_eq!(isbn.source_value(), "9780306406157");
    }

    #[test]
    fn test_parse_classifies_isbn10() {
        let isbn = Isbn::parse("0306406152").unwrap();
        assert_eq!(isbn.isbn13, "9780306406157");
        assert_eq!(isbn.isbn10, "0306406152");
        assert_eq!(isbn.source, IsbnSource::Isbn10);
        assert_eq!(isbn.source_value(), "0306406152");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            Isbn::parse("not-an-isbn"),
            Err(IsbnError::Unrecognized(_))
        ));
        assert!(matches!(Isbn::parse(""), Err(IsbnError::Unrecognized(_))));
        // Correct length, wrong check digit.
        assert!(matches!(
            Isbn::parse("9780306406158"),
            Err(IsbnError::Unrecognized(_))
        ));
    }

    #[test]
    fn test_serialized_body_omits_source() {
        let isbn = Isbn::parse("0306406152").unwrap();
        let body = serde_json::to_value(&isbn).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"isbn13": "9780306406157", "isbn10": "0306406152"})
        );
    }

    #[test]
    fn test_random_generators_produce_valid_identifiers() {
        for _ in 0..20 {
            assert!(is_valid_isbn13(&random_isbn13()));
            assert!(is_valid_isbn10(&random_isbn10()));
        }
    }

    #[test]
    fn test_display_is_isbn13_form() {
        let isbn = Isbn::parse("0306406152").unwrap();
        assert_eq!(isbn.to_string(), "9780306406157");
    }
}
