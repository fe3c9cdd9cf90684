//! Field validators and the validated string types built on them.
//!
//! The predicates are total: malformed input yields `false`, never a panic.
//! Only ASCII letters and digits are recognised; anything else (including
//! non-ASCII letters) fails the checks.

use std::{fmt, ops::Deref};

use non_empty_string::NonEmptyString;

/// Returns `true` if `s` is non-empty and made only of ASCII letters and
/// digits.
#[must_use]
pub fn is_alphanumeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Returns `true` if `s` is non-empty and made only of ASCII letters and
/// spaces.
#[must_use]
pub fn is_letters_only(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphabetic() || b == b' ')
}

/// Returns `true` if `s` is non-empty and made only of ASCII digits.
///
/// No sign is accepted and leading zeros are allowed.
#[must_use]
pub fn is_whole_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Compares two strings, folding only ASCII uppercase letters to lowercase.
#[must_use]
pub fn equals_ignore_case(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.eq_ignore_ascii_case(b)
}

/// Parses a whole number field.
///
/// # Errors
///
/// Returns [`ValidationError::NotWholeNumber`] if `value` fails
/// [`is_whole_number`], or [`ValidationError::OutOfRange`] if it does not fit
/// in a `u32`.
pub fn parse_whole_number(field: &'static str, value: &str) -> Result<u32, ValidationError> {
    if !is_whole_number(value) {
        return Err(ValidationError::NotWholeNumber {
            field,
            value: value.to_string(),
        });
    }
    value.parse().map_err(|_| ValidationError::OutOfRange {
        field,
        value: value.to_string(),
    })
}

/// A field value that does not have the shape its field requires.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The value must contain only letters and digits.
    #[error("{field} must be strictly alphanumeric (got '{value}')")]
    NotAlphanumeric {
        /// The field being validated.
        field: &'static str,
        /// The rejected input.
        value: String,
    },

    /// The value must contain only letters and spaces.
    #[error("{field} should be letters only (got '{value}')")]
    NotLetters {
        /// The field being validated.
        field: &'static str,
        /// The rejected input.
        value: String,
    },

    /// The value must be a whole number.
    #[error("{field} should be a whole number (got '{value}')")]
    NotWholeNumber {
        /// The field being validated.
        field: &'static str,
        /// The rejected input.
        value: String,
    },

    /// The value is a whole number too large to store.
    #[error("{field} is out of range (got '{value}')")]
    OutOfRange {
        /// The field being validated.
        field: &'static str,
        /// The rejected input.
        value: String,
    },
}

impl ValidationError {
    /// The label of the field that failed validation.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::NotAlphanumeric { field, .. }
            | Self::NotLetters { field, .. }
            | Self::NotWholeNumber { field, .. }
            | Self::OutOfRange { field, .. } => field,
        }
    }
}

/// A student id or course code: non-empty, ASCII letters and digits only.
///
/// Keys keep the case they were created with. Use [`RecordKey::matches`] to
/// compare against user input.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordKey(NonEmptyString);

impl RecordKey {
    /// Validates `value` as a key for the named field.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotAlphanumeric`] if the value is empty or
    /// contains anything other than ASCII letters and digits.
    pub fn new(field: &'static str, value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if !is_alphanumeric(&value) {
            return Err(ValidationError::NotAlphanumeric { field, value });
        }
        NonEmptyString::new(value)
            .map(Self)
            .map_err(|value| ValidationError::NotAlphanumeric { field, value })
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Case-insensitive comparison with a raw key, ignoring surrounding
    /// whitespace in `other`.
    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        equals_ignore_case(self.as_str(), other.trim())
    }
}

impl Deref for RecordKey {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A person's name: non-empty, ASCII letters and spaces only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(NonEmptyString);

impl PersonName {
    /// Validates `value` as a name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotLetters`] if the value fails
    /// [`is_letters_only`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if !is_letters_only(&value) {
            return Err(ValidationError::NotLetters {
                field: "Name",
                value,
            });
        }
        NonEmptyString::new(value)
            .map(Self)
            .map_err(|value| ValidationError::NotLetters {
                field: "Name",
                value,
            })
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("S1", true; "letters and digits")]
    #[test_case("abcXYZ019", true; "mixed case")]
    #[test_case("", false; "empty")]
    #[test_case("S 1", false; "embedded space")]
    #[test_case("S-1", false; "punctuation")]
    #[test_case("Ström", false; "non ascii letter")]
    fn alphanumeric(input: &str, expected: bool) {
        assert_eq!(is_alphanumeric(input), expected);
    }

    #[test_case("Ann Lee", true; "two words")]
    #[test_case(" ", true; "only a space")]
    #[test_case("", false; "empty")]
    #[test_case("Ann2", false; "digit")]
    #[test_case("O'Neil", false; "apostrophe")]
    fn letters_only(input: &str, expected: bool) {
        assert_eq!(is_letters_only(input), expected);
    }

    #[test_case("20", true; "plain")]
    #[test_case("007", true; "leading zeros")]
    #[test_case("", false; "empty")]
    #[test_case("-1", false; "negative sign")]
    #[test_case("+1", false; "positive sign")]
    #[test_case("1.5", false; "decimal")]
    #[test_case(" 1", false; "leading space")]
    fn whole_number(input: &str, expected: bool) {
        assert_eq!(is_whole_number(input), expected);
    }

    #[test_case("CS101", "cs101", true; "case folded")]
    #[test_case("CS101", "CS101", true; "identical")]
    #[test_case("CS101", "CS1010", false; "length differs")]
    #[test_case("", "", true; "both empty")]
    #[test_case("É", "é", false; "non ascii is not folded")]
    fn ignore_case(a: &str, b: &str, expected: bool) {
        assert_eq!(equals_ignore_case(a, b), expected);
    }

    #[test]
    fn whole_number_beyond_u32_is_out_of_range() {
        let err = parse_whole_number("Age", "99999999999").unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
        assert_eq!(err.field(), "Age");
    }

    #[test]
    fn whole_number_keeps_value() {
        assert_eq!(parse_whole_number("Units", "003"), Ok(3));
    }

    #[test]
    fn record_key_matches_ignoring_case_and_padding() {
        let key = RecordKey::new("Student ID", "S1").unwrap();
        assert!(key.matches("s1"));
        assert!(key.matches(" S1 "));
        assert!(!key.matches("S10"));
    }

    #[test]
    fn record_key_rejects_spaces() {
        let err = RecordKey::new("Student ID", "S 1").unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotAlphanumeric {
                field: "Student ID",
                value: "S 1".to_string()
            }
        );
    }

    #[test]
    fn person_name_rejects_digits() {
        assert!(PersonName::new("Ann Lee").is_ok());
        assert!(matches!(
            PersonName::new("R2D2"),
            Err(ValidationError::NotLetters { .. })
        ));
    }
}
