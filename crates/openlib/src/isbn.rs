//! ISBN format validation.
//!
//! Validation only checks the shape of an identifier: after trimming surrounding whitespace it
//! must be 10 or 13 UTF-16 code units long and consist only of ASCII digits. Check digits are not
//! verified.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single rule broken by a candidate ISBN.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    /// The candidate was not a string at all.
    NotAString,
    /// The trimmed candidate is neither 10 nor 13 UTF-16 code units long.
    Length,
    /// The trimmed candidate contains something other than `0-9`.
    NonNumeric,
}

impl Violation {
    /// Human readable message for the rule.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotAString => "ISBN must be a string",
            Self::Length => "Must be 10 or 13-digit",
            Self::NonNumeric => "Must consist of only numbers",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// The outcome of validating a candidate ISBN.
///
/// Violations are kept in the order the rules are checked: the length rule always comes before
/// the numeric rule.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Validation {
    violations: Vec<Violation>,
}

impl Validation {
    /// `true` when no rule was violated.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// The violated rules, in the order they were checked.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// The messages of the violated rules, in the order they were checked.
    pub fn messages(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.violations.iter().map(|v| v.message())
    }
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut messages = self.messages();
        if let Some(first) = messages.next() {
            f.write_str(first)?;
        }
        for message in messages {
            write!(f, ", {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Validation {}

/// Validates the format of a candidate ISBN.
///
/// Leading and trailing whitespace is ignored, embedded whitespace is not. Both the length and
/// the numeric rule are always checked so an input can violate both.
///
/// ```
/// use openlib::isbn::{validate, Violation};
///
/// assert!(validate(" 0123456789 ").is_valid());
/// assert_eq!(
///     &[Violation::Length, Violation::NonNumeric],
///     validate("abc").violations()
/// );
/// ```
#[must_use]
pub fn validate(isbn: &str) -> Validation {
    let trimmed = trim(isbn);
    let mut violations = Vec::new();

    // length in UTF-16 code units, so characters outside the BMP count twice
    let len = trimmed.encode_utf16().count();
    if len != 10 && len != 13 {
        violations.push(Violation::Length);
    }

    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        violations.push(Violation::NonNumeric);
    }

    Validation { violations }
}

/// Strips the same surrounding whitespace as ECMAScript's `String.prototype.trim`: the BOM
/// (U+FEFF) is stripped and NEL (U+0085) is kept.
fn trim(s: &str) -> &str {
    s.trim_matches(|c: char| (c.is_whitespace() && c != '\u{85}') || c == '\u{FEFF}')
}

/// Validates an ISBN taken from untyped JSON input.
///
/// Any value other than a JSON string fails with only [`Violation::NotAString`].
#[must_use]
pub fn validate_value(value: &Value) -> Validation {
    match value {
        Value::String(isbn) => validate(isbn),
        _ => Validation {
            violations: vec![Violation::NotAString],
        },
    }
}

/// An ISBN that has passed [`validate`].
///
/// The original input is kept as-is, surrounding whitespace included, and that is the value
/// sent to the search API.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "String")]
pub struct Isbn(String);

impl Isbn {
    /// The ISBN exactly as it was given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The ISBN without surrounding whitespace.
    #[must_use]
    pub fn trimmed(&self) -> &str {
        trim(&self.0)
    }
}

impl FromStr for Isbn {
    type Err = Validation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let validation = validate(s);
        if validation.is_valid() {
            Ok(Self(s.to_owned()))
        } else {
            Err(validation)
        }
    }
}

impl TryFrom<Value> for Isbn {
    type Error = Validation;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => s.parse(),
            other => Err(validate_value(&other)),
        }
    }
}

impl From<Isbn> for String {
    fn from(isbn: Isbn) -> Self {
        isbn.0
    }
}

impl AsRef<str> for Isbn {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
