//! Birthday record model.
//!
//! # Responsibility
//! - Define the record persisted as one element of the JSON array.
//! - Parse and normalize birthday text.
//!
//! # Invariants
//! - Wire field order is `name`, `birthday`, `isLunar`, `avatar`.
//! - A missing or `null` avatar decodes as an empty string.
//! - `validate()` is the single gate used by every write path.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Text format of the `birthday` field.
pub const BIRTHDAY_FORMAT: &str = "%Y-%m-%d";

// chrono's `%Y` also takes signed and short years; require four digits.
static BIRTHDAY_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}$").expect("valid birthday shape regex"));

/// Validation failure for record input.
///
/// Callers are expected to re-prompt; nothing is mutated when this is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// Name is empty after trimming.
    EmptyName,
    /// Birthday text is not a valid `YYYY-MM-DD` calendar date.
    InvalidBirthday(String),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name cannot be empty"),
            Self::InvalidBirthday(value) => {
                write!(f, "invalid birthday `{value}`; expected YYYY-MM-DD")
            }
        }
    }
}

impl Error for RecordValidationError {}

/// One birthday entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdayRecord {
    /// Display name of the person.
    pub name: String,
    /// Date text in `YYYY-MM-DD` form.
    pub birthday: String,
    /// Whether the date follows the lunar calendar.
    #[serde(rename = "isLunar")]
    pub is_lunar: bool,
    /// Image filename relative to the images directory, empty for none.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub avatar: String,
}

impl BirthdayRecord {
    /// Builds a validated record from raw user input.
    ///
    /// Name and avatar are trimmed; birthday is normalized to `YYYY-MM-DD`.
    ///
    /// # Errors
    /// - `EmptyName` when `name` is blank.
    /// - `InvalidBirthday` when `birthday` does not parse.
    pub fn new(
        name: &str,
        birthday: &str,
        is_lunar: bool,
        avatar: &str,
    ) -> Result<Self, RecordValidationError> {
        let name = normalize_name(name)?;
        let birthday = normalize_birthday(birthday)?;
        Ok(Self {
            name,
            birthday,
            is_lunar,
            avatar: avatar.trim().to_string(),
        })
    }

    /// Checks the record against write-path rules.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        normalize_name(&self.name)?;
        parse_birthday(&self.birthday)?;
        Ok(())
    }

    /// Returns the avatar filename, or `None` when unset.
    pub fn avatar(&self) -> Option<&str> {
        if self.avatar.is_empty() {
            None
        } else {
            Some(self.avatar.as_str())
        }
    }

}

/// Parses birthday text as a calendar date.
///
/// Surrounding whitespace is ignored. The year must be exactly four digits;
/// impossible dates such as `2024-02-30` are rejected.
pub fn parse_birthday(value: &str) -> Result<NaiveDate, RecordValidationError> {
    let trimmed = value.trim();
    if !BIRTHDAY_SHAPE_RE.is_match(trimmed) {
        return Err(RecordValidationError::InvalidBirthday(trimmed.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, BIRTHDAY_FORMAT)
        .map_err(|_| RecordValidationError::InvalidBirthday(trimmed.to_string()))
}

/// Parses birthday text and renders it back in canonical form.
pub fn normalize_birthday(value: &str) -> Result<String, RecordValidationError> {
    parse_birthday(value).map(|date| date.format(BIRTHDAY_FORMAT).to_string())
}

/// Trims a name and rejects blank input.
pub fn normalize_name(value: &str) -> Result<String, RecordValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RecordValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
