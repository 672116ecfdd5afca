//! Field rules for the contact form
//!
//! Each rule names a field, a check and the message shown when the check
//! fails. The table order is the evaluation order.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::email::is_valid_email;
use super::ValidationError;
use crate::types::RawSubmission;

/// Visible contact-form fields that carry rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Subject => "subject",
            Field::Message => "message",
        }
    }

    /// Field posted under `key`, if it is one of the visible inputs
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "name" => Some(Field::Name),
            "email" => Some(Field::Email),
            "subject" => Some(Field::Subject),
            "message" => Some(Field::Message),
            _ => None,
        }
    }

    /// Raw value for this field; absent reads as empty text
    pub fn value_of<'a>(&self, raw: &'a RawSubmission) -> &'a str {
        let value = match self {
            Field::Name => &raw.name,
            Field::Email => &raw.email,
            Field::Subject => &raw.subject,
            Field::Message => &raw.message,
        };
        value.as_deref().unwrap_or("")
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single constraint on a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// At least this many characters, counted in UTF-16 code units the
    /// way the browser form counts them
    MinChars(usize),
    /// Looks like an email address
    EmailShape,
}

impl Check {
    pub fn passes(&self, value: &str) -> bool {
        match self {
            Check::MinChars(min) => value.encode_utf16().count() >= *min,
            Check::EmailShape => is_valid_email(value),
        }
    }
}

/// A field, its check, and the message reported on failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub field: Field,
    pub check: Check,
    pub message: &'static str,
}

impl FieldRule {
    pub const fn new(field: Field, check: Check, message: &'static str) -> Self {
        Self {
            field,
            check,
            message,
        }
    }

    pub fn to_error(&self) -> ValidationError {
        ValidationError::new(self.field.as_str(), self.message)
    }
}

pub const NAME_MIN_CHARS: usize = 2;
pub const SUBJECT_MIN_CHARS: usize = 5;
pub const MESSAGE_MIN_CHARS: usize = 10;

/// The contact form's rules, in evaluation order
pub fn default_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::new(
            Field::Name,
            Check::MinChars(NAME_MIN_CHARS),
            "Name must be at least 2 characters.",
        ),
        FieldRule::new(
            Field::Email,
            Check::EmailShape,
            "Please enter a valid email address.",
        ),
        FieldRule::new(
            Field::Subject,
            Check::MinChars(SUBJECT_MIN_CHARS),
            "Subject must be at least 5 characters.",
        ),
        FieldRule::new(
            Field::Message,
            Check::MinChars(MESSAGE_MIN_CHARS),
            "Message must be at least 10 characters.",
        ),
    ]
}
