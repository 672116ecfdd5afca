//! Core data types for the contact-form pipeline
//!
//! A submission moves through three shapes:
//! - [`RawSubmission`]: whatever the form post carried, every field optional
//! - [`ContactSubmission`]: the validated, normalized record
//! - [`ContactDocument`]: what a persistence sink stores
//!
//! The caller only ever sees a [`SubmissionResult`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::bot::DEFAULT_HONEYPOT_FIELD;
use crate::validator::{Field, ValidationError};
use crate::Result;

/// Document type tag written with every persisted submission
pub const CONTACT_DOCUMENT_TYPE: &str = "contact";

// ============================================================================
// Raw input
// ============================================================================

/// Raw form fields exactly as received; any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Hidden honeypot input, posted as `address`
    #[serde(default, rename = "address")]
    pub honeypot: Option<String>,
    /// Form keys whose posted value was a list or object. The validator
    /// reports them in rule order.
    #[serde(skip)]
    pub non_text_fields: Vec<String>,
}

impl RawSubmission {
    /// Create an empty submission (every field absent)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_honeypot(mut self, value: impl Into<String>) -> Self {
        self.honeypot = Some(value.into());
        self
    }

    /// Whether `key` was posted with a value that is not text
    pub fn is_non_text(&self, key: &str) -> bool {
        self.non_text_fields.iter().any(|k| k == key)
    }

    /// Build from form key/value pairs using the default honeypot key.
    ///
    /// The first occurrence of a key wins; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self::from_pairs_with_honeypot(pairs, DEFAULT_HONEYPOT_FIELD)
    }

    /// Build from form key/value pairs, reading the honeypot from `honeypot_key`
    pub fn from_pairs_with_honeypot<I, K, V>(pairs: I, honeypot_key: &str) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut raw = Self::default();
        for (key, value) in pairs {
            let key = key.as_ref();
            let slot = match key {
                "name" => &mut raw.name,
                "email" => &mut raw.email,
                "subject" => &mut raw.subject,
                "message" => &mut raw.message,
                k if k == honeypot_key => &mut raw.honeypot,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        raw
    }

    /// Build from a JSON object using the default honeypot key.
    ///
    /// Strings are taken as-is, `null` counts as absent, and numbers or
    /// booleans are coerced to their text form the way a form post would.
    /// Arrays and nested objects are not text; they are recorded in
    /// `non_text_fields` and fail validation in their rule's turn.
    pub fn from_json(value: &Value) -> Result<Self> {
        Self::from_json_with_honeypot(value, DEFAULT_HONEYPOT_FIELD)
    }

    pub fn from_json_with_honeypot(value: &Value, honeypot_key: &str) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            ValidationError::new("form", "Form data must be a JSON object.")
        })?;

        let mut pairs = Vec::with_capacity(object.len());
        let mut non_text = Vec::new();
        for (key, field) in object {
            let text = match field {
                Value::Null => continue,
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    if Field::from_key(key).is_some() || key == honeypot_key {
                        non_text.push(key.clone());
                    }
                    continue;
                }
            };
            pairs.push((key.as_str(), text));
        }

        let mut raw = Self::from_pairs_with_honeypot(pairs, honeypot_key);
        raw.non_text_fields = non_text;
        Ok(raw)
    }
}

// ============================================================================
// Validated record and persisted document
// ============================================================================

/// A submission that passed every validation rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub honeypot: Option<String>,
}

/// Review status of a stored submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    /// Not yet looked at by the site owner
    New,
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionStatus::New => write!(f, "new"),
        }
    }
}

/// The document handed to a persistence sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDocument {
    #[serde(rename = "_type")]
    pub doc_type: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(rename = "submittedAt", with = "iso_millis")]
    pub submitted_at: DateTime<Utc>,
    pub status: SubmissionStatus,
}

impl ContactDocument {
    /// Stamp a validated submission; the honeypot never reaches storage.
    pub fn from_submission(submission: &ContactSubmission, submitted_at: DateTime<Utc>) -> Self {
        Self {
            doc_type: CONTACT_DOCUMENT_TYPE.to_string(),
            name: submission.name.clone(),
            email: submission.email.clone(),
            subject: submission.subject.clone(),
            message: submission.message.clone(),
            submitted_at,
            status: SubmissionStatus::New,
        }
    }
}

/// `2025-01-31T12:00:00.000Z` style timestamps
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Results and states
// ============================================================================

/// Caller-visible result: `{"success":true}` or `{"success":false,"error":"..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmissionResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Lifecycle of a single submission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionState {
    Received,
    Validating,
    Rejected,
    Validated,
    BotDiscarded,
    Persisting,
    Persisted,
    PersistFailed,
}

impl SubmissionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionState::Rejected
                | SubmissionState::BotDiscarded
                | SubmissionState::Persisted
                | SubmissionState::PersistFailed
        )
    }

    /// Whether `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: SubmissionState) -> bool {
        use SubmissionState::*;
        matches!(
            (self, next),
            (Received, Validating)
                | (Validating, Rejected)
                | (Validating, Validated)
                | (Validated, BotDiscarded)
                | (Validated, Persisting)
                | (Persisting, Persisted)
                | (Persisting, PersistFailed)
        )
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SubmissionState::Received => "received",
            SubmissionState::Validating => "validating",
            SubmissionState::Rejected => "rejected",
            SubmissionState::Validated => "validated",
            SubmissionState::BotDiscarded => "bot_discarded",
            SubmissionState::Persisting => "persisting",
            SubmissionState::Persisted => "persisted",
            SubmissionState::PersistFailed => "persist_failed",
        };
        write!(f, "{}", label)
    }
}

/// Terminal outcome of a submission, for operators and logs.
///
/// Never serialized into an HTTP response: a bot discard must look exactly
/// like a persisted submission from the outside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Rejected(ValidationError),
    BotDiscarded,
    Persisted,
    PersistFailed,
}

impl SubmissionOutcome {
    pub fn state(&self) -> SubmissionState {
        match self {
            SubmissionOutcome::Rejected(_) => SubmissionState::Rejected,
            SubmissionOutcome::BotDiscarded => SubmissionState::BotDiscarded,
            SubmissionOutcome::Persisted => SubmissionState::Persisted,
            SubmissionOutcome::PersistFailed => SubmissionState::PersistFailed,
        }
    }
}

impl fmt::Display for SubmissionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.state())
    }
}
