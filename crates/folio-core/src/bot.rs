//! Honeypot bot detection
//!
//! The contact form renders a hidden input that people never see and
//! automated form-fillers happily complete. Any non-empty value marks the
//! submission as automated.

use serde::{Deserialize, Serialize};

use crate::types::ContactSubmission;
use crate::validator::Field;
use crate::{Error, Result};

/// Form key of the hidden honeypot input
pub const DEFAULT_HONEYPOT_FIELD: &str = "address";

/// Classification of a validated submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotVerdict {
    Human,
    Automated,
}

/// Checks the honeypot input of validated submissions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoneypotDetector {
    field: String,
}

impl Default for HoneypotDetector {
    fn default() -> Self {
        Self {
            field: DEFAULT_HONEYPOT_FIELD.to_string(),
        }
    }
}

impl HoneypotDetector {
    /// Detector reading the honeypot from `field`.
    ///
    /// The key must not be blank or one of the visible form fields; a
    /// visible field would never reach the honeypot slot.
    pub fn new(field: impl Into<String>) -> Result<Self> {
        let field = field.into();
        check_field_name(&field)?;
        Ok(Self { field })
    }

    /// Form key the honeypot is posted under
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Absent or empty honeypot means a human; anything else, whitespace
    /// included, means automation.
    pub fn inspect(&self, submission: &ContactSubmission) -> BotVerdict {
        match submission.honeypot.as_deref() {
            Some(value) if !value.is_empty() => BotVerdict::Automated,
            _ => BotVerdict::Human,
        }
    }
}

/// Reject honeypot keys that are blank or shadowed by a visible field
fn check_field_name(field: &str) -> Result<()> {
    if field.trim().is_empty() {
        return Err(Error::configuration("honeypot field name must not be empty"));
    }
    if Field::from_key(field).is_some() {
        return Err(Error::configuration(format!(
            "honeypot field '{}' collides with a visible form field",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(honeypot: Option<&str>) -> ContactSubmission {
        ContactSubmission {
            name: "Al".to_string(),
            email: "a@b.com".to_string(),
            subject: "Hello there".to_string(),
            message: "This is a test message.".to_string(),
            honeypot: honeypot.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_or_missing_honeypot_is_human() {
        let detector = HoneypotDetector::default();
        assert_eq!(detector.inspect(&submission(None)), BotVerdict::Human);
        assert_eq!(detector.inspect(&submission(Some(""))), BotVerdict::Human);
    }

    #[test]
    fn test_filled_honeypot_is_automated() {
        let detector = HoneypotDetector::default();
        assert_eq!(
            detector.inspect(&submission(Some("http://spam.example"))),
            BotVerdict::Automated
        );
        assert_eq!(detector.inspect(&submission(Some(" "))), BotVerdict::Automated);
    }

    #[test]
    fn test_field_name() {
        assert_eq!(HoneypotDetector::default().field(), "address");
        assert_eq!(HoneypotDetector::new("website").unwrap().field(), "website");
    }

    #[test]
    fn test_visible_field_names_are_refused() {
        for field in ["name", "email", "subject", "message"] {
            let err = HoneypotDetector::new(field).unwrap_err();
            assert!(err.to_string().contains(field));
        }
        assert!(HoneypotDetector::new("  ").is_err());
    }
}
