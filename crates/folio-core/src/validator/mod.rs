//! Form validation for contact submissions
//!
//! Validation is a fixed, ordered table of field rules. The first failing
//! rule decides the outcome and its message is the only thing reported; a
//! failed validation never yields a partial record.
//!
//! The honeypot field is carried through untouched. It is never a reason to
//! reject a submission; that decision belongs to the bot detector.

pub mod email;
pub mod rules;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ContactSubmission, RawSubmission};
pub use email::is_valid_email;
pub use rules::{default_rules, Check, Field, FieldRule};

/// The first rule a submission failed
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ValidationError {
    /// Field the failing rule belongs to
    pub field: String,
    /// Human-readable reason, safe to show the submitter
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// A field whose posted value was a list or object instead of text
    pub fn not_text(key: &str) -> Self {
        let field = Field::from_key(key).map_or("form", |f| f.as_str());
        Self::new(field, format!("Field '{}' must be text.", key))
    }
}

/// Ordered rule set applied to raw submissions
#[derive(Debug, Clone)]
pub struct FormValidator {
    rules: Vec<FieldRule>,
}

impl Default for FormValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl FormValidator {
    /// Validator with the contact form's rules
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// Validator with a caller-supplied rule table, checked in order
    pub fn with_rules(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Validate a raw submission, returning the normalized record or the
    /// first failing rule.
    pub fn validate(&self, raw: &RawSubmission) -> Result<ContactSubmission, ValidationError> {
        for rule in &self.rules {
            let key = rule.field.as_str();
            if raw.is_non_text(key) {
                return Err(ValidationError::not_text(key));
            }
            if !rule.check.passes(rule.field.value_of(raw)) {
                return Err(rule.to_error());
            }
        }
        // fields without a rule (the honeypot) report after every rule
        if let Some(key) = raw.non_text_fields.first() {
            return Err(ValidationError::not_text(key));
        }

        Ok(ContactSubmission {
            name: raw.name.clone().unwrap_or_default(),
            email: raw.email.clone().unwrap_or_default(),
            subject: raw.subject.clone().unwrap_or_default(),
            message: raw.message.clone().unwrap_or_default(),
            honeypot: raw.honeypot.clone(),
        })
    }
}

/// Validate with the default contact-form rules
pub fn validate(raw: &RawSubmission) -> Result<ContactSubmission, ValidationError> {
    FormValidator::new().validate(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RawSubmission {
        RawSubmission::new()
            .with_name("Al")
            .with_email("a@b.com")
            .with_subject("Hello there")
            .with_message("This is a test message.")
            .with_honeypot("")
    }

    #[test]
    fn test_valid_submission_normalizes() {
        let record = validate(&valid()).unwrap();
        assert_eq!(record.name, "Al");
        assert_eq!(record.email, "a@b.com");
        assert_eq!(record.subject, "Hello there");
        assert_eq!(record.message, "This is a test message.");
        assert_eq!(record.honeypot.as_deref(), Some(""));
    }

    #[test]
    fn test_short_name_rejected() {
        let err = validate(&valid().with_name("A")).unwrap_err();
        assert_eq!(err.field, "name");
        assert_eq!(err.message, "Name must be at least 2 characters.");
    }

    #[test]
    fn test_first_failure_wins() {
        let raw = RawSubmission::new()
            .with_name("A")
            .with_email("nope")
            .with_subject("Hi")
            .with_message("short");
        assert_eq!(validate(&raw).unwrap_err().field, "name");

        let mut raw = raw.with_name("Alice");
        assert_eq!(validate(&raw).unwrap_err().field, "email");

        raw.email = Some("alice@example.com".to_string());
        assert_eq!(
            validate(&raw).unwrap_err().message,
            "Subject must be at least 5 characters."
        );

        raw.subject = Some("Hello".to_string());
        assert_eq!(
            validate(&raw).unwrap_err().message,
            "Message must be at least 10 characters."
        );
    }

    #[test]
    fn test_missing_fields_fail_their_rule() {
        let err = validate(&RawSubmission::new()).unwrap_err();
        assert_eq!(err.message, "Name must be at least 2 characters.");

        let err = validate(&RawSubmission::new().with_name("Al")).unwrap_err();
        assert_eq!(err.message, "Please enter a valid email address.");
    }

    #[test]
    fn test_honeypot_never_fails_validation() {
        let mut raw = valid();
        raw.honeypot = None;
        assert!(validate(&raw).is_ok());

        let raw = valid().with_honeypot("http://spam.example");
        assert!(validate(&raw).is_ok());
    }

    #[test]
    fn test_lengths_count_utf16_units_not_bytes() {
        // two characters, three bytes
        assert!(validate(&valid().with_name("Zé")).is_ok());
        assert!(validate(&valid().with_name("é")).is_err());
        assert!(validate(&valid().with_name("李雷")).is_ok());
        // outside the BMP a single character is two units
        assert!(validate(&valid().with_name("😀")).is_ok());
    }

    #[test]
    fn test_non_text_fields_report_in_rule_order() {
        let raw = RawSubmission::from_json(&serde_json::json!({
            "name": ["a"],
            "email": ["b"]
        }))
        .unwrap();
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.field, "name");
        assert_eq!(err.message, "Field 'name' must be text.");

        let raw = RawSubmission::from_json(&serde_json::json!({
            "name": "A",
            "email": "a@b.com",
            "subject": ["x"],
            "message": "This is a test message."
        }))
        .unwrap();
        assert_eq!(
            validate(&raw).unwrap_err().message,
            "Name must be at least 2 characters."
        );

        let raw = RawSubmission::from_json(&serde_json::json!({
            "name": "Al",
            "email": "a@b.com",
            "subject": {"text": "Hello there"},
            "message": "short"
        }))
        .unwrap();
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.field, "subject");
        assert_eq!(err.message, "Field 'subject' must be text.");
    }

    #[test]
    fn test_non_text_honeypot_reports_after_rules() {
        let raw = RawSubmission::from_json(&serde_json::json!({
            "name": "A",
            "address": ["x"]
        }))
        .unwrap();
        assert_eq!(validate(&raw).unwrap_err().field, "name");

        let mut raw = valid();
        raw.honeypot = None;
        raw.non_text_fields.push("address".to_string());
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.field, "form");
        assert_eq!(err.message, "Field 'address' must be text.");
    }

    #[test]
    fn test_whitespace_is_not_trimmed() {
        let record = validate(&valid().with_name("  ")).unwrap();
        assert_eq!(record.name, "  ");
    }

    #[test]
    fn test_custom_rule_table() {
        let validator = FormValidator::with_rules(vec![FieldRule::new(
            Field::Message,
            Check::MinChars(3),
            "Say a little more.",
        )]);
        let raw = RawSubmission::new().with_message("hi");
        assert_eq!(validator.validate(&raw).unwrap_err().message, "Say a little more.");
    }
}
