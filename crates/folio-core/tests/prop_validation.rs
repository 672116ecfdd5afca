//! Property-based tests for form validation ordering
//!
//! These tests verify that the first failing rule decides the reported
//! message and that the honeypot never influences validation.

use folio_core::{validate, RawSubmission};
use proptest::prelude::*;

// Strategy functions for property testing

/// Names of at least two characters
fn valid_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z .'-]{1,40}"
}

fn valid_email() -> impl Strategy<Value = String> {
    ("[a-z0-9]{1,12}", "[a-z0-9]{1,12}", "[a-z]{2,6}")
        .prop_map(|(local, domain, tld)| format!("{}@{}.{}", local, domain, tld))
}

fn valid_subject() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ,.!?]{5,80}"
}

fn valid_message() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ,.!?\n]{10,400}"
}

/// Strings that cannot be email addresses (no `@`)
fn invalid_email() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 .]{0,30}"
}

fn honeypot() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[ -~]{0,40}")
}

fn submission(
    name: String,
    email: String,
    subject: String,
    message: String,
    honeypot: Option<String>,
) -> RawSubmission {
    RawSubmission {
        name: Some(name),
        email: Some(email),
        subject: Some(subject),
        message: Some(message),
        honeypot,
        ..Default::default()
    }
}

proptest! {
    #[test]
    fn short_name_always_reports_name(
        name in "[A-Za-z]{0,1}",
        email in invalid_email(),
        subject in "[a-z]{0,4}",
        message in "[a-z]{0,9}",
        hp in honeypot(),
    ) {
        let err = validate(&submission(name, email, subject, message, hp)).unwrap_err();
        prop_assert_eq!(err.field.as_str(), "name");
        prop_assert!(err.message.to_lowercase().contains("name"));
    }

    #[test]
    fn bad_email_reported_once_name_passes(
        name in valid_name(),
        email in invalid_email(),
        subject in "[a-z]{0,4}",
        hp in honeypot(),
    ) {
        let err = validate(&submission(name, email, subject, String::new(), hp)).unwrap_err();
        prop_assert_eq!(err.field.as_str(), "email");
        prop_assert!(err.message.contains("email"));
    }

    #[test]
    fn short_subject_reported_after_name_and_email(
        name in valid_name(),
        email in valid_email(),
        subject in "[A-Za-z ]{0,4}",
        message in "[a-z]{0,9}",
    ) {
        let err = validate(&submission(name, email, subject, message, None)).unwrap_err();
        prop_assert_eq!(err.field.as_str(), "subject");
        prop_assert_eq!(err.message, "Subject must be at least 5 characters.");
    }

    #[test]
    fn short_message_reported_last(
        name in valid_name(),
        email in valid_email(),
        subject in valid_subject(),
        message in "[A-Za-z ]{0,9}",
    ) {
        let err = validate(&submission(name, email, subject, message, None)).unwrap_err();
        prop_assert_eq!(err.field.as_str(), "message");
        prop_assert_eq!(err.message, "Message must be at least 10 characters.");
    }

    #[test]
    fn valid_fields_pass_regardless_of_honeypot(
        name in valid_name(),
        email in valid_email(),
        subject in valid_subject(),
        message in valid_message(),
        hp in honeypot(),
    ) {
        let raw = submission(name.clone(), email.clone(), subject, message, hp.clone());
        let record = validate(&raw).unwrap();
        prop_assert_eq!(record.name, name);
        prop_assert_eq!(record.email, email);
        prop_assert_eq!(record.honeypot, hp);
    }
}
