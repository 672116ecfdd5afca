// Tests for submission and validation output formatting

use super::*;
use folio_core::{ContactSubmission, SubmissionResult, PERSISTENCE_FAILURE_MESSAGE};
use std::cell::RefCell;
use std::rc::Rc;

fn fixed_document() -> ContactDocument {
    let submission = ContactSubmission {
        name: "Al".to_string(),
        email: "a@b.com".to_string(),
        subject: "Hello there".to_string(),
        message: "This is a test message.".to_string(),
        honeypot: None,
    };
    let at = "2025-03-14T09:26:53.000Z".parse().unwrap();
    ContactDocument::from_submission(&submission, at)
}

/// Cloneable in-memory sink for an `OutputWriter`
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn writer(format: OutputFormat) -> (OutputWriter, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let writer = OutputWriter::with_writer(format, false, false, Box::new(buffer.clone()));
    (writer, buffer)
}

fn report(outcome: SubmissionOutcome, result: SubmissionResult) -> SubmissionReport {
    SubmissionReport { outcome, result }
}

#[test]
fn test_machine_formats_print_only_the_result() {
    let persisted = report(SubmissionOutcome::Persisted, SubmissionResult::ok());
    let bot = report(SubmissionOutcome::BotDiscarded, SubmissionResult::ok());

    let json = OutputFormat::Json;
    assert_eq!(
        json.format_submission_report(&persisted).unwrap(),
        r#"{"success":true}"#
    );
    assert_eq!(
        json.format_submission_report(&persisted).unwrap(),
        json.format_submission_report(&bot).unwrap()
    );
}

#[test]
fn test_human_report_names_outcome() {
    let bot = report(SubmissionOutcome::BotDiscarded, SubmissionResult::ok());
    let formatted = format_submission_report_human(&bot);
    assert!(formatted.contains("✅ Submission accepted"));
    assert!(formatted.contains("Outcome: bot_discarded"));
    assert!(formatted.contains("nothing was stored"));

    let failed = report(
        SubmissionOutcome::PersistFailed,
        SubmissionResult::failure(PERSISTENCE_FAILURE_MESSAGE),
    );
    let formatted = format_submission_report_human(&failed);
    assert!(formatted.contains("❌ Submission not accepted"));
    assert!(formatted.contains("Outcome: persist_failed"));
    assert!(formatted.contains(PERSISTENCE_FAILURE_MESSAGE));
}

#[test]
fn test_human_report_for_rejection_shows_field() {
    let err = ValidationError::new("email", "Please enter a valid email address.");
    let rejected = report(
        SubmissionOutcome::Rejected(err.clone()),
        SubmissionResult::failure(err.message.clone()),
    );

    let formatted = format_submission_report_human(&rejected);
    assert!(formatted.contains("Outcome: rejected"));
    assert!(formatted.contains("📍 Field: email"));
    assert!(formatted.contains("💬 Message: Please enter a valid email address."));
}

#[test]
fn test_validation_report_formats() {
    let err = ValidationError::new("name", "Name must be at least 2 characters.");
    let invalid = ValidationReport::invalid(&err);

    assert_eq!(
        OutputFormat::Json.format_validation_report(&invalid).unwrap(),
        r#"{"valid":false,"field":"name","error":"Name must be at least 2 characters."}"#
    );
    assert_eq!(
        OutputFormat::Json
            .format_validation_report(&ValidationReport::valid())
            .unwrap(),
        r#"{"valid":true}"#
    );

    let human = format_validation_report_human(&invalid);
    assert!(human.contains("❌ Validation failed"));
    assert!(human.contains("Field: name"));
    assert_eq!(format_validation_report_human(&ValidationReport::valid()), "✅ valid\n");
}

#[test]
fn test_document_formats() {
    let document = fixed_document();

    let human = format_document_human(&document);
    assert!(human.contains("Type: contact"));
    assert!(human.contains("Submitted: 2025-03-14T09:26:53.000Z"));
    assert!(human.contains("Status: new"));

    let yaml = OutputFormat::Yaml.format_document(&document).unwrap();
    assert!(yaml.contains("_type: contact"));
    assert!(yaml.contains("submittedAt:"));
    assert!(yaml.contains("2025-03-14T09:26:53.000Z"));
}

#[test]
fn test_writer_respects_quiet_and_format() {
    let (mut out, buffer) = writer(OutputFormat::Json);
    out.info("loading").unwrap();
    out.success("done").unwrap();
    out.section("Result").unwrap();
    out.data(&SubmissionResult::ok()).unwrap();
    assert_eq!(buffer.contents(), "{\"success\":true}\n");

    let buffer = SharedBuffer::default();
    let mut quiet = OutputWriter::with_writer(
        OutputFormat::Human,
        false,
        true,
        Box::new(buffer.clone()),
    );
    quiet.info("loading").unwrap();
    quiet.success("done").unwrap();
    assert!(buffer.contents().is_empty());
}

#[test]
fn test_writer_human_plain_prefixes() {
    let (mut out, buffer) = writer(OutputFormat::Human);
    out.info("Using sink memory").unwrap();
    out.warning("dry run").unwrap();
    out.section("Result").unwrap();

    let contents = buffer.contents();
    assert!(contents.contains("INFO: Using sink memory"));
    assert!(contents.contains("WARNING: dry run"));
    assert!(contents.contains("=== Result ==="));
}

#[test]
fn test_spinner_disabled_for_custom_writers() {
    let (out, _) = writer(OutputFormat::Human);
    assert!(out.spinner("Submitting").is_none());
}

#[test]
fn test_data_output_masks_secrets() {
    let (mut out, buffer) = writer(OutputFormat::Json);
    out.data(&serde_json::json!({ "sanity": { "token": "skSecretToken0123456789" } }))
        .unwrap();

    let contents = buffer.contents();
    assert!(contents.contains("\"token\":\"***\""));
    assert!(!contents.contains("skSecretToken0123456789"));
}
