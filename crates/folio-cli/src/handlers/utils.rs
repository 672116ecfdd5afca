//! Shared utilities for command handlers

use crate::cli::FieldArgs;
use crate::config::{Config, SinkKind};
use crate::error::{Error, Result};
use folio_core::sink::{JsonLinesSink, MemorySink, SanitySink};
use folio_core::{PersistenceSink, RawSubmission, SubmissionHandler};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Assemble the raw submission from `--file` and the field flags.
///
/// Flags win over file values. The honeypot key in a file follows the
/// configured field name.
pub fn load_raw_submission(fields: &FieldArgs, honeypot_key: &str) -> Result<RawSubmission> {
    let any_flag = fields.name.is_some()
        || fields.email.is_some()
        || fields.subject.is_some()
        || fields.message.is_some()
        || fields.honeypot.is_some();
    if fields.file.is_none() && !any_flag {
        return Err(Error::invalid_args(
            "no submission given; pass --file or at least one of --name, --email, --subject, --message",
        ));
    }

    let mut raw = match &fields.file {
        Some(path) => read_submission_file(path, honeypot_key)?,
        None => RawSubmission::new(),
    };

    if let Some(name) = &fields.name {
        raw.name = Some(name.clone());
    }
    if let Some(email) = &fields.email {
        raw.email = Some(email.clone());
    }
    if let Some(subject) = &fields.subject {
        raw.subject = Some(subject.clone());
    }
    if let Some(message) = &fields.message {
        raw.message = Some(message.clone());
    }
    if let Some(honeypot) = &fields.honeypot {
        raw.honeypot = Some(honeypot.clone());
    }

    Ok(raw)
}

fn read_submission_file(path: &Path, honeypot_key: &str) -> Result<RawSubmission> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = content.len(), "read submission file");

    let is_yaml = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false);

    let value: serde_json::Value = if is_yaml {
        serde_yaml::from_str(&content).map_err(|_| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "YAML".to_string(),
        })?
    } else {
        serde_json::from_str(&content).map_err(|_| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "JSON".to_string(),
        })?
    };

    RawSubmission::from_json_with_honeypot(&value, honeypot_key).map_err(|e| match e {
        folio_core::Error::Validation(err) => Error::Rejected(err.message),
        other => Error::Core(other),
    })
}

/// Build the sink selected by `kind` from the configuration
pub fn build_sink(config: &Config, kind: SinkKind) -> Result<Arc<dyn PersistenceSink>> {
    let sink: Arc<dyn PersistenceSink> = match kind {
        SinkKind::Sanity => {
            let sink = SanitySink::new(config.sanity.clone())?;
            debug!(endpoint = %sink.endpoint(), "using Sanity sink");
            Arc::new(sink)
        }
        SinkKind::Jsonl => {
            debug!(path = %config.sink.jsonl_path.display(), "using JSON Lines sink");
            Arc::new(JsonLinesSink::new(config.sink.jsonl_path.clone()))
        }
        SinkKind::Memory => Arc::new(MemorySink::new()),
    };
    Ok(sink)
}

/// Submission handler over `sink` with the configured honeypot field
pub fn build_handler(
    config: &Config,
    sink: Arc<dyn PersistenceSink>,
) -> Result<SubmissionHandler<dyn PersistenceSink>> {
    Ok(SubmissionHandler::new(sink).with_detector(config.honeypot_detector()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_file_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("submission.json");
        fs::write(
            &path,
            r#"{"name": "Alice", "email": "alice@example.com", "subject": "Hi", "website": "x"}"#,
        )
        .unwrap();

        let fields = FieldArgs {
            file: Some(path),
            subject: Some("Hello there".to_string()),
            ..Default::default()
        };
        let raw = load_raw_submission(&fields, "website").unwrap();

        assert_eq!(raw.name.as_deref(), Some("Alice"));
        assert_eq!(raw.subject.as_deref(), Some("Hello there"));
        assert_eq!(raw.message, None);
        assert_eq!(raw.honeypot.as_deref(), Some("x"));
    }

    #[test]
    fn test_non_text_file_values_fail_in_rule_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("submission.json");
        fs::write(&path, r#"{"name": "A", "subject": ["x"]}"#).unwrap();

        let fields = FieldArgs {
            file: Some(path),
            ..Default::default()
        };
        let raw = load_raw_submission(&fields, "address").unwrap();
        assert!(raw.is_non_text("subject"));
        assert_eq!(
            folio_core::validate(&raw).unwrap_err().message,
            "Name must be at least 2 characters."
        );
    }

    #[test]
    fn test_empty_input_is_an_argument_error() {
        let err = load_raw_submission(&FieldArgs::default(), "address").unwrap_err();
        assert!(err.should_show_help());
    }

    #[test]
    fn test_yaml_submission_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("submission.yaml");
        fs::write(&path, "name: Al\nemail: a@b.com\naddress: ''\n").unwrap();

        let fields = FieldArgs {
            file: Some(path),
            ..Default::default()
        };
        let raw = load_raw_submission(&fields, "address").unwrap();
        assert_eq!(raw.email.as_deref(), Some("a@b.com"));
        assert_eq!(raw.honeypot.as_deref(), Some(""));
    }

    #[test]
    fn test_bad_submission_files() {
        let dir = TempDir::new().unwrap();

        let missing = FieldArgs {
            file: Some(dir.path().join("missing.json")),
            ..Default::default()
        };
        assert!(matches!(
            load_raw_submission(&missing, "address"),
            Err(Error::FileNotFound { .. })
        ));

        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();
        let broken = FieldArgs {
            file: Some(path),
            ..Default::default()
        };
        assert!(matches!(
            load_raw_submission(&broken, "address"),
            Err(Error::InvalidFormat { .. })
        ));

        let path = dir.path().join("list.json");
        fs::write(&path, r#"["Al"]"#).unwrap();
        let not_object = FieldArgs {
            file: Some(path),
            ..Default::default()
        };
        match load_raw_submission(&not_object, "address") {
            Err(Error::Rejected(message)) => assert!(message.contains("JSON object")),
            other => panic!("expected rejection, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_build_sink_requires_sanity_credentials() {
        let config = ConfigBuilder::new().sink(SinkKind::Sanity).build();
        assert!(build_sink(&config, SinkKind::Sanity).is_err());

        let sink = build_sink(&config, SinkKind::Memory).unwrap();
        assert_eq!(sink.name(), "memory");
    }

    #[test]
    fn test_handler_uses_configured_honeypot() {
        let config = ConfigBuilder::new().honeypot_field("website").build();
        let handler = build_handler(&config, Arc::new(MemorySink::new())).unwrap();
        assert_eq!(handler.detector().field(), "website");

        let config = ConfigBuilder::new().honeypot_field("message").build();
        let err = build_handler(&config, Arc::new(MemorySink::new())).unwrap_err();
        assert_eq!(err.exit_code(), 5);
    }
}
