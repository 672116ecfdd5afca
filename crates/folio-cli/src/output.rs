//! Output formatting and writing utilities
//!
//! Results are written to stdout in the selected format (human, JSON, YAML).
//! Machine formats carry exactly the submission result a browser would get;
//! the terminal outcome is only spelled out in human mode.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::redaction;
use colored::Colorize;
use folio_core::validator::ValidationError;
use folio_core::{ContactDocument, SubmissionOutcome, SubmissionReport};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;
use tracing::trace;

/// Result of `folio validate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationReport {
    pub fn valid() -> Self {
        Self {
            valid: true,
            field: None,
            error: None,
        }
    }

    pub fn invalid(error: &ValidationError) -> Self {
        Self {
            valid: false,
            field: Some(error.field.clone()),
            error: Some(error.message.clone()),
        }
    }
}

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a pipeline report
    fn format_submission_report(&self, report: &SubmissionReport) -> Result<String>;

    /// Format a validator verdict
    fn format_validation_report(&self, report: &ValidationReport) -> Result<String>;

    /// Format a document as it would be stored
    fn format_document(&self, document: &ContactDocument) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty | OutputFormat::Human => {
                Ok(serde_json::to_string_pretty(value)?)
            }
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }

    fn format_submission_report(&self, report: &SubmissionReport) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_submission_report_human(report)),
            _ => self.format(&report.result),
        }
    }

    fn format_validation_report(&self, report: &ValidationReport) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_validation_report_human(report)),
            _ => self.format(report),
        }
    }

    fn format_document(&self, document: &ContactDocument) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_document_human(document)),
            _ => self.format(document),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, progress: bool) -> Self {
        Self {
            format,
            use_color,
            show_progress: progress && !quiet && io::stdout().is_terminal(),
            quiet,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    #[allow(dead_code)]
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            show_progress: false,
            quiet,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message (human format only)
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message (human format only)
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message (human format only)
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let mut value_json = serde_json::to_value(value)?;
        redaction::redact_json_value(&mut value_json);
        trace!(data = %value_json, "Outputting data");

        let formatted = self.format.format(&value_json)?;
        self.write_formatted(&formatted)
    }

    /// Write a pipeline report
    pub fn submission_report(&mut self, report: &SubmissionReport) -> Result<()> {
        let formatted = self.format.format_submission_report(report)?;
        self.write_formatted(&formatted)
    }

    /// Write a validator verdict
    pub fn validation_report(&mut self, report: &ValidationReport) -> Result<()> {
        let formatted = self.format.format_validation_report(report)?;
        self.write_formatted(&formatted)
    }

    /// Write a document as it would be stored
    pub fn document(&mut self, document: &ContactDocument) -> Result<()> {
        let formatted = self.format.format_document(document)?;
        self.write_formatted(&formatted)
    }

    fn write_formatted(&mut self, formatted: &str) -> Result<()> {
        if formatted.ends_with('\n') {
            self.write(formatted)
        } else {
            self.writeln(formatted)
        }
    }

    /// Create a spinner for indeterminate progress
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.show_progress || self.format != OutputFormat::Human {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(default_spinner_style());
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

/// Helper function to create a spinner style
pub fn default_spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Format a pipeline report for human reading
fn format_submission_report_human(report: &SubmissionReport) -> String {
    let mut output = String::new();

    if report.result.success {
        output.push_str("✅ Submission accepted\n");
    } else {
        output.push_str("❌ Submission not accepted\n");
    }
    output.push_str(&format!("  Outcome: {}\n", report.outcome));

    if let SubmissionOutcome::Rejected(err) = &report.outcome {
        output.push_str(&format!("  📍 Field: {}\n", err.field));
    }
    if let Some(error) = &report.result.error {
        output.push_str(&format!("  💬 Message: {}\n", error));
    }
    if report.outcome == SubmissionOutcome::BotDiscarded {
        output.push_str("  🍯 Honeypot was filled in; nothing was stored\n");
    }

    output
}

/// Format a validator verdict for human reading
fn format_validation_report_human(report: &ValidationReport) -> String {
    if report.valid {
        return "✅ valid\n".to_string();
    }

    let mut output = String::from("❌ Validation failed\n");
    if let Some(field) = &report.field {
        output.push_str(&format!("  📍 Field: {}\n", field));
    }
    if let Some(error) = &report.error {
        output.push_str(&format!("  💬 Message: {}\n", error));
    }
    output
}

/// Format a document for human reading
fn format_document_human(document: &ContactDocument) -> String {
    let mut output = String::new();
    output.push_str(&format!("  Type: {}\n", document.doc_type));
    output.push_str(&format!("  Name: {}\n", document.name));
    output.push_str(&format!("  Email: {}\n", document.email));
    output.push_str(&format!("  Subject: {}\n", document.subject));
    output.push_str(&format!("  Message: {}\n", document.message));
    output.push_str(&format!(
        "  Submitted: {}\n",
        document.submitted_at.format("%Y-%m-%dT%H:%M:%S%.3fZ")
    ));
    output.push_str(&format!("  Status: {}\n", document.status));
    output
}
