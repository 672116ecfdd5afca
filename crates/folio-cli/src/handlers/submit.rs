//! Submit command handler

use crate::cli::{OutputFormat, SubmitArgs};
use crate::config::{Config, SinkKind};
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use folio_core::sink::MemorySink;
use folio_core::{PersistenceSink, SubmissionOutcome};
use std::sync::Arc;
use tracing::instrument;

use super::utils::{build_handler, build_sink, load_raw_submission};

/// Run one submission through the full pipeline
#[instrument(skip_all, fields(dry_run = args.dry_run))]
pub async fn handle_submit(
    args: SubmitArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let mut config = config.clone();
    if let Some(path) = args.jsonl_path {
        config.sink.jsonl_path = path;
    }

    let kind = if args.dry_run {
        SinkKind::Memory
    } else {
        args.sink.map(SinkKind::from).unwrap_or(config.sink.kind)
    };
    let timer = Timer::with_details("submit", &kind.to_string());

    let raw = load_raw_submission(&args.fields, &config.form.honeypot_field)?;

    let preview = Arc::new(MemorySink::new());
    let sink: Arc<dyn PersistenceSink> = if args.dry_run {
        output.warning("Dry run: nothing leaves this process")?;
        preview.clone() as Arc<dyn PersistenceSink>
    } else {
        build_sink(&config, kind)?
    };
    output.info(&format!("Submitting through the {} sink", sink.name()))?;

    let handler = build_handler(&config, sink)?;
    let spinner = output.spinner("Submitting...");
    let report = handler.submit(raw).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    output.submission_report(&report)?;

    if args.dry_run && output.format() == OutputFormat::Human {
        for document in preview.documents().await {
            output.section("Would store")?;
            output.document(&document)?;
        }
    }
    output.info(&format!("Took {} ms", timer.elapsed().as_millis()))?;

    match report.outcome {
        SubmissionOutcome::Rejected(err) => Err(Error::Rejected(err.message)),
        SubmissionOutcome::PersistFailed => Err(Error::NotStored(format!(
            "the {} sink failed; the sink error is in the log output",
            kind
        ))),
        SubmissionOutcome::Persisted | SubmissionOutcome::BotDiscarded => Ok(()),
    }
}
