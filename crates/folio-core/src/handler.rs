//! Submission handler: validation → bot detection → persistence → result
//!
//! Each call to [`SubmissionHandler::submit`] ends in exactly one terminal
//! state:
//!
//! | terminal state  | sink writes | caller sees                                   |
//! |-----------------|-------------|-----------------------------------------------|
//! | `Rejected`      | 0           | `{success:false, error:<first failing rule>}` |
//! | `BotDiscarded`  | 0           | `{success:true}`                              |
//! | `Persisted`     | 1           | `{success:true}`                              |
//! | `PersistFailed` | 1 attempt   | `{success:false, error:<generic message>}`    |
//!
//! Nothing is retried. Sink error detail is logged and never returned.

use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::bot::{BotVerdict, HoneypotDetector};
use crate::clock::{Clock, SystemClock};
use crate::sink::PersistenceSink;
use crate::types::{
    ContactDocument, RawSubmission, SubmissionOutcome, SubmissionResult, SubmissionState,
};
use crate::validator::FormValidator;

/// Message returned when the sink fails; deliberately says nothing about why
pub const PERSISTENCE_FAILURE_MESSAGE: &str = "Failed to submit the form. Please try again later.";

/// Terminal outcome plus the caller-visible result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReport {
    pub outcome: SubmissionOutcome,
    pub result: SubmissionResult,
}

impl SubmissionReport {
    fn new(outcome: SubmissionOutcome) -> Self {
        let result = match &outcome {
            SubmissionOutcome::Rejected(err) => SubmissionResult::failure(err.message.clone()),
            SubmissionOutcome::BotDiscarded | SubmissionOutcome::Persisted => {
                SubmissionResult::ok()
            }
            SubmissionOutcome::PersistFailed => {
                SubmissionResult::failure(PERSISTENCE_FAILURE_MESSAGE)
            }
        };
        Self { outcome, result }
    }

    pub fn into_result(self) -> SubmissionResult {
        self.result
    }
}

/// Tracks the per-submission state machine
struct Lifecycle {
    state: SubmissionState,
}

impl Lifecycle {
    fn start() -> Self {
        Self {
            state: SubmissionState::Received,
        }
    }

    fn advance(&mut self, next: SubmissionState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        debug!(from = %self.state, to = %next, "submission state change");
        self.state = next;
    }
}

/// Orchestrates one contact-form submission at a time
pub struct SubmissionHandler<S: PersistenceSink + ?Sized> {
    sink: Arc<S>,
    validator: FormValidator,
    detector: HoneypotDetector,
    clock: Arc<dyn Clock>,
}

impl<S: PersistenceSink + ?Sized> std::fmt::Debug for SubmissionHandler<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionHandler")
            .field("validator", &self.validator)
            .field("detector", &self.detector)
            .finish_non_exhaustive()
    }
}

impl<S: PersistenceSink + ?Sized> SubmissionHandler<S> {
    /// Handler with the default rules, honeypot field and system clock
    pub fn new(sink: Arc<S>) -> Self {
        Self {
            sink,
            validator: FormValidator::new(),
            detector: HoneypotDetector::default(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_detector(mut self, detector: HoneypotDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_validator(mut self, validator: FormValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn detector(&self) -> &HoneypotDetector {
        &self.detector
    }

    pub fn sink(&self) -> &Arc<S> {
        &self.sink
    }

    /// Run one submission through the pipeline
    pub async fn submit(&self, raw: RawSubmission) -> SubmissionReport {
        let span = info_span!("contact_submission", sink = self.sink.name());
        async move {
            let outcome = self.run(raw).await;
            SubmissionReport::new(outcome)
        }
        .instrument(span)
        .await
    }

    async fn run(&self, raw: RawSubmission) -> SubmissionOutcome {
        let mut lifecycle = Lifecycle::start();

        lifecycle.advance(SubmissionState::Validating);
        let submission = match self.validator.validate(&raw) {
            Ok(submission) => submission,
            Err(err) => {
                lifecycle.advance(SubmissionState::Rejected);
                info!(field = %err.field, reason = %err.message, "submission rejected");
                return SubmissionOutcome::Rejected(err);
            }
        };
        lifecycle.advance(SubmissionState::Validated);

        if self.detector.inspect(&submission) == BotVerdict::Automated {
            lifecycle.advance(SubmissionState::BotDiscarded);
            info!(
                honeypot_field = self.detector.field(),
                "honeypot filled, discarding submission"
            );
            return SubmissionOutcome::BotDiscarded;
        }

        lifecycle.advance(SubmissionState::Persisting);
        let document = ContactDocument::from_submission(&submission, self.clock.now());

        match self.sink.persist(&document).await {
            Ok(()) => {
                lifecycle.advance(SubmissionState::Persisted);
                info!(submitted_at = %document.submitted_at, "submission persisted");
                SubmissionOutcome::Persisted
            }
            Err(err) => {
                lifecycle.advance(SubmissionState::PersistFailed);
                error!(
                    error = %err,
                    status = ?err.status_code(),
                    "Error submitting contact form"
                );
                if err.status_code().is_some_and(|s| s == 401 || s == 403) {
                    warn!("sink rejected credentials; check the configured write token");
                }
                SubmissionOutcome::PersistFailed
            }
        }
    }
}
