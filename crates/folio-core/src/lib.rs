//! Folio Core - contact-form submission pipeline for the Folio portfolio site
//!
//! This crate turns a raw contact-form post into exactly one of three outcomes:
//! accepted and persisted, silently discarded (honeypot tripped), or rejected
//! with a human-readable reason.
//!
//! # Main Components
//!
//! - **Form Validator**: ordered field rules, first failure wins
//! - **Bot Detector**: honeypot check on the hidden `address` field
//! - **Submission Handler**: validation → bot detection → persistence → result
//! - **Persistence Sinks**: Sanity mutation API, JSON-lines file, in-memory
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use folio_core::{RawSubmission, SubmissionHandler};
//! use folio_core::sink::MemorySink;
//!
//! # async fn example() {
//! let sink = Arc::new(MemorySink::new());
//! let handler = SubmissionHandler::new(sink.clone());
//!
//! let raw = RawSubmission::new()
//!     .with_name("Al")
//!     .with_email("a@b.com")
//!     .with_subject("Hello there")
//!     .with_message("This is a test message.");
//!
//! let result = handler.submit(raw).await.into_result();
//! assert!(result.success);
//! # }
//! ```

pub mod bot;
pub mod clock;
pub mod error;
pub mod handler;
pub mod sink;
pub mod types;
pub mod validator;

pub use bot::{BotVerdict, HoneypotDetector, DEFAULT_HONEYPOT_FIELD};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Error, Result};
pub use handler::{SubmissionHandler, SubmissionReport, PERSISTENCE_FAILURE_MESSAGE};
pub use sink::{PersistenceSink, SinkError};
pub use types::{
    ContactDocument, ContactSubmission, RawSubmission, SubmissionOutcome, SubmissionResult,
    SubmissionState, SubmissionStatus, CONTACT_DOCUMENT_TYPE,
};
pub use validator::{validate, FormValidator, ValidationError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
