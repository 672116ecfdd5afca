//! Persistence sinks for accepted contact submissions
//!
//! A sink receives one [`ContactDocument`] per accepted submission and
//! reports success or failure, nothing more. Sinks are injected into the
//! [`crate::SubmissionHandler`] so tests and local runs can swap the CMS
//! backend for a file or memory store.
//!
//! Sink errors never cross the handler boundary: the handler logs them and
//! answers the caller with a generic retry-later message.

pub mod jsonl;
pub mod memory;
pub mod sanity;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::ContactDocument;

pub use jsonl::JsonLinesSink;
pub use memory::{FailingSink, MemorySink};
pub use sanity::{SanityConfig, SanitySink, DEFAULT_SANITY_API_VERSION};

/// Failure reported by a persistence sink
#[derive(Debug, Error)]
pub enum SinkError {
    /// The request never got a response (DNS, connect, timeout)
    #[error("transport failure: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The backend answered with a non-success status
    #[error("backend rejected document (status {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The document could not be encoded
    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local storage failure
    #[error("storage I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// The sink is not accepting writes
    #[error("sink unavailable: {0}")]
    Unavailable(String),
}

impl SinkError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// HTTP status attached to the failure, if the backend answered
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SinkError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SinkError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            err.to_string()
        };
        SinkError::Transport {
            message,
            source: Some(anyhow::Error::new(err)),
        }
    }
}

/// Durable storage for accepted submissions
#[async_trait]
pub trait PersistenceSink: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Store one document. Called at most once per submission.
    async fn persist(&self, document: &ContactDocument) -> Result<(), SinkError>;
}
