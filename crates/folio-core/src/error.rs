//! Error types for the Folio core library
//!
//! Errors here describe failures of the library itself (bad configuration,
//! I/O, HTTP client setup). Submission outcomes are not errors: a rejected or
//! discarded submission is reported through [`crate::SubmissionResult`], and
//! sink failures stay behind the [`crate::sink::SinkError`] boundary.

use thiserror::Error;

use crate::validator::ValidationError;

/// Main error type for Folio operations
#[derive(Error, Debug)]
pub enum Error {
    /// Form field validation failed
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration errors (missing credentials, malformed URLs)
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// HTTP client construction errors
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error without an underlying cause
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Whether the error can be fixed by changing the submitted input
    pub fn is_caller_correctable(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}
