//! Shared test support utilities for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use folio_core::{ContactDocument, PersistenceSink, RawSubmission, SinkError};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// The canonical valid submission used across the suite
pub fn valid_submission() -> RawSubmission {
    RawSubmission::new()
        .with_name("Al")
        .with_email("a@b.com")
        .with_subject("Hello there")
        .with_message("This is a test message.")
        .with_honeypot("")
}

/// Same submission with the honeypot filled in
pub fn bot_submission() -> RawSubmission {
    valid_submission().with_honeypot("http://spam.example")
}

/// Sink double that records every call and can be told to fail
#[derive(Default)]
pub struct RecordingSink {
    calls: AtomicUsize,
    documents: Mutex<Vec<ContactDocument>>,
    failure: Option<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(detail: &str) -> Self {
        Self {
            failure: Some(detail.to_string()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn documents(&self) -> Vec<ContactDocument> {
        self.documents.lock().await.clone()
    }
}

#[async_trait]
impl PersistenceSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn persist(&self, document: &ContactDocument) -> Result<(), SinkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(detail) = &self.failure {
            return Err(SinkError::Rejected {
                status: 500,
                message: detail.clone(),
            });
        }
        self.documents.lock().await.push(document.clone());
        Ok(())
    }
}
