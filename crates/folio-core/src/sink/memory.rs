//! In-memory sinks for tests and dry runs

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

use super::{PersistenceSink, SinkError};
use crate::types::ContactDocument;

/// Keeps every persisted document in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    documents: Mutex<Vec<ContactDocument>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of stored documents, oldest first
    pub async fn documents(&self) -> Vec<ContactDocument> {
        self.documents.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.documents.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.lock().await.is_empty()
    }
}

#[async_trait]
impl PersistenceSink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn persist(&self, document: &ContactDocument) -> Result<(), SinkError> {
        self.documents.lock().await.push(document.clone());
        Ok(())
    }
}

/// Rejects every write and counts the attempts
#[derive(Debug)]
pub struct FailingSink {
    reason: String,
    attempts: AtomicU64,
}

impl FailingSink {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            attempts: AtomicU64::new(0),
        }
    }

    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PersistenceSink for FailingSink {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn persist(&self, _document: &ContactDocument) -> Result<(), SinkError> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        Err(SinkError::Unavailable(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContactSubmission;
    use chrono::Utc;

    fn document() -> ContactDocument {
        let submission = ContactSubmission {
            name: "Al".to_string(),
            email: "a@b.com".to_string(),
            subject: "Hello there".to_string(),
            message: "This is a test message.".to_string(),
            honeypot: None,
        };
        ContactDocument::from_submission(&submission, Utc::now())
    }

    #[tokio::test]
    async fn test_memory_sink_records_documents() {
        let sink = MemorySink::new();
        assert!(sink.is_empty().await);

        sink.persist(&document()).await.unwrap();
        sink.persist(&document()).await.unwrap();

        assert_eq!(sink.len().await, 2);
        assert_eq!(sink.documents().await[0].name, "Al");
    }

    #[tokio::test]
    async fn test_failing_sink_counts_attempts() {
        let sink = FailingSink::new("write quota exceeded");
        let err = sink.persist(&document()).await.unwrap_err();
        assert!(err.to_string().contains("write quota exceeded"));
        assert_eq!(sink.attempts(), 1);
    }
}
