//! Append-only JSON-lines file sink
//!
//! One document per line. Handy for self-hosted deployments without a CMS
//! and for inspecting submissions during local development.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::{PersistenceSink, SinkError};
use crate::types::ContactDocument;

/// Appends documents to a `.jsonl` file
#[derive(Debug)]
pub struct JsonLinesSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PersistenceSink for JsonLinesSink {
    fn name(&self) -> &'static str {
        "jsonl"
    }

    async fn persist(&self, document: &ContactDocument) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(document)?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}
