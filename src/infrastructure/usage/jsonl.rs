//! JSON Lines usage log

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::warn;

use crate::domain::usage::{UsageLogEntry, UsageLogRepository};
use crate::domain::{DomainError, KeyHash};

/// Append-only usage log, one JSON object per line
///
/// Appends are serialized so concurrent requests never interleave partial
/// lines. Lines that fail to parse are skipped when reading.
#[derive(Debug)]
pub struct JsonlUsageLog {
    path: PathBuf,
    writer: Mutex<()>,
}

impl JsonlUsageLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(()),
        }
    }
}

#[async_trait]
impl UsageLogRepository for JsonlUsageLog {
    async fn append(&self, entry: UsageLogEntry) -> Result<(), DomainError> {
        let mut line = serde_json::to_string(&entry)
            .map_err(|e| DomainError::storage(format!("Failed to serialize log entry: {}", e)))?;
        line.push('\n');

        let _guard = self.writer.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to open {}: {}", self.path.display(), e))
            })?;

        file.write_all(line.as_bytes()).await.map_err(|e| {
            DomainError::storage(format!("Failed to append to {}: {}", self.path.display(), e))
        })?;
        file.flush().await.map_err(|e| {
            DomainError::storage(format!("Failed to flush {}: {}", self.path.display(), e))
        })?;

        Ok(())
    }

    async fn entries_since(
        &self,
        key_hash: &KeyHash,
        since: DateTime<Utc>,
    ) -> Result<Vec<UsageLogEntry>, DomainError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let mut skipped = 0usize;
        let entries = contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str::<UsageLogEntry>(line) {
                Ok(entry) => Some(entry),
                Err(_) => {
                    skipped += 1;
                    None
                }
            })
            .filter(|entry| &entry.key_hash == key_hash && entry.timestamp > since)
            .collect();

        if skipped > 0 {
            warn!(
                path = %self.path.display(),
                skipped,
                "Skipped malformed usage log lines"
            );
        }

        Ok(entries)
    }
}
