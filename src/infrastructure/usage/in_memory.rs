//! In-memory usage log

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::usage::{UsageLogEntry, UsageLogRepository};
use crate::domain::{DomainError, KeyHash};

/// In-memory usage log
///
/// Keeps at most `max_entries`, dropping the oldest first.
#[derive(Debug)]
pub struct InMemoryUsageLog {
    entries: RwLock<Vec<UsageLogEntry>>,
    max_entries: usize,
}

impl InMemoryUsageLog {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            max_entries,
        }
    }

    /// Every retained entry, oldest first
    pub fn entries(&self) -> Result<Vec<UsageLogEntry>, DomainError> {
        let entries = self.entries.read().map_err(|e| {
            DomainError::internal(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries.clone())
    }
}

impl Default for InMemoryUsageLog {
    fn default() -> Self {
        Self::new(100_000)
    }
}

#[async_trait]
impl UsageLogRepository for InMemoryUsageLog {
    async fn append(&self, entry: UsageLogEntry) -> Result<(), DomainError> {
        let mut entries = self.entries.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        entries.push(entry);
        if entries.len() > self.max_entries {
            let excess = entries.len() - self.max_entries;
            entries.drain(..excess);
        }

        Ok(())
    }

    async fn entries_since(
        &self,
        key_hash: &KeyHash,
        since: DateTime<Utc>,
    ) -> Result<Vec<UsageLogEntry>, DomainError> {
        let entries = self.entries.read().map_err(|e| {
            DomainError::internal(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries
            .iter()
            .filter(|e| &e.key_hash == key_hash && e.timestamp > since)
            .cloned()
            .collect())
    }
}
