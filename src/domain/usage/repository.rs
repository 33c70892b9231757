//! Usage log repository trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Debug;

use super::UsageLogEntry;
use crate::domain::access_key::KeyHash;
use crate::domain::DomainError;

/// Append-only store of access attempts
#[async_trait]
pub trait UsageLogRepository: Send + Sync + Debug {
    /// Append one entry; existing entries are never rewritten
    async fn append(&self, entry: UsageLogEntry) -> Result<(), DomainError>;

    /// Entries for a key strictly after `since`, oldest first
    async fn entries_since(
        &self,
        key_hash: &KeyHash,
        since: DateTime<Utc>,
    ) -> Result<Vec<UsageLogEntry>, DomainError>;
}
