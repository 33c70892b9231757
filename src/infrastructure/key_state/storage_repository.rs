//! Storage-backed key state repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::key_state::{KeyState, KeyStateEdit, KeyStateRepository};
use crate::domain::storage::Storage;
use crate::domain::{DomainError, KeyHash};

/// Storage-backed implementation of KeyStateRepository
#[derive(Debug)]
pub struct StorageKeyStateRepository {
    storage: Arc<dyn Storage<KeyState>>,
    writer: Mutex<()>,
}

impl StorageKeyStateRepository {
    /// Create a new storage-backed repository
    pub fn new(storage: Arc<dyn Storage<KeyState>>) -> Self {
        Self {
            storage,
            writer: Mutex::new(()),
        }
    }
}

#[async_trait]
impl KeyStateRepository for StorageKeyStateRepository {
    async fn get(&self, key_hash: &KeyHash) -> Result<Option<KeyState>, DomainError> {
        self.storage.get(key_hash).await
    }

    async fn get_or_activate(
        &self,
        key_hash: &KeyHash,
        now: DateTime<Utc>,
    ) -> Result<(KeyState, bool), DomainError> {
        let _guard = self.writer.lock().await;

        if let Some(state) = self.storage.get(key_hash).await? {
            return Ok((state, false));
        }

        let state = self
            .storage
            .create(KeyState::activate(key_hash.clone(), now))
            .await?;

        info!(key_hash = %key_hash, first_seen = %state.first_seen_date(), "Access key activated");
        Ok((state, true))
    }

    async fn modify(
        &self,
        key_hash: &KeyHash,
        edit: KeyStateEdit,
    ) -> Result<Option<KeyState>, DomainError> {
        let _guard = self.writer.lock().await;

        let Some(mut state) = self.storage.get(key_hash).await? else {
            return Ok(None);
        };

        edit(&mut state);
        self.storage.update(state).await.map(Some)
    }

    async fn list(&self) -> Result<Vec<KeyState>, DomainError> {
        self.storage.list().await
    }
}
