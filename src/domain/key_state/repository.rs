//! Key state repository trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Debug;

use super::KeyState;
use crate::domain::access_key::KeyHash;
use crate::domain::DomainError;

/// In-place edit applied to a stored key state
pub type KeyStateEdit = Box<dyn FnOnce(&mut KeyState) + Send>;

/// Repository for per-key activation state
///
/// Every read-modify-write goes through one writer so concurrent requests
/// for the same key never overwrite each other.
#[async_trait]
pub trait KeyStateRepository: Send + Sync + Debug {
    /// Get the state of a key, if it was ever activated
    async fn get(&self, key_hash: &KeyHash) -> Result<Option<KeyState>, DomainError>;

    /// Load the state of a key, activating it at `now` when absent
    ///
    /// Returns the state and whether it was created by this call.
    async fn get_or_activate(
        &self,
        key_hash: &KeyHash,
        now: DateTime<Utc>,
    ) -> Result<(KeyState, bool), DomainError>;

    /// Apply `edit` to an existing state and persist it
    async fn modify(&self, key_hash: &KeyHash, edit: KeyStateEdit) -> Result<Option<KeyState>, DomainError>;

    /// All stored states
    async fn list(&self) -> Result<Vec<KeyState>, DomainError>;
}
