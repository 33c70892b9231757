//! Storage trait

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

use super::entity::StorageEntity;

/// Generic keyed storage for small persisted entities
#[async_trait]
pub trait Storage<E>: Send + Sync + Debug
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError>;

    async fn list(&self) -> Result<Vec<E>, DomainError>;

    /// Insert a new entity; `Conflict` when the key is taken
    async fn create(&self, entity: E) -> Result<E, DomainError>;

    /// Replace an existing entity; `NotFound` when the key is absent
    async fn update(&self, entity: E) -> Result<E, DomainError>;

    /// Insert or replace
    ///
    /// Backends that can do this in one step should override it.
    async fn save(&self, entity: E) -> Result<E, DomainError> {
        if self.exists(entity.key()).await? {
            self.update(entity).await
        } else {
            self.create(entity).await
        }
    }

    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        Ok(self.get(key).await?.is_some())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.list().await?.len())
    }
}
