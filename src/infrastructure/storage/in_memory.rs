//! In-memory storage

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::storage::{Storage, StorageEntity, StorageKey};
use crate::domain::DomainError;

/// Process-local storage for the `memory` backend and tests
///
/// Nothing survives a restart, so keys re-activate with a fresh window.
#[derive(Debug)]
pub struct InMemoryStorage<E>
where
    E: StorageEntity,
{
    entities: RwLock<HashMap<String, E>>,
}

impl<E> Default for InMemoryStorage<E>
where
    E: StorageEntity,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> InMemoryStorage<E>
where
    E: StorageEntity,
{
    pub fn new() -> Self {
        Self::seeded(Vec::new())
    }

    pub fn seeded(entities: Vec<E>) -> Self {
        let map = entities
            .into_iter()
            .map(|e| (e.key().as_str().to_string(), e))
            .collect();

        Self {
            entities: RwLock::new(map),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, E>>, DomainError> {
        self.entities
            .read()
            .map_err(|e| DomainError::storage(format!("Storage lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, E>>, DomainError> {
        self.entities
            .write()
            .map_err(|e| DomainError::storage(format!("Storage lock poisoned: {}", e)))
    }
}

#[async_trait]
impl<E> Storage<E> for InMemoryStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        Ok(self.read()?.get(key.as_str()).cloned())
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        Ok(self.read()?.values().cloned().collect())
    }

    async fn create(&self, entity: E) -> Result<E, DomainError> {
        let mut entities = self.write()?;
        let key = entity.key().as_str();

        if entities.contains_key(key) {
            return Err(DomainError::conflict(format!("'{}' already stored", key)));
        }

        entities.insert(key.to_string(), entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: E) -> Result<E, DomainError> {
        let mut entities = self.write()?;
        let key = entity.key().as_str();

        match entities.get_mut(key) {
            Some(existing) => *existing = entity.clone(),
            None => return Err(DomainError::not_found(format!("'{}' not stored", key))),
        }

        Ok(entity)
    }

    async fn save(&self, entity: E) -> Result<E, DomainError> {
        self.write()?
            .insert(entity.key().as_str().to_string(), entity.clone());
        Ok(entity)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{KeyHash, KeyState};
    use chrono::{TimeZone, Utc};

    fn state(hash: &str) -> KeyState {
        KeyState::activate(
            KeyHash::new(hash),
            Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let storage: InMemoryStorage<KeyState> = InMemoryStorage::new();
        let s = state("a");

        storage.create(s.clone()).await.unwrap();

        let result = storage.get(&KeyHash::new("a")).await.unwrap();
        assert_eq!(result, Some(s));
    }

    #[tokio::test]
    async fn test_create_conflict() {
        let storage: InMemoryStorage<KeyState> = InMemoryStorage::new();

        storage.create(state("a")).await.unwrap();
        let result = storage.create(state("a")).await;

        assert!(matches!(result.unwrap_err(), DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let storage: InMemoryStorage<KeyState> = InMemoryStorage::new();

        let result = storage.update(state("a")).await;

        assert!(matches!(result.unwrap_err(), DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_save_upserts() {
        let storage: InMemoryStorage<KeyState> = InMemoryStorage::new();

        storage.save(state("a")).await.unwrap();

        let mut updated = state("a");
        updated.record_warning();
        storage.save(updated).await.unwrap();

        let result = storage.get(&KeyHash::new("a")).await.unwrap().unwrap();
        assert_eq!(result.warning_count(), 1);
        assert_eq!(storage.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_seeded_storage() {
        let storage = InMemoryStorage::seeded(vec![state("a"), state("b")]);

        assert_eq!(storage.list().await.unwrap().len(), 2);
        assert!(storage.exists(&KeyHash::new("b")).await.unwrap());
        assert!(!storage.exists(&KeyHash::new("c")).await.unwrap());
    }
}
