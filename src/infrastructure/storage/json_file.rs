//! JSON file storage implementation

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::storage::{Storage, StorageEntity, StorageKey};
use crate::domain::DomainError;

/// Storage backed by a single JSON object on disk, keyed by entity key
///
/// All mutations are serialized through one writer lock and land via a
/// temporary file plus rename, so readers never observe a half-written file
/// and concurrent requests cannot lose each other's updates. A file that
/// fails to parse is treated as empty and overwritten by the next write.
#[derive(Debug)]
pub struct JsonFileStorage<E>
where
    E: StorageEntity,
{
    path: PathBuf,
    writer: Mutex<()>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> JsonFileStorage<E>
where
    E: StorageEntity,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(()),
            _entity: PhantomData,
        }
    }

    async fn read_all(&self) -> Result<BTreeMap<String, E>, DomainError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        match serde_json::from_str(&contents) {
            Ok(map) => Ok(map),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Discarding unreadable state file"
                );
                Ok(BTreeMap::new())
            }
        }
    }

    async fn write_all(&self, entities: &BTreeMap<String, E>) -> Result<(), DomainError> {
        let json = serde_json::to_string_pretty(entities)
            .map_err(|e| DomainError::storage(format!("Failed to serialize state: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, json).await.map_err(|e| {
            DomainError::storage(format!("Failed to write {}: {}", tmp_path.display(), e))
        })?;
        tokio::fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            DomainError::storage(format!("Failed to replace {}: {}", self.path.display(), e))
        })?;

        debug!(path = %self.path.display(), entries = entities.len(), "State file written");
        Ok(())
    }
}

#[async_trait]
impl<E> Storage<E> for JsonFileStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        let entities = self.read_all().await?;
        Ok(entities.get(key.as_str()).cloned())
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        let entities = self.read_all().await?;
        Ok(entities.into_values().collect())
    }

    async fn create(&self, entity: E) -> Result<E, DomainError> {
        let _guard = self.writer.lock().await;
        let mut entities = self.read_all().await?;
        let key = entity.key().as_str().to_string();

        if entities.contains_key(&key) {
            return Err(DomainError::conflict(format!("'{}' already stored", key)));
        }

        entities.insert(key, entity.clone());
        self.write_all(&entities).await?;
        Ok(entity)
    }

    async fn update(&self, entity: E) -> Result<E, DomainError> {
        let _guard = self.writer.lock().await;
        let mut entities = self.read_all().await?;
        let key = entity.key().as_str().to_string();

        if !entities.contains_key(&key) {
            return Err(DomainError::not_found(format!("'{}' not stored", key)));
        }

        entities.insert(key, entity.clone());
        self.write_all(&entities).await?;
        Ok(entity)
    }

    async fn save(&self, entity: E) -> Result<E, DomainError> {
        let _guard = self.writer.lock().await;
        let mut entities = self.read_all().await?;

        entities.insert(entity.key().as_str().to_string(), entity.clone());
        self.write_all(&entities).await?;
        Ok(entity)
    }
}
