//! Storage factory for runtime storage selection

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::storage::{Storage, StorageEntity};

use super::in_memory::InMemoryStorage;
use super::json_file::JsonFileStorage;

/// Supported storage types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// Single JSON file on disk
    JsonFile,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "json" | "file" | "json_file" | "json-file" => Some(Self::JsonFile),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// In-memory storage configuration
    InMemory,
    /// JSON file storage configuration
    JsonFile(PathBuf),
}

impl StorageConfig {
    /// Creates an in-memory storage configuration
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Creates a JSON file storage configuration
    pub fn json_file(path: impl Into<PathBuf>) -> Self {
        Self::JsonFile(path.into())
    }
}

/// Factory for creating storage instances
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates a storage instance based on the configuration
    pub fn create<E>(config: &StorageConfig) -> Arc<dyn Storage<E>>
    where
        E: StorageEntity + 'static,
    {
        match config {
            StorageConfig::InMemory => Arc::new(InMemoryStorage::<E>::new()),
            StorageConfig::JsonFile(path) => Arc::new(JsonFileStorage::<E>::new(path.clone())),
        }
    }
}
