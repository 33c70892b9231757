//! Keys and entities held by a `Storage`

use std::fmt::Debug;
use std::hash::Hash;

use serde::{de::DeserializeOwned, Serialize};

/// Identifier of a stored entity
///
/// File-backed stores use `as_str` as the JSON object key, so it must be
/// stable across restarts.
pub trait StorageKey: Clone + Debug + Send + Sync + Eq + Hash {
    fn as_str(&self) -> &str;
}

/// A value persisted as JSON under its own key
pub trait StorageEntity: Clone + Debug + Send + Sync + Serialize + DeserializeOwned {
    type Key: StorageKey;

    fn key(&self) -> &Self::Key;
}
