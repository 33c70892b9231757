//! Access key entity and related types

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::digest::short_digest;
use super::error::AccessError;
use crate::domain::storage::StorageKey;

/// A normalized access key: trimmed and upper-cased
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessKey(String);

impl AccessKey {
    /// Normalize a raw key as typed by a subscriber
    pub fn parse(raw: &str) -> Result<Self, AccessError> {
        let normalized = raw.trim().to_uppercase();

        if normalized.is_empty() {
            return Err(AccessError::MissingKey);
        }

        Ok(Self(normalized))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stable hash used to key persisted state and log entries
    pub fn hash(&self) -> KeyHash {
        KeyHash(short_digest(&self.0))
    }

    /// Partially hidden form, safe to show on pages and in logs
    ///
    /// Keys of 12+ characters keep their first 8 and last 4 characters,
    /// shorter keys keep only their first 4.
    pub fn mask(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();

        if chars.len() >= 12 {
            let head: String = chars[..8].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{}****{}", head, tail)
        } else {
            let head: String = chars.iter().take(4).collect();
            format!("{}****", head)
        }
    }
}

impl std::fmt::Display for AccessKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mask())
    }
}

/// Hash of an access key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyHash(String);

impl KeyHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for KeyHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for KeyHash {
    fn as_str(&self) -> &str {
        &self.0
    }
}

fn default_enabled() -> bool {
    true
}

/// Allow-list metadata for a single key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntry {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Display name of the subscriber
    #[serde(default)]
    pub name: Option<String>,
    /// Overrides the configured subscription length for this key
    #[serde(default)]
    pub validity_days: Option<u32>,
}

impl Default for KeyEntry {
    fn default() -> Self {
        Self {
            enabled: true,
            name: None,
            validity_days: None,
        }
    }
}

impl KeyEntry {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_validity_days(mut self, days: u32) -> Self {
        self.validity_days = Some(days);
        self
    }
}

/// The set of keys allowed to unlock gated content
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    entries: HashMap<AccessKey, KeyEntry>,
}

impl AllowList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key unless it is already present; earlier sources win
    pub fn insert_if_absent(&mut self, raw_key: &str, entry: KeyEntry) -> bool {
        let Ok(key) = AccessKey::parse(raw_key) else {
            return false;
        };

        if self.entries.contains_key(&key) {
            return false;
        }

        self.entries.insert(key, entry);
        true
    }

    pub fn with_key(mut self, raw_key: &str, entry: KeyEntry) -> Self {
        self.insert_if_absent(raw_key, entry);
        self
    }

    pub fn get(&self, key: &AccessKey) -> Option<&KeyEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by key for stable output
    pub fn entries(&self) -> Vec<(&AccessKey, &KeyEntry)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
        entries
    }
}

/// Outcome of a successful key validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValidation {
    pub key_hash: KeyHash,
    pub key_mask: String,
    pub name: Option<String>,
    pub first_seen: NaiveDate,
    pub validity_days: u32,
    pub days_remaining: i64,
    /// True when this call created the key's state
    pub first_activation: bool,
    pub expiring_soon: bool,
}

impl KeyValidation {
    /// User-facing description of the validation outcome
    pub fn reason(&self) -> String {
        if self.first_activation {
            format!(
                "Access key activated, valid for {} days",
                self.days_remaining
            )
        } else {
            format!("{} days remaining", self.days_remaining)
        }
    }
}

/// Read-only lifecycle status of an allow-listed key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum KeyStatus {
    Disabled,
    NotActivated,
    Active {
        first_seen: NaiveDate,
        days_remaining: i64,
    },
    Expired {
        first_seen: NaiveDate,
    },
}

impl std::fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "disabled"),
            Self::NotActivated => write!(f, "not activated"),
            Self::Active {
                first_seen,
                days_remaining,
            } => write!(f, "active since {} ({} days left)", first_seen, days_remaining),
            Self::Expired { first_seen } => write!(f, "expired (activated {})", first_seen),
        }
    }
}
