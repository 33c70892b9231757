//! Key state entity

use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::access_key::KeyHash;
use crate::domain::storage::StorageEntity;

/// A device observed using a key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSighting {
    pub device: String,
    /// Hashed client IP, or `unknown`
    pub ip: String,
    pub seen_at: DateTime<Utc>,
}

/// Persisted activation state of a single access key
///
/// Created on the first successful validation and never deleted.
/// `first_seen_date` anchors the subscription window and is never
/// rewritten once the state exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyState {
    key_hash: KeyHash,
    first_seen_date: NaiveDate,
    activated_at: DateTime<Utc>,
    #[serde(default)]
    device_ids: Vec<DeviceSighting>,
    #[serde(default)]
    last_ip: Option<String>,
    #[serde(default)]
    warning_count: u32,
}

impl StorageEntity for KeyState {
    type Key = KeyHash;

    fn key(&self) -> &Self::Key {
        &self.key_hash
    }
}

impl KeyState {
    /// Activate a key at `now`
    pub fn activate(key_hash: KeyHash, now: DateTime<Utc>) -> Self {
        Self {
            key_hash,
            first_seen_date: now.date_naive(),
            activated_at: now,
            device_ids: Vec::new(),
            last_ip: None,
            warning_count: 0,
        }
    }

    pub fn key_hash(&self) -> &KeyHash {
        &self.key_hash
    }

    pub fn first_seen_date(&self) -> NaiveDate {
        self.first_seen_date
    }

    pub fn activated_at(&self) -> DateTime<Utc> {
        self.activated_at
    }

    pub fn device_ids(&self) -> &[DeviceSighting] {
        &self.device_ids
    }

    pub fn last_ip(&self) -> Option<&str> {
        self.last_ip.as_deref()
    }

    pub fn warning_count(&self) -> u32 {
        self.warning_count
    }

    /// Whole calendar days since activation
    pub fn days_elapsed(&self, today: NaiveDate) -> i64 {
        (today - self.first_seen_date).num_days()
    }

    /// Remaining days of a `validity_days` subscription; zero or less means expired
    pub fn days_remaining(&self, today: NaiveDate, validity_days: u32) -> i64 {
        i64::from(validity_days) - self.days_elapsed(today)
    }

    pub fn is_expired(&self, today: NaiveDate, validity_days: u32) -> bool {
        self.days_remaining(today, validity_days) <= 0
    }

    /// Record the current device, dropping sightings older than `window`
    pub fn observe_device(
        &mut self,
        device: &str,
        ip: &str,
        now: DateTime<Utc>,
        window: Duration,
    ) {
        self.device_ids
            .retain(|sighting| now - sighting.seen_at < window);

        if !self.device_ids.iter().any(|s| s.device == device) {
            self.device_ids.push(DeviceSighting {
                device: device.to_string(),
                ip: ip.to_string(),
                seen_at: now,
            });
        }

        self.last_ip = Some(ip.to_string());
    }

    pub fn record_warning(&mut self) {
        self.warning_count = self.warning_count.saturating_add(1);
    }

    /// Distinct known (non-`unknown`) IP hashes among retained sightings
    pub fn distinct_ips(&self) -> usize {
        self.device_ids
            .iter()
            .filter(|s| s.ip != "unknown")
            .map(|s| s.ip.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}
