//! Usage log entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::client::ClientFingerprint;
use crate::domain::access_key::{AccessError, KeyHash};

/// Outcome recorded for an access attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessStatus {
    Granted,
    Invalid,
    Disabled,
    Expired,
    Blocked,
}

impl AccessStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

impl From<&AccessError> for AccessStatus {
    fn from(err: &AccessError) -> Self {
        match err {
            AccessError::MissingKey | AccessError::InvalidKey => Self::Invalid,
            AccessError::Disabled => Self::Disabled,
            AccessError::Expired { .. } => Self::Expired,
            AccessError::Blocked { .. } => Self::Blocked,
        }
    }
}

impl std::fmt::Display for AccessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Granted => write!(f, "granted"),
            Self::Invalid => write!(f, "invalid"),
            Self::Disabled => write!(f, "disabled"),
            Self::Expired => write!(f, "expired"),
            Self::Blocked => write!(f, "blocked"),
        }
    }
}

/// Page a request was made for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Validate,
    SignalList,
    Backtest,
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validate => write!(f, "validate"),
            Self::SignalList => write!(f, "signal_list"),
            Self::Backtest => write!(f, "backtest"),
        }
    }
}

/// One line of the append-only usage log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageLogEntry {
    pub timestamp: DateTime<Utc>,
    pub key_mask: String,
    pub key_hash: KeyHash,
    pub success: bool,
    pub status: AccessStatus,
    pub ip_hash: String,
    pub ua_hash: String,
    pub device_id: String,
    pub page: Page,
}

impl UsageLogEntry {
    pub fn new(
        timestamp: DateTime<Utc>,
        key_mask: impl Into<String>,
        key_hash: KeyHash,
        status: AccessStatus,
        client: ClientFingerprint,
        page: Page,
    ) -> Self {
        Self {
            timestamp,
            key_mask: key_mask.into(),
            key_hash,
            success: status.is_success(),
            status,
            ip_hash: client.ip_hash,
            ua_hash: client.ua_hash,
            device_id: client.device_id,
            page,
        }
    }

    pub fn fingerprint(&self) -> ClientFingerprint {
        ClientFingerprint {
            ip_hash: self.ip_hash.clone(),
            ua_hash: self.ua_hash.clone(),
            device_id: self.device_id.clone(),
        }
    }
}
