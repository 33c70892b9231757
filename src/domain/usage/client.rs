//! Client identity as seen by the service

use serde::{Deserialize, Serialize};

use crate::domain::access_key::short_digest;

const UNKNOWN: &str = "unknown";
const MAX_USER_AGENT_CHARS: usize = 200;

/// Raw request-side information about the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip: String,
    pub user_agent: String,
    /// Client-generated token distinguishing browsers/devices
    pub device_id: String,
}

impl ClientInfo {
    pub fn new(
        ip: Option<&str>,
        user_agent: Option<&str>,
        device_id: impl Into<String>,
    ) -> Self {
        let ip = ip
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN)
            .to_string();
        let user_agent = user_agent
            .map(|ua| ua.chars().take(MAX_USER_AGENT_CHARS).collect::<String>())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string());

        Self {
            ip,
            user_agent,
            device_id: device_id.into(),
        }
    }

    /// Hashed form of the client, safe to persist
    pub fn fingerprint(&self) -> ClientFingerprint {
        ClientFingerprint {
            ip_hash: hash_or_unknown(&self.ip),
            ua_hash: hash_or_unknown(&self.user_agent),
            device_id: self.device_id.clone(),
        }
    }
}

fn hash_or_unknown(value: &str) -> String {
    if value == UNKNOWN {
        UNKNOWN.to_string()
    } else {
        short_digest(value)
    }
}

/// Persisted identity of a client: hashed IP and UA plus the device id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientFingerprint {
    pub ip_hash: String,
    pub ua_hash: String,
    pub device_id: String,
}
