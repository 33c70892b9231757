//! Subscription settings

use serde::{Deserialize, Serialize};

/// Subscription length and reminder threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriptionConfig {
    /// Days a key stays valid after its first use
    pub validity_days: u32,
    /// Remaining days at or below which a key is reported as expiring soon
    pub expiry_warning_days: u32,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            validity_days: 30,
            expiry_warning_days: 7,
        }
    }
}
