//! Anti-sharing configuration

use chrono::Duration;
use serde::{Deserialize, Serialize};

const MAX_WINDOW_SECS: u64 = 366 * 24 * 60 * 60;

/// What happens when sharing is suspected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyPolicy {
    /// Show a warning but keep serving content
    #[default]
    Warn,
    /// Refuse gated content while the anomaly persists
    Block,
}

/// How two log entries are judged to come from the same device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeviceIdentity {
    /// Device id alone
    #[default]
    DeviceId,
    /// The (ip hash, user agent hash, device id) triple
    Fingerprint,
}

/// Anti-sharing thresholds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    /// Trailing window in seconds
    pub window_secs: u64,
    /// Distinct devices tolerated per key within the window
    pub max_devices: usize,
    /// Distinct client IPs tolerated before the burst rule applies
    pub max_ips: usize,
    /// Device sightings required before the burst rule applies
    pub min_sightings: usize,
    pub identity: DeviceIdentity,
    pub policy: AnomalyPolicy,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            window_secs: 24 * 60 * 60,
            max_devices: 2,
            max_ips: 3,
            min_sightings: 5,
            identity: DeviceIdentity::default(),
            policy: AnomalyPolicy::default(),
        }
    }
}

impl AnomalyConfig {
    /// Trailing window, capped at one year
    pub fn window(&self) -> Duration {
        Duration::seconds(self.window_secs.min(MAX_WINDOW_SECS) as i64)
    }

    pub fn with_window_secs(mut self, secs: u64) -> Self {
        self.window_secs = secs;
        self
    }

    pub fn with_max_devices(mut self, max: usize) -> Self {
        self.max_devices = max;
        self
    }

    pub fn with_identity(mut self, identity: DeviceIdentity) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_policy(mut self, policy: AnomalyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Human-readable window length, e.g. "24 hours" or "5 minutes"
    pub fn window_label(&self) -> String {
        let secs = self.window_secs;

        if secs >= 3600 && secs % 3600 == 0 {
            plural(secs / 3600, "hour")
        } else if secs >= 60 && secs % 60 == 0 {
            plural(secs / 60, "minute")
        } else {
            plural(secs, "second")
        }
    }
}

fn plural(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}
