//! Anomaly rules

use std::collections::HashSet;
use std::iter;

use serde::Serialize;

use super::config::{AnomalyConfig, AnomalyPolicy, DeviceIdentity};
use crate::domain::key_state::KeyState;
use crate::domain::usage::{ClientFingerprint, UsageLogEntry};

/// Result of an anti-sharing check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnomalyVerdict {
    pub anomaly: bool,
    pub message: Option<String>,
    pub should_block: bool,
    /// Distinct devices counted within the window
    pub distinct_devices: usize,
}

impl AnomalyVerdict {
    pub fn clear(distinct_devices: usize) -> Self {
        Self {
            anomaly: false,
            message: None,
            should_block: false,
            distinct_devices,
        }
    }
}

/// Count distinct devices among granted entries plus the current client
///
/// Callers pass entries already restricted to one key and one window. The
/// current attempt is not in the log yet.
pub fn count_distinct_identities(
    entries: &[UsageLogEntry],
    current: &ClientFingerprint,
    identity: DeviceIdentity,
) -> usize {
    let granted = entries.iter().filter(|e| e.status.is_success());

    match identity {
        DeviceIdentity::DeviceId => granted
            .map(|e| e.device_id.as_str())
            .chain(iter::once(current.device_id.as_str()))
            .collect::<HashSet<_>>()
            .len(),
        DeviceIdentity::Fingerprint => granted
            .map(UsageLogEntry::fingerprint)
            .chain(iter::once(current.clone()))
            .collect::<HashSet<_>>()
            .len(),
    }
}

/// Apply the anti-sharing rules
///
/// Too many distinct devices is governed by the configured policy. Many
/// distinct IPs across many sightings only ever warns.
pub fn evaluate(distinct_devices: usize, state: &KeyState, config: &AnomalyConfig) -> AnomalyVerdict {
    if distinct_devices > config.max_devices {
        return AnomalyVerdict {
            anomaly: true,
            message: Some(format!(
                "Detected {} devices using the same access key within {} (limit {})",
                distinct_devices,
                config.window_label(),
                config.max_devices
            )),
            should_block: config.policy == AnomalyPolicy::Block,
            distinct_devices,
        };
    }

    if state.distinct_ips() > config.max_ips && state.device_ids().len() > config.min_sightings {
        return AnomalyVerdict {
            anomaly: true,
            message: Some("Unusual sign-in activity detected for this access key".to_string()),
            should_block: false,
            distinct_devices,
        };
    }

    AnomalyVerdict::clear(distinct_devices)
}
