//! Anti-sharing service
//!
//! Counts the devices a key was granted to within the trailing window and
//! keeps the key's device history current.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::domain::anomaly::{count_distinct_identities, evaluate};
use crate::domain::{
    AnomalyConfig, AnomalyVerdict, ClientInfo, DomainError, KeyHash, KeyState,
    KeyStateRepository, UsageLogRepository,
};

/// Anti-sharing service
#[derive(Debug)]
pub struct AntiSharingService {
    states: Arc<dyn KeyStateRepository>,
    usage_log: Arc<dyn UsageLogRepository>,
    config: AnomalyConfig,
}

impl AntiSharingService {
    pub fn new(
        states: Arc<dyn KeyStateRepository>,
        usage_log: Arc<dyn UsageLogRepository>,
        config: AnomalyConfig,
    ) -> Self {
        Self {
            states,
            usage_log,
            config,
        }
    }

    pub fn config(&self) -> &AnomalyConfig {
        &self.config
    }

    /// Check a key for sharing as seen from `client` at `now`
    ///
    /// The current attempt is counted from `client`; callers log it afterwards
    /// with its final status.
    pub async fn check(
        &self,
        key_hash: &KeyHash,
        client: &ClientInfo,
        now: DateTime<Utc>,
    ) -> Result<AnomalyVerdict, DomainError> {
        let window = self.config.window();
        let entries = self.usage_log.entries_since(key_hash, now - window).await?;
        let fingerprint = client.fingerprint();
        let distinct = count_distinct_identities(&entries, &fingerprint, self.config.identity);

        let device = fingerprint.device_id.clone();
        let ip_hash = fingerprint.ip_hash.clone();
        let state = self
            .states
            .modify(
                key_hash,
                Box::new(move |state| state.observe_device(&device, &ip_hash, now, window)),
            )
            .await?
            .unwrap_or_else(|| KeyState::activate(key_hash.clone(), now));

        let verdict = evaluate(distinct, &state, &self.config);
        debug!(
            key_hash = %key_hash,
            distinct_devices = distinct,
            entries = entries.len(),
            "Anti-sharing check"
        );

        if verdict.anomaly {
            self.states
                .modify(key_hash, Box::new(KeyState::record_warning))
                .await?;
            warn!(
                key_hash = %key_hash,
                distinct_devices = distinct,
                should_block = verdict.should_block,
                message = verdict.message.as_deref().unwrap_or_default(),
                "Possible access key sharing"
            );
        }

        Ok(verdict)
    }
}
