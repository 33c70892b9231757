//! Access gate service

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::{
    AccessError, AccessKey, AccessStatus, ClientInfo, GateError, KeyHash, KeyValidation, Page,
    UsageLogEntry, UsageLogRepository,
};
use crate::infrastructure::access_key::KeyLifecycleService;
use crate::infrastructure::anomaly::AntiSharingService;

/// Permission to view gated content
#[derive(Debug, Clone)]
pub struct AccessGrant {
    pub validation: KeyValidation,
    /// Shown to the subscriber when sharing is suspected
    pub warning: Option<String>,
}

impl AccessGrant {
    pub fn key_mask(&self) -> &str {
        &self.validation.key_mask
    }

    pub fn days_remaining(&self) -> i64 {
        self.validation.days_remaining
    }

    pub fn expiring_soon(&self) -> bool {
        self.validation.expiring_soon
    }
}

/// Access gate
///
/// Validates the key, applies the anti-sharing policy to valid keys, and
/// records each attempt in the usage log once with its final status.
#[derive(Debug)]
pub struct AccessGate {
    lifecycle: Arc<KeyLifecycleService>,
    anti_sharing: Arc<AntiSharingService>,
    usage_log: Arc<dyn UsageLogRepository>,
}

impl AccessGate {
    pub fn new(
        lifecycle: Arc<KeyLifecycleService>,
        anti_sharing: Arc<AntiSharingService>,
        usage_log: Arc<dyn UsageLogRepository>,
    ) -> Self {
        Self {
            lifecycle,
            anti_sharing,
            usage_log,
        }
    }

    pub fn lifecycle(&self) -> &KeyLifecycleService {
        &self.lifecycle
    }

    pub async fn authorize(
        &self,
        raw_key: &str,
        client: &ClientInfo,
        page: Page,
    ) -> Result<AccessGrant, GateError> {
        self.authorize_at(raw_key, client, page, Utc::now()).await
    }

    pub async fn authorize_at(
        &self,
        raw_key: &str,
        client: &ClientInfo,
        page: Page,
        now: DateTime<Utc>,
    ) -> Result<AccessGrant, GateError> {
        let validation = match self.lifecycle.validate_at(raw_key, now).await {
            Ok(validation) => validation,
            Err(GateError::Denied(err)) => {
                if let Ok(key) = AccessKey::parse(raw_key) {
                    self.record(&key.mask(), &key.hash(), AccessStatus::from(&err), client, page, now)
                        .await;
                }
                info!(code = err.code(), page = %page, "Access denied");
                return Err(err.into());
            }
            Err(err) => return Err(err),
        };

        let verdict = match self
            .anti_sharing
            .check(&validation.key_hash, client, now)
            .await
        {
            Ok(verdict) => Some(verdict),
            Err(e) => {
                warn!(error = %e, "Anti-sharing check failed, granting access");
                None
            }
        };

        let status = match &verdict {
            Some(verdict) if verdict.should_block => AccessStatus::Blocked,
            _ => AccessStatus::Granted,
        };
        self.record(
            &validation.key_mask,
            &validation.key_hash,
            status,
            client,
            page,
            now,
        )
        .await;

        match verdict {
            Some(verdict) if verdict.should_block => {
                let message = verdict
                    .message
                    .unwrap_or_else(|| "Access key temporarily blocked".to_string());
                Err(AccessError::Blocked { message }.into())
            }
            verdict => Ok(AccessGrant {
                validation,
                warning: verdict.and_then(|v| v.message),
            }),
        }
    }

    async fn record(
        &self,
        key_mask: &str,
        key_hash: &KeyHash,
        status: AccessStatus,
        client: &ClientInfo,
        page: Page,
        now: DateTime<Utc>,
    ) {
        let entry = UsageLogEntry::new(
            now,
            key_mask,
            key_hash.clone(),
            status,
            client.fingerprint(),
            page,
        );

        if let Err(e) = self.usage_log.append(entry).await {
            warn!(error = %e, "Failed to record access attempt");
        }
    }
}
