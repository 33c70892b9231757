//! Key lifecycle service
//!
//! Validates access keys against the allow-list and tracks each key's
//! subscription window from its first use.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};

use crate::domain::{
    AccessError, AccessKey, AllowList, DomainError, GateError, KeyEntry, KeyStateRepository,
    KeyStatus, KeyValidation, SubscriptionConfig,
};

/// Key lifecycle service
#[derive(Debug)]
pub struct KeyLifecycleService {
    states: Arc<dyn KeyStateRepository>,
    allow_list: AllowList,
    config: SubscriptionConfig,
}

impl KeyLifecycleService {
    pub fn new(
        states: Arc<dyn KeyStateRepository>,
        allow_list: AllowList,
        config: SubscriptionConfig,
    ) -> Self {
        Self {
            states,
            allow_list,
            config,
        }
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    pub fn config(&self) -> &SubscriptionConfig {
        &self.config
    }

    /// Number of keys that have ever been activated
    pub async fn activated_count(&self) -> Result<usize, DomainError> {
        Ok(self.states.list().await?.len())
    }

    /// Validate a raw key as typed by a subscriber
    pub async fn validate(&self, raw_key: &str) -> Result<KeyValidation, GateError> {
        self.validate_at(raw_key, Utc::now()).await
    }

    /// Validate a raw key at a given instant
    ///
    /// The first successful validation activates the key and persists its
    /// first-seen date. Later calls never move that date.
    pub async fn validate_at(
        &self,
        raw_key: &str,
        now: DateTime<Utc>,
    ) -> Result<KeyValidation, GateError> {
        let key = AccessKey::parse(raw_key)?;
        let entry = self.entry_for(&key)?;
        let validity_days = self.validity_days(entry);
        let key_hash = key.hash();

        let (state, created) = self.states.get_or_activate(&key_hash, now).await?;
        let today = now.date_naive();

        if state.is_expired(today, validity_days) {
            debug!(key = %key, first_seen = %state.first_seen_date(), "Access key expired");
            return Err(AccessError::Expired {
                activated_on: state.first_seen_date(),
                validity_days,
            }
            .into());
        }

        let days_remaining = state.days_remaining(today, validity_days);
        if created {
            info!(key = %key, validity_days, "First use of access key");
        }

        Ok(KeyValidation {
            key_hash,
            key_mask: key.mask(),
            name: entry.name.clone(),
            first_seen: state.first_seen_date(),
            validity_days,
            days_remaining,
            first_activation: created,
            expiring_soon: days_remaining <= i64::from(self.config.expiry_warning_days),
        })
    }

    /// Lifecycle status of an allow-listed key without activating it
    pub async fn status(&self, key: &AccessKey, today: NaiveDate) -> Result<KeyStatus, DomainError> {
        let Some(entry) = self.allow_list.get(key) else {
            return Err(DomainError::not_found(format!("Access key '{}' is not allow-listed", key)));
        };

        if !entry.enabled {
            return Ok(KeyStatus::Disabled);
        }

        let validity_days = self.validity_days(entry);
        let status = match self.states.get(&key.hash()).await? {
            None => KeyStatus::NotActivated,
            Some(state) if state.is_expired(today, validity_days) => KeyStatus::Expired {
                first_seen: state.first_seen_date(),
            },
            Some(state) => KeyStatus::Active {
                first_seen: state.first_seen_date(),
                days_remaining: state.days_remaining(today, validity_days),
            },
        };

        Ok(status)
    }

    fn entry_for(&self, key: &AccessKey) -> Result<&KeyEntry, AccessError> {
        let entry = self.allow_list.get(key).ok_or_else(|| {
            debug!(key = %key, "Access key not in allow-list");
            AccessError::InvalidKey
        })?;

        if !entry.enabled {
            debug!(key = %key, "Access key disabled");
            return Err(AccessError::Disabled);
        }

        Ok(entry)
    }

    fn validity_days(&self, entry: &KeyEntry) -> u32 {
        entry.validity_days.unwrap_or(self.config.validity_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::KeyState;
    use crate::infrastructure::key_state::StorageKeyStateRepository;
    use crate::infrastructure::storage::InMemoryStorage;
    use chrono::{Duration, TimeZone};

    const KEY: &str = "EIGEN-2026-ALPHA";

    fn service() -> KeyLifecycleService {
        let allow_list = AllowList::new()
            .with_key(KEY, KeyEntry::default().with_name("Alpha"))
            .with_key("SHORT-TRIAL", KeyEntry::default().with_validity_days(3))
            .with_key("OLD-KEY", KeyEntry::disabled());
        let states = Arc::new(StorageKeyStateRepository::new(Arc::new(
            InMemoryStorage::<KeyState>::new(),
        )));

        KeyLifecycleService::new(states, allow_list, SubscriptionConfig::default())
    }

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap() + Duration::days(n)
    }

    fn denied(result: Result<KeyValidation, GateError>) -> AccessError {
        match result {
            Err(GateError::Denied(err)) => err,
            other => panic!("expected access denial, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_new_key_gets_full_window() {
        let service = service();

        let validation = service.validate_at(KEY, day(0)).await.unwrap();

        assert!(validation.first_activation);
        assert_eq!(validation.days_remaining, 30);
        assert_eq!(validation.first_seen, day(0).date_naive());
        assert_eq!(validation.name.as_deref(), Some("Alpha"));
        assert_eq!(validation.key_mask, "EIGEN-20****LPHA");
        assert!(!validation.expiring_soon);
        assert_eq!(validation.reason(), "Access key activated, valid for 30 days");
    }

    #[tokio::test]
    async fn test_lookup_is_case_insensitive() {
        let service = service();
        let validation = service
            .validate_at("  eigen-2026-alpha ", day(0))
            .await
            .unwrap();
        assert_eq!(validation.key_hash, AccessKey::parse(KEY).unwrap().hash());
    }

    #[tokio::test]
    async fn test_first_seen_is_stable() {
        let service = service();

        service.validate_at(KEY, day(0)).await.unwrap();
        let later = service.validate_at(KEY, day(10)).await.unwrap();
        let again = service.validate_at(KEY, day(10)).await.unwrap();

        assert!(!later.first_activation);
        assert_eq!(later.first_seen, day(0).date_naive());
        assert_eq!(later.days_remaining, 20);
        assert_eq!(again, later);
    }

    #[tokio::test]
    async fn test_expiring_soon_threshold() {
        let service = service();

        service.validate_at(KEY, day(0)).await.unwrap();
        assert!(!service.validate_at(KEY, day(22)).await.unwrap().expiring_soon);
        assert!(service.validate_at(KEY, day(23)).await.unwrap().expiring_soon);
    }

    #[tokio::test]
    async fn test_expires_after_validity_window() {
        let service = service();

        service.validate_at(KEY, day(0)).await.unwrap();
        assert_eq!(service.validate_at(KEY, day(29)).await.unwrap().days_remaining, 1);

        let err = denied(service.validate_at(KEY, day(30)).await);
        assert_eq!(
            err,
            AccessError::Expired {
                activated_on: day(0).date_naive(),
                validity_days: 30,
            }
        );
    }

    #[tokio::test]
    async fn test_per_key_validity_override() {
        let service = service();

        let validation = service.validate_at("short-trial", day(0)).await.unwrap();
        assert_eq!(validation.validity_days, 3);
        assert!(validation.expiring_soon);

        assert!(matches!(
            denied(service.validate_at("short-trial", day(3)).await),
            AccessError::Expired { validity_days: 3, .. }
        ));
    }

    #[tokio::test]
    async fn test_rejections() {
        let service = service();

        assert_eq!(denied(service.validate_at("", day(0)).await), AccessError::MissingKey);
        assert_eq!(
            denied(service.validate_at("NOT-A-KEY", day(0)).await),
            AccessError::InvalidKey
        );
        assert_eq!(
            denied(service.validate_at("old-key", day(0)).await),
            AccessError::Disabled
        );
    }

    #[tokio::test]
    async fn test_status_does_not_activate() {
        let service = service();
        let key = AccessKey::parse(KEY).unwrap();

        assert_eq!(
            service.status(&key, day(0).date_naive()).await.unwrap(),
            KeyStatus::NotActivated
        );
        assert_eq!(
            service.status(&key, day(5).date_naive()).await.unwrap(),
            KeyStatus::NotActivated
        );

        service.validate_at(KEY, day(5)).await.unwrap();
        assert_eq!(
            service.status(&key, day(6).date_naive()).await.unwrap(),
            KeyStatus::Active {
                first_seen: day(5).date_naive(),
                days_remaining: 29,
            }
        );
        assert_eq!(
            service.status(&key, day(40).date_naive()).await.unwrap(),
            KeyStatus::Expired {
                first_seen: day(5).date_naive(),
            }
        );
    }

    #[tokio::test]
    async fn test_status_of_disabled_and_unknown_keys() {
        let service = service();

        assert_eq!(
            service
                .status(&AccessKey::parse("old-key").unwrap(), day(0).date_naive())
                .await
                .unwrap(),
            KeyStatus::Disabled
        );
        assert!(service
            .status(&AccessKey::parse("nope").unwrap(), day(0).date_naive())
            .await
            .is_err());
    }
}
