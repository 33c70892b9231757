//! Signal Paywall
//!
//! Gates a daily stock-signal page behind time-limited access keys:
//! - Keys activate on first use and expire after a fixed number of days
//! - Key sharing is detected from the devices seen within a time window
//! - Every access attempt is appended to a usage log

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::{KeyState, UsageLogRepository};
use infrastructure::{
    access_key::{load_allow_list, KeyLifecycleService},
    anomaly::AntiSharingService,
    gate::AccessGate,
    key_state::StorageKeyStateRepository,
    signal::CsvSignalSource,
    storage::{StorageConfig, StorageFactory, StorageType},
    usage::{InMemoryUsageLog, JsonlUsageLog},
};
use tracing::{info, warn};

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let gate = Arc::new(create_access_gate(config).await?);

    let signals = Arc::new(CsvSignalSource::new(
        config.storage.signals_path(),
        config.storage.equity_path(),
    ));

    Ok(AppState::new(
        gate,
        signals,
        config.market.clone(),
        config.support.clone(),
    ))
}

/// Wire the key lifecycle, anti-sharing check and usage log into one gate
pub async fn create_access_gate(config: &AppConfig) -> anyhow::Result<AccessGate> {
    let backend = match StorageType::from_str(&config.storage.backend) {
        Some(backend) => backend,
        None => {
            warn!(
                backend = %config.storage.backend,
                "Unknown storage backend, falling back to json"
            );
            StorageType::JsonFile
        }
    };

    info!("Storage backend: {:?}", backend);

    let (storage_config, usage_log) = match backend {
        StorageType::JsonFile => (
            StorageConfig::json_file(config.storage.key_state_path()),
            json_usage_log(config),
        ),
        StorageType::InMemory => (StorageConfig::in_memory(), memory_usage_log()),
    };

    let states = Arc::new(StorageKeyStateRepository::new(StorageFactory::create::<
        KeyState,
    >(&storage_config)));

    let allow_list = load_allow_list(
        config.access_keys.entries(),
        &config.storage.keys_path(),
    )
    .await;
    if allow_list.is_empty() {
        warn!("No access keys configured; every gated request will be refused");
    }

    let lifecycle = Arc::new(KeyLifecycleService::new(
        states.clone(),
        allow_list,
        config.subscription.clone(),
    ));
    let anti_sharing = Arc::new(AntiSharingService::new(
        states,
        usage_log.clone(),
        config.anomaly.clone(),
    ));

    Ok(AccessGate::new(lifecycle, anti_sharing, usage_log))
}

fn json_usage_log(config: &AppConfig) -> Arc<dyn UsageLogRepository> {
    Arc::new(JsonlUsageLog::new(config.storage.usage_log_path()))
}

fn memory_usage_log() -> Arc<dyn UsageLogRepository> {
    Arc::new(InMemoryUsageLog::default())
}
