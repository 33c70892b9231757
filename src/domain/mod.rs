//! Domain layer - Core business logic and entities

pub mod access_key;
pub mod anomaly;
pub mod error;
pub mod key_state;
pub mod signal;
pub mod storage;
pub mod usage;

pub use access_key::{
    AccessError, AccessKey, AllowList, GateError, KeyEntry, KeyHash, KeyStatus, KeyValidation,
    SubscriptionConfig,
};
pub use anomaly::{AnomalyConfig, AnomalyPolicy, AnomalyVerdict, DeviceIdentity};
pub use error::DomainError;
pub use key_state::{DeviceSighting, KeyState, KeyStateEdit, KeyStateRepository};
pub use signal::{
    BacktestSummary, ChartWidget, EquityPoint, Signal, SignalBoard, SignalRow, SignalSource,
    SignalTier, TradingDay,
};
pub use storage::{Storage, StorageEntity, StorageKey};
pub use usage::{AccessStatus, ClientFingerprint, ClientInfo, Page, UsageLogEntry, UsageLogRepository};
