//! Infrastructure layer - storage, services and data sources

pub mod access_key;
pub mod anomaly;
pub mod gate;
pub mod key_state;
pub mod logging;
pub mod signal;
pub mod storage;
pub mod usage;
