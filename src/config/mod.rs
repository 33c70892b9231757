//! Application configuration

mod app_config;

pub use app_config::{
    AccessKeysConfig, AppConfig, KeySetting, LogFormat, LoggingConfig, MarketConfig,
    ServerConfig, StorageSettings, SupportConfig,
};
