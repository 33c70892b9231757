use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;

use crate::domain::{AnomalyConfig, KeyEntry, SubscriptionConfig};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub subscription: SubscriptionConfig,
    #[serde(default)]
    pub anomaly: AnomalyConfig,
    #[serde(default)]
    pub market: MarketConfig,
    #[serde(default)]
    pub support: SupportConfig,
    #[serde(default)]
    pub access_keys: AccessKeysConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Where state, logs and data files live
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// `json` for files under `data_dir`, `memory` for a throwaway process
    pub backend: String,
    pub data_dir: PathBuf,
    pub key_state_file: String,
    pub usage_log_file: String,
    pub keys_file: String,
    pub signals_file: String,
    pub equity_file: String,
}

impl StorageSettings {
    pub fn key_state_path(&self) -> PathBuf {
        self.data_dir.join(&self.key_state_file)
    }

    pub fn usage_log_path(&self) -> PathBuf {
        self.data_dir.join(&self.usage_log_file)
    }

    pub fn keys_path(&self) -> PathBuf {
        self.data_dir.join(&self.keys_file)
    }

    pub fn signals_path(&self) -> PathBuf {
        self.data_dir.join(&self.signals_file)
    }

    pub fn equity_path(&self) -> PathBuf {
        self.data_dir.join(&self.equity_file)
    }
}

/// Market clock used to label the trading day
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub utc_offset_hours: i32,
    /// Local hour from which signals target the next trading day
    pub cutoff_hour: u32,
}

impl MarketConfig {
    /// The configured offset, falling back to UTC+8 when out of range
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .or_else(|| FixedOffset::east_opt(8 * 3600))
            .unwrap_or_else(|| Utc.fix())
    }

    /// The configured cutoff hour, falling back to 16 when not a valid hour
    pub fn cutoff_hour(&self) -> u32 {
        if self.cutoff_hour < 24 {
            self.cutoff_hour
        } else {
            16
        }
    }
}

/// Subscription info shown on the support page
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SupportConfig {
    pub price: String,
    pub period: String,
    pub channels: BTreeMap<String, String>,
    pub disclaimer: Vec<String>,
}

/// Access keys declared in configuration
///
/// Either a plain list of keys or a table of key to settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AccessKeysConfig {
    List(Vec<String>),
    Table(BTreeMap<String, KeySetting>),
}

/// Settings for one configured key: full metadata or a bare flag
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum KeySetting {
    Entry(KeyEntry),
    Enabled(bool),
}

impl KeySetting {
    pub fn into_entry(self) -> KeyEntry {
        match self {
            Self::Entry(entry) => entry,
            Self::Enabled(true) => KeyEntry::default(),
            Self::Enabled(false) => KeyEntry::disabled(),
        }
    }
}

impl AccessKeysConfig {
    /// Configured keys with their allow-list metadata
    pub fn entries(&self) -> Vec<(String, KeyEntry)> {
        match self {
            Self::List(keys) => keys
                .iter()
                .map(|key| (key.clone(), KeyEntry::default()))
                .collect(),
            Self::Table(table) => table
                .iter()
                .map(|(key, setting)| (key.clone(), setting.clone().into_entry()))
                .collect(),
        }
    }
}

impl Default for AccessKeysConfig {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            storage: StorageSettings::default(),
            subscription: SubscriptionConfig::default(),
            anomaly: AnomalyConfig::default(),
            market: MarketConfig::default(),
            support: SupportConfig::default(),
            access_keys: AccessKeysConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: "json".to_string(),
            data_dir: PathBuf::from("data"),
            key_state_file: "key_state.json".to_string(),
            usage_log_file: "usage_log.jsonl".to_string(),
            keys_file: "keys.json".to_string(),
            signals_file: "signals.csv".to_string(),
            equity_file: "equity.csv".to_string(),
        }
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: 8,
            cutoff_hour: 16,
        }
    }
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            price: "99".to_string(),
            period: "30 days".to_string(),
            channels: BTreeMap::new(),
            disclaimer: vec![
                "Signals are for research and education only and are not investment advice."
                    .to_string(),
                "Past performance does not guarantee future results.".to_string(),
            ],
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AnomalyPolicy;

    fn parse(toml: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse("");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.subscription.validity_days, 30);
        assert_eq!(config.anomaly.max_devices, 2);
        assert_eq!(config.market.cutoff_hour, 16);
        assert_eq!(config.storage.key_state_path(), PathBuf::from("data/key_state.json"));
        assert_eq!(config.access_keys, AccessKeysConfig::List(Vec::new()));
    }

    #[test]
    fn test_access_keys_as_list() {
        let config = parse(r#"access_keys = ["key-one", "KEY-TWO"]"#);
        assert_eq!(
            config.access_keys,
            AccessKeysConfig::List(vec!["key-one".to_string(), "KEY-TWO".to_string()])
        );
    }

    #[test]
    fn test_access_keys_as_table() {
        let config = parse(
            r#"
            [access_keys]
            oldkey = false

            [access_keys.vip2026alpha]
            name = "Alice"
            validity_days = 90
            "#,
        );

        let AccessKeysConfig::Table(table) = config.access_keys else {
            panic!("expected a table");
        };
        let vip = table["vip2026alpha"].clone().into_entry();
        assert_eq!(vip.name.as_deref(), Some("Alice"));
        assert_eq!(vip.validity_days, Some(90));
        assert!(vip.enabled);
        assert!(!table["oldkey"].clone().into_entry().enabled);
        assert_eq!(AccessKeysConfig::Table(table).entries().len(), 2);
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = parse(
            r#"
            [subscription]
            validity_days = 7

            [anomaly]
            window_secs = 300
            policy = "block"

            [logging]
            format = "json"
            "#,
        );
        assert_eq!(config.subscription.validity_days, 7);
        assert_eq!(config.subscription.expiry_warning_days, 7);
        assert_eq!(config.anomaly.window_secs, 300);
        assert_eq!(config.anomaly.policy, AnomalyPolicy::Block);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_market_offset() {
        let market = MarketConfig::default();
        assert_eq!(market.offset().local_minus_utc(), 8 * 3600);

        let bad = MarketConfig {
            utc_offset_hours: 99,
            cutoff_hour: 16,
        };
        assert_eq!(bad.offset().local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn test_market_cutoff_hour() {
        let market = MarketConfig::default();
        assert_eq!(market.cutoff_hour(), 16);

        let early = MarketConfig {
            utc_offset_hours: 8,
            cutoff_hour: 0,
        };
        assert_eq!(early.cutoff_hour(), 0);

        let late = MarketConfig {
            utc_offset_hours: 8,
            cutoff_hour: 23,
        };
        assert_eq!(late.cutoff_hour(), 23);

        let bad = MarketConfig {
            utc_offset_hours: 8,
            cutoff_hour: 24,
        };
        assert_eq!(bad.cutoff_hour(), 16);

        let config = parse("[market]\ncutoff_hour = 99");
        assert_eq!(config.market.cutoff_hour(), 16);
    }
}
