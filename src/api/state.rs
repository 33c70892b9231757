//! Application state for shared services

use std::sync::Arc;

use crate::config::{MarketConfig, SupportConfig};
use crate::domain::SignalSource;
use crate::infrastructure::gate::AccessGate;

/// Application state shared by all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub gate: Arc<AccessGate>,
    pub signals: Arc<dyn SignalSource>,
    pub market: Arc<MarketConfig>,
    pub support: Arc<SupportConfig>,
}

impl AppState {
    pub fn new(
        gate: Arc<AccessGate>,
        signals: Arc<dyn SignalSource>,
        market: MarketConfig,
        support: SupportConfig,
    ) -> Self {
        Self {
            gate,
            signals,
            market: Arc::new(market),
            support: Arc::new(support),
        }
    }
}
