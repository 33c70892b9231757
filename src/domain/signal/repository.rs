//! Signal source trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::{EquityPoint, SignalRow};
use crate::domain::DomainError;

/// Read-only access to the signal and equity files
///
/// Implementations read fresh on every call so a replaced file is picked up
/// without a restart.
#[async_trait]
pub trait SignalSource: Send + Sync + Debug {
    /// Ranked signal rows in file order
    async fn load_signals(&self) -> Result<Vec<SignalRow>, DomainError>;

    /// Equity curve, or `None` when no backtest data is published
    async fn load_equity_curve(&self) -> Result<Option<Vec<EquityPoint>>, DomainError>;
}
