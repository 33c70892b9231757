//! Access errors reported to subscribers

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::DomainError;

/// Reasons a request is refused access to gated content
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("Access key required")]
    MissingKey,

    #[error("Invalid access key")]
    InvalidKey,

    #[error("Access key has been disabled")]
    Disabled,

    #[error("Access key expired: activated on {activated_on}, valid for {validity_days} days")]
    Expired {
        activated_on: NaiveDate,
        validity_days: u32,
    },

    #[error("{message}")]
    Blocked { message: String },
}

impl AccessError {
    /// Short machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingKey => "missing_key",
            Self::InvalidKey => "invalid_key",
            Self::Disabled => "key_disabled",
            Self::Expired { .. } => "key_expired",
            Self::Blocked { .. } => "key_blocked",
        }
    }
}

/// Failure of a gated request: either refused access or a backend fault
#[derive(Debug, Error)]
pub enum GateError {
    #[error(transparent)]
    Denied(#[from] AccessError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}
