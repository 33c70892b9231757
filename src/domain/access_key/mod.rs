//! Access key domain
//!
//! Normalized access keys, their allow-list metadata and the errors a
//! subscriber can see when a key is refused.

mod config;
mod digest;
mod entity;
mod error;

pub use config::SubscriptionConfig;
pub use digest::short_digest;
pub use entity::{AccessKey, AllowList, KeyEntry, KeyHash, KeyStatus, KeyValidation};
pub use error::{AccessError, GateError};
