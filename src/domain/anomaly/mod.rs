//! Anti-sharing domain
//!
//! Heuristics that flag a key used from more devices than a single
//! subscriber plausibly owns. Identifiers are client-generated, so this is
//! a deterrent, not an authoritative identity check.

mod config;
mod rules;

pub use config::{AnomalyConfig, AnomalyPolicy, DeviceIdentity};
pub use rules::{count_distinct_identities, evaluate, AnomalyVerdict};
