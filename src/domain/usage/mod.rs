//! Usage log domain
//!
//! Append-only records of every access attempt, read back to detect
//! keys shared across devices.

mod client;
mod record;
mod repository;

pub use client::{ClientFingerprint, ClientInfo};
pub use record::{AccessStatus, Page, UsageLogEntry};
pub use repository::UsageLogRepository;
