//! API middleware components

pub mod auth;
pub mod client;
pub mod logging;

pub use auth::{extract_access_key, BacktestPage, GatedPage, RequireAccess, SignalListPage};
pub use client::{client_info, device_id_middleware, Client, DEVICE_ID_HEADER};
pub use logging::logging_middleware;
