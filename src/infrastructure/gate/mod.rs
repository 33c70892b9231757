//! Access gate - the single flow every gated request goes through

mod service;

pub use service::{AccessGate, AccessGrant};
