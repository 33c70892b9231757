//! Access key infrastructure implementations
//!
//! Allow-list loading and the key lifecycle service.

mod allow_list;
mod service;

pub use allow_list::load_allow_list;
pub use service::KeyLifecycleService;
