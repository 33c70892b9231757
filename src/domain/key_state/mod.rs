//! Key state domain - per-key activation and device history

mod entity;
mod repository;

pub use entity::{DeviceSighting, KeyState};
pub use repository::{KeyStateEdit, KeyStateRepository};
