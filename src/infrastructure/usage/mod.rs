//! Usage log implementations

mod in_memory;
mod jsonl;

pub use in_memory::InMemoryUsageLog;
pub use jsonl::JsonlUsageLog;
