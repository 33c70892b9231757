//! Anti-sharing detection

mod detector;

pub use detector::AntiSharingService;
