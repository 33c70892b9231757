//! API request and response types

mod access;
mod error;
mod json;

pub use access::AccessInfo;
pub use error::{ApiError, ApiErrorDetail, ApiErrorResponse, ApiErrorType};
pub use json::Json;
