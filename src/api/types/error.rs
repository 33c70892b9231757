//! API error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::{AccessError, DomainError, GateError};

/// Category of an error response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    AuthenticationError,
    PermissionError,
    NotFoundError,
    ServerError,
    ServiceUnavailableError,
}

impl std::fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequestError => write!(f, "invalid_request_error"),
            Self::AuthenticationError => write!(f, "authentication_error"),
            Self::PermissionError => write!(f, "permission_error"),
            Self::NotFoundError => write!(f, "not_found_error"),
            Self::ServerError => write!(f, "server_error"),
            Self::ServiceUnavailableError => write!(f, "service_unavailable_error"),
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error_type: ApiErrorType, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type,
                    code: None,
                },
            },
        }
    }

    /// Add a machine-readable error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.error.code = Some(code.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorType::InvalidRequestError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, ApiErrorType::AuthenticationError, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, ApiErrorType::PermissionError, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorType::NotFoundError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiErrorType::ServerError, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            ApiErrorType::ServiceUnavailableError,
            message,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Validation { message } => Self::bad_request(message),
            DomainError::Conflict { message } => Self::bad_request(message),
            DomainError::DataUnavailable { message } => {
                Self::unavailable(message).with_code("data_unavailable")
            }
            DomainError::DataFormat { message } => {
                Self::internal(message).with_code("data_format_error")
            }
            DomainError::Internal { message }
            | DomainError::Storage { message } => Self::internal(message),
        }
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        let message = err.to_string();
        let code = err.code();
        let error = match err {
            AccessError::MissingKey | AccessError::InvalidKey => Self::unauthorized(message),
            AccessError::Disabled | AccessError::Expired { .. } | AccessError::Blocked { .. } => {
                Self::forbidden(message)
            }
        };

        error.with_code(code)
    }
}

impl From<GateError> for ApiError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::Denied(err) => err.into(),
            GateError::Domain(err) => err.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.response.error.error_type, self.response.error.message
        )
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_domain_error_conversion() {
        let api_err: ApiError = DomainError::data_unavailable("signals.csv not found").into();
        assert_eq!(api_err.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(api_err.response.error.code.as_deref(), Some("data_unavailable"));

        let api_err: ApiError = DomainError::data_format("no symbol column").into();
        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);

        let api_err: ApiError = DomainError::validation("bad code").into();
        assert_eq!(api_err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_access_error_conversion() {
        let api_err: ApiError = AccessError::InvalidKey.into();
        assert_eq!(api_err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(api_err.response.error.code.as_deref(), Some("invalid_key"));

        let api_err: ApiError = AccessError::Expired {
            activated_on: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            validity_days: 30,
        }
        .into();
        assert_eq!(api_err.status, StatusCode::FORBIDDEN);
        assert_eq!(api_err.response.error.error_type, ApiErrorType::PermissionError);
        assert!(api_err.response.error.message.contains("2026-03-01"));
    }

    #[test]
    fn test_gate_error_conversion() {
        let api_err: ApiError = GateError::from(AccessError::Blocked {
            message: "Detected 3 devices".to_string(),
        })
        .into();
        assert_eq!(api_err.status, StatusCode::FORBIDDEN);
        assert_eq!(api_err.response.error.code.as_deref(), Some("key_blocked"));

        let api_err: ApiError = GateError::from(DomainError::storage("disk full")).into();
        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::unauthorized("Access key required").with_code("missing_key");
        let json = serde_json::to_value(&err.response).unwrap();

        assert_eq!(json["error"]["type"], "authentication_error");
        assert_eq!(json["error"]["code"], "missing_key");
        assert_eq!(json["error"]["message"], "Access key required");
    }
}
