//! Health check endpoints

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::state::AppState;
use crate::api::types::Json;

/// Detailed health response with component status
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Individual component health check
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

impl HealthCheck {
    fn from_result<T, E: std::fmt::Display>(
        name: &str,
        result: Result<T, E>,
        failure: HealthStatus,
        start: Instant,
    ) -> Self {
        let (status, message) = match result {
            Ok(_) => (HealthStatus::Healthy, None),
            Err(e) => (failure, Some(e.to_string())),
        };

        Self {
            name: name.to_string(),
            status,
            message,
            latency_ms: Some(start.elapsed().as_millis() as u64),
        }
    }
}

/// Simple health check - returns 200 if the service is running
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check
///
/// Unreadable key state makes the service unhealthy. A missing signal file
/// only degrades it, since chart and support pages still work.
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();

    let check_start = Instant::now();
    let key_state = HealthCheck::from_result(
        "key_state",
        state.gate.lifecycle().activated_count().await,
        HealthStatus::Unhealthy,
        check_start,
    );

    let check_start = Instant::now();
    let signals = HealthCheck::from_result(
        "signal_file",
        state.signals.load_signals().await,
        HealthStatus::Degraded,
        check_start,
    );

    let checks = vec![key_state, signals];
    let overall_status = overall(&checks);

    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(checks),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    let status_code = match overall_status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

fn overall(checks: &[HealthCheck]) -> HealthStatus {
    if checks.iter().any(|c| c.status == HealthStatus::Unhealthy) {
        HealthStatus::Unhealthy
    } else if checks.iter().any(|c| c.status == HealthStatus::Degraded) {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    }
}

/// Liveness check
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}
