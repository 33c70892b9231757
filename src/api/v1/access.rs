//! Access key validation endpoint

use axum::{extract::State, http::HeaderMap};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::{extract_access_key, Client};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::Page;

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    /// Falls back to the request headers when absent
    #[serde(default)]
    pub key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub reason: String,
    pub key_mask: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub first_seen: NaiveDate,
    pub validity_days: u32,
    pub days_remaining: i64,
    pub expiring_soon: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// POST /v1/access/validate
pub async fn validate_key(
    State(state): State<AppState>,
    Client(client): Client,
    headers: HeaderMap,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>, ApiError> {
    let raw_key = match request.key {
        Some(key) => key,
        None => extract_access_key(&headers)?.unwrap_or_default(),
    };

    debug!(device_id = %client.device_id, "Validating access key");

    let grant = state
        .gate
        .authorize(&raw_key, &client, Page::Validate)
        .await?;
    let validation = &grant.validation;

    Ok(Json(ValidateResponse {
        valid: true,
        reason: validation.reason(),
        key_mask: validation.key_mask.clone(),
        name: validation.name.clone(),
        first_seen: validation.first_seen,
        validity_days: validation.validity_days,
        days_remaining: validation.days_remaining,
        expiring_soon: validation.expiring_soon,
        warning: grant.warning.clone(),
    }))
}
