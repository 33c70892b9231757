//! Support and subscription info endpoint

use std::collections::BTreeMap;

use axum::extract::State;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::types::Json;

#[derive(Debug, Serialize)]
pub struct SupportResponse {
    pub price: String,
    pub period: String,
    pub validity_days: u32,
    pub channels: BTreeMap<String, String>,
    pub disclaimer: Vec<String>,
}

/// GET /v1/support
pub async fn support_info(State(state): State<AppState>) -> Json<SupportResponse> {
    let support = &state.support;

    Json(SupportResponse {
        price: support.price.clone(),
        period: support.period.clone(),
        validity_days: state.gate.lifecycle().config().validity_days,
        channels: support.channels.clone(),
        disclaimer: support.disclaimer.clone(),
    })
}
