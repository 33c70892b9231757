//! Backtest endpoint

use axum::extract::State;
use serde::Serialize;

use crate::api::middleware::{BacktestPage, RequireAccess};
use crate::api::state::AppState;
use crate::api::types::{AccessInfo, ApiError, Json};
use crate::domain::BacktestSummary;

#[derive(Debug, Serialize)]
pub struct BacktestResponse {
    pub access: AccessInfo,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<BacktestSummary>,
}

/// GET /v1/backtest
pub async fn get_backtest(
    State(state): State<AppState>,
    access: RequireAccess<BacktestPage>,
) -> Result<Json<BacktestResponse>, ApiError> {
    let summary = state
        .signals
        .load_equity_curve()
        .await?
        .and_then(BacktestSummary::from_points);

    Ok(Json(BacktestResponse {
        access: AccessInfo::from(&access.grant),
        available: summary.is_some(),
        summary,
    }))
}
