//! Signal list endpoint

use axum::extract::State;
use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use crate::api::middleware::{RequireAccess, SignalListPage};
use crate::api::state::AppState;
use crate::api::types::{AccessInfo, ApiError, Json};
use crate::domain::{SignalBoard, TradingDay};

#[derive(Debug, Serialize)]
pub struct SignalsResponse {
    pub access: AccessInfo,
    #[serde(flatten)]
    pub board: SignalBoard,
}

/// GET /v1/signals
pub async fn list_signals(
    State(state): State<AppState>,
    access: RequireAccess<SignalListPage>,
) -> Result<Json<SignalsResponse>, ApiError> {
    let rows = state.signals.load_signals().await?;
    let trading_day =
        TradingDay::resolve(Utc::now(), state.market.offset(), state.market.cutoff_hour());
    let board = SignalBoard::from_rows(&rows, trading_day);

    debug!(signals = board.len(), trading_day = %trading_day.date, "Serving signal list");

    Ok(Json(SignalsResponse {
        access: AccessInfo::from(&access.grant),
        board,
    }))
}
