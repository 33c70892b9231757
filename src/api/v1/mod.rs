//! v1 API endpoints

pub mod access;
pub mod backtest;
pub mod chart;
pub mod signals;
pub mod support;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/access/validate", post(access::validate_key))
        .route("/signals", get(signals::list_signals))
        .route("/backtest", get(backtest::get_backtest))
        .route("/chart", get(chart::chart_options))
        .route("/chart/{symbol}", get(chart::chart_widget))
        .route("/support", get(support::support_info))
}
