//! Chart embed endpoints
//!
//! Available without an access key.

use axum::extract::{Path, State};
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::signal::{parse_stock_code, ChartWidget, Signal, MAX_SIGNALS};
use crate::domain::DomainError;

#[derive(Debug, Serialize)]
pub struct ChartOption {
    pub symbol: String,
    pub name: String,
    pub chart_symbol: String,
}

#[derive(Debug, Serialize)]
pub struct ChartOptionsResponse {
    pub options: Vec<ChartOption>,
    /// Widget for the first option
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget: Option<ChartWidget>,
}

/// GET /v1/chart
///
/// Stocks from the current signal file to pick from; empty when no file is
/// published yet.
pub async fn chart_options(
    State(state): State<AppState>,
) -> Result<Json<ChartOptionsResponse>, ApiError> {
    let rows = match state.signals.load_signals().await {
        Ok(rows) => rows,
        Err(DomainError::DataUnavailable { .. }) => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    let options: Vec<ChartOption> = rows
        .iter()
        .take(MAX_SIGNALS)
        .enumerate()
        .map(|(index, row)| {
            let signal = Signal::from_row(index + 1, row);
            ChartOption {
                symbol: signal.symbol,
                name: signal.name,
                chart_symbol: signal.chart_symbol,
            }
        })
        .collect();
    let widget = options.first().map(|o| ChartWidget::for_code(&o.symbol));

    Ok(Json(ChartOptionsResponse { options, widget }))
}

/// GET /v1/chart/{symbol}
pub async fn chart_widget(Path(symbol): Path<String>) -> Result<Json<ChartWidget>, ApiError> {
    let code = parse_stock_code(&symbol)?;
    Ok(Json(ChartWidget::for_code(&code)))
}
