//! Signal domain - ranked signals, chart embed and backtest summary

mod backtest;
mod chart;
mod entity;
mod repository;

pub use backtest::{BacktestSummary, EquityPoint};
pub use chart::{chart_symbol, parse_stock_code, ChartWidget, Exchange};
pub use entity::{
    pad_symbol, Signal, SignalBoard, SignalRow, SignalTier, TradingDay, TradingDayLabel,
    MAX_SIGNALS,
};
pub use repository::SignalSource;
