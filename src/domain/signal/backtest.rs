//! Backtest equity curve

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// Headline figures of a strategy's equity curve
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestSummary {
    pub initial: f64,
    #[serde(rename = "final")]
    pub final_value: f64,
    /// `None` when the curve starts at zero
    pub total_return_pct: Option<f64>,
    pub points: Vec<EquityPoint>,
}

impl BacktestSummary {
    /// Summarize a curve; `None` when it has no points
    pub fn from_points(mut points: Vec<EquityPoint>) -> Option<Self> {
        points.sort_by_key(|p| p.date);

        let initial = points.first()?.equity;
        let final_value = points.last()?.equity;
        let total_return_pct =
            (initial != 0.0).then(|| (final_value - initial) / initial * 100.0);

        Some(Self {
            initial,
            final_value,
            total_return_pct,
            points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(day: u32, equity: f64) -> EquityPoint {
        EquityPoint {
            date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
            equity,
        }
    }

    #[test]
    fn test_total_return() {
        let summary =
            BacktestSummary::from_points(vec![point(1, 1.0), point(2, 1.1), point(3, 1.25)])
                .unwrap();

        assert_eq!(summary.initial, 1.0);
        assert_eq!(summary.final_value, 1.25);
        assert!((summary.total_return_pct.unwrap() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_points_sorted_by_date() {
        let summary = BacktestSummary::from_points(vec![point(3, 0.9), point(1, 1.0)]).unwrap();
        assert_eq!(summary.initial, 1.0);
        assert_eq!(summary.final_value, 0.9);
        assert!(summary.total_return_pct.unwrap() < 0.0);
    }

    #[test]
    fn test_empty_and_zero_start() {
        assert!(BacktestSummary::from_points(Vec::new()).is_none());

        let summary = BacktestSummary::from_points(vec![point(1, 0.0), point(2, 1.0)]).unwrap();
        assert!(summary.total_return_pct.is_none());
    }
}
