//! Signal entities

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

use super::chart::chart_symbol;

/// Number of ranked signals shown to subscribers
pub const MAX_SIGNALS: usize = 10;

const SYMBOL_WIDTH: usize = 6;

/// Left-pad a stock code with zeros to six characters
pub fn pad_symbol(raw: &str) -> String {
    format!("{:0>width$}", raw.trim(), width = SYMBOL_WIDTH)
}

/// A row as read from the signal file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRow {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

impl SignalRow {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: None,
            score: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}

/// Presentation tier of a ranked signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalTier {
    /// Rank 1
    Featured,
    /// Ranks 2-3
    Silver,
    /// Ranks 4-10
    Other,
}

impl SignalTier {
    pub fn for_rank(rank: usize) -> Self {
        match rank {
            1 => Self::Featured,
            2 | 3 => Self::Silver,
            _ => Self::Other,
        }
    }
}

/// A ranked signal ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub rank: usize,
    pub symbol: String,
    pub name: String,
    pub score: f64,
    pub tier: SignalTier,
    pub chart_symbol: String,
}

impl Signal {
    pub fn from_row(rank: usize, row: &SignalRow) -> Self {
        let symbol = pad_symbol(&row.symbol);
        let name = row
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| symbol.clone());

        Self {
            rank,
            chart_symbol: chart_symbol(&symbol),
            name,
            score: row.score.unwrap_or(0.0),
            tier: SignalTier::for_rank(rank),
            symbol,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TradingDayLabel {
    Today,
    NextTradingDay,
}

/// The trading day a signal list applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TradingDay {
    pub label: TradingDayLabel,
    pub date: NaiveDate,
}

impl TradingDay {
    /// Resolve in market time: from `cutoff_hour` on, signals target the next weekday
    pub fn resolve(now: DateTime<Utc>, market_offset: FixedOffset, cutoff_hour: u32) -> Self {
        let local = now.with_timezone(&market_offset);
        let today = local.date_naive();

        if local.hour() >= cutoff_hour {
            Self {
                label: TradingDayLabel::NextTradingDay,
                date: next_weekday(today),
            }
        } else {
            Self {
                label: TradingDayLabel::Today,
                date: today,
            }
        }
    }
}

fn next_weekday(date: NaiveDate) -> NaiveDate {
    let mut next = date + Duration::days(1);
    while matches!(next.weekday(), Weekday::Sat | Weekday::Sun) {
        next += Duration::days(1);
    }
    next
}

/// The gated signal list, grouped by tier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalBoard {
    pub trading_day: TradingDay,
    pub featured: Option<Signal>,
    pub silver: Vec<Signal>,
    pub other: Vec<Signal>,
}

impl SignalBoard {
    /// Build from file rows, keeping the top `MAX_SIGNALS`
    pub fn from_rows(rows: &[SignalRow], trading_day: TradingDay) -> Self {
        let mut board = Self {
            trading_day,
            featured: None,
            silver: Vec::new(),
            other: Vec::new(),
        };

        for (index, row) in rows.iter().take(MAX_SIGNALS).enumerate() {
            let signal = Signal::from_row(index + 1, row);
            match signal.tier {
                SignalTier::Featured => board.featured = Some(signal),
                SignalTier::Silver => board.silver.push(signal),
                SignalTier::Other => board.other.push(signal),
            }
        }

        board
    }

    pub fn len(&self) -> usize {
        usize::from(self.featured.is_some()) + self.silver.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
