//! CSV-backed signal source

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::signal::{EquityPoint, SignalRow, SignalSource};
use crate::domain::DomainError;

/// Reads the signal and equity CSV files on every call
#[derive(Debug, Clone)]
pub struct CsvSignalSource {
    signals_path: PathBuf,
    equity_path: PathBuf,
}

impl CsvSignalSource {
    pub fn new(signals_path: impl Into<PathBuf>, equity_path: impl Into<PathBuf>) -> Self {
        Self {
            signals_path: signals_path.into(),
            equity_path: equity_path.into(),
        }
    }
}

async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, DomainError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(DomainError::data_unavailable(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

fn parse_rows<T: DeserializeOwned>(
    bytes: &[u8],
    path: &Path,
    required: &[&str],
) -> Result<Vec<T>, DomainError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader.headers().map_err(|e| {
        DomainError::data_format(format!("Unreadable header in {}: {}", path.display(), e))
    })?;

    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(DomainError::data_format(format!(
                "{} has no '{}' column",
                path.display(),
                column
            )));
        }
    }

    reader
        .deserialize()
        .enumerate()
        .map(|(index, row)| {
            row.map_err(|e| {
                DomainError::data_format(format!(
                    "Bad row {} in {}: {}",
                    index + 2,
                    path.display(),
                    e
                ))
            })
        })
        .collect()
}

#[async_trait]
impl SignalSource for CsvSignalSource {
    async fn load_signals(&self) -> Result<Vec<SignalRow>, DomainError> {
        let bytes = read_optional(&self.signals_path).await?.ok_or_else(|| {
            DomainError::data_unavailable(format!(
                "Signal file {} not found",
                self.signals_path.display()
            ))
        })?;

        let rows: Vec<SignalRow> = parse_rows(&bytes, &self.signals_path, &["symbol"])?;
        let rows: Vec<SignalRow> = rows
            .into_iter()
            .filter(|row| !row.symbol.is_empty())
            .collect();

        debug!(path = %self.signals_path.display(), rows = rows.len(), "Signals loaded");
        Ok(rows)
    }

    async fn load_equity_curve(&self) -> Result<Option<Vec<EquityPoint>>, DomainError> {
        let Some(bytes) = read_optional(&self.equity_path).await? else {
            return Ok(None);
        };

        let points = parse_rows(&bytes, &self.equity_path, &["date", "equity"])?;
        Ok(Some(points))
    }
}
