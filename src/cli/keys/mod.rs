//! Keys command - prints the allow-list with activation status

use chrono::{NaiveDate, Utc};
use clap::Args;
use serde::Serialize;

use crate::config::AppConfig;
use crate::domain::{DomainError, KeyStatus};
use crate::infrastructure::access_key::KeyLifecycleService;
use crate::infrastructure::logging;

/// Arguments for the keys command
#[derive(Args, Clone, Debug, Default)]
pub struct KeysArgs {
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// One allow-listed key as reported to the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyReport {
    pub key_mask: String,
    pub name: Option<String>,
    #[serde(flatten)]
    pub status: KeyStatus,
}

/// Print every allow-listed key; never activates a key
pub async fn run(args: KeysArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging)?;

    let gate = crate::create_access_gate(&config).await?;
    let reports = key_reports(gate.lifecycle(), Utc::now().date_naive()).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    if reports.is_empty() {
        println!("No access keys configured");
        return Ok(());
    }

    println!("{:<20} {:<20} STATUS", "KEY", "NAME");
    for report in &reports {
        println!(
            "{:<20} {:<20} {}",
            report.key_mask,
            report.name.as_deref().unwrap_or("-"),
            report.status
        );
    }

    Ok(())
}

pub async fn key_reports(
    lifecycle: &KeyLifecycleService,
    today: NaiveDate,
) -> Result<Vec<KeyReport>, DomainError> {
    let mut reports = Vec::with_capacity(lifecycle.allow_list().len());

    for (key, entry) in lifecycle.allow_list().entries() {
        reports.push(KeyReport {
            key_mask: key.mask(),
            name: entry.name.clone(),
            status: lifecycle.status(key, today).await?,
        });
    }

    Ok(reports)
}
