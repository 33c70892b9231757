//! CLI module for the signal paywall
//!
//! Provides subcommands:
//! - `serve`: run the HTTP server
//! - `keys`: print the allow-list with activation status

pub mod keys;
pub mod serve;

use clap::{Parser, Subcommand};

/// Signal Paywall - access-key gated daily stock signals
#[derive(Parser)]
#[command(name = "signal-paywall")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(serve::ServeArgs),

    /// Print configured access keys and their status
    Keys(keys::KeysArgs),
}
