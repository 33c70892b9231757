use clap::Parser;
use signal_paywall::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => cli::serve::run(args).await,
        Command::Keys(args) => cli::keys::run(args).await,
    }
}
