mod bootstrap_helpers;
mod cli_args;
mod startup_config;
mod startup_dispatch;

use anyhow::Result;
use clap::Parser;

use crate::bootstrap_helpers::init_tracing;
use crate::cli_args::Cli;
use crate::startup_config::StartupConfig;
use crate::startup_dispatch::run_startup;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the environment and flags still apply.
    let _ = dotenv::dotenv();
    init_tracing();
    let cli = Cli::parse();
    let config = StartupConfig::from_cli(&cli)?;
    run_startup(config).await
}
