//! Manual warranty and contract expiry sweep.

use anyhow::Context;
use clap::{Args, Subcommand};

use wms_core::config::AppConfig;

use crate::output::{self, OutputFormat};

/// Arguments for expiry commands
#[derive(Debug, Args)]
pub struct ExpiryArgs {
    #[command(subcommand)]
    pub command: ExpiryCommand,
}

/// Expiry subcommands
#[derive(Debug, Subcommand)]
pub enum ExpiryCommand {
    /// Run one expiry sweep now
    Run,
}

/// Execute expiry commands
pub async fn execute(
    args: &ExpiryArgs,
    config: AppConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let expiring_soon_days = config.worker.expiring_soon_days;
    let state = super::build_state(config).await?;

    match &args.command {
        ExpiryCommand::Run => {
            let report = state.expiry_sweep.run().await.context("Expiry sweep failed")?;
            match format {
                OutputFormat::Json => output::print_json(&report),
                OutputFormat::Table => {
                    output::print_success(&report.summary(expiring_soon_days));
                }
            }
        }
    }

    Ok(())
}
