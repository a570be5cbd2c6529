//! Warranty lookup commands.

use anyhow::Context;
use clap::{Args, Subcommand};

use wms_core::config::AppConfig;

use crate::output::{self, OutputFormat};

/// Arguments for warranty commands
#[derive(Debug, Args)]
pub struct WarrantyArgs {
    #[command(subcommand)]
    pub command: WarrantyCommand,
}

/// Warranty subcommands
#[derive(Debug, Subcommand)]
pub enum WarrantyCommand {
    /// Check coverage of a serial number
    Check {
        /// Serial number
        serial: String,
    },
}

/// Execute warranty commands
pub async fn execute(
    args: &WarrantyArgs,
    config: AppConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let state = super::build_state(config).await?;

    match &args.command {
        WarrantyCommand::Check { serial } => {
            let lookup = state
                .serial_service
                .check_warranty(serial)
                .await
                .with_context(|| format!("Warranty check for {serial} failed"))?;

            if format == OutputFormat::Json {
                output::print_json(&lookup);
                return Ok(());
            }

            let w = &lookup.warranty;
            output::print_heading(&format!("Warranty for {}", lookup.serial_number));
            output::print_kv(
                "Product",
                &format!("{} ({})", lookup.product.name, lookup.product.model),
            );
            output::print_kv("Customer", &output::or_dash(lookup.customer_name.as_deref()));
            output::print_kv("Status", w.status.as_str());
            output::print_kv("Covered", if w.is_valid { "yes" } else { "no" });
            output::print_kv("Start", &output::or_dash(w.start_date));
            output::print_kv("End", &output::or_dash(w.end_date));
            output::print_kv("Days remaining", &w.days_remaining.to_string());
        }
    }

    Ok(())
}
