//! CLI command definitions and dispatch.

pub mod expiry;
pub mod migrate;
pub mod seed;
pub mod user;
pub mod warranty;

use anyhow::Context;
use clap::{Parser, Subcommand};

use wms_api::AppState;
use wms_core::config::AppConfig;
use wms_database::connection::{DatabasePool, mask_password};

use crate::output::OutputFormat;

/// Warranty management system operator tool
#[derive(Debug, Parser)]
#[command(name = "wms", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (selects `config/{env}.toml`)
    #[arg(short, long, env = "WMS_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Staff account management
    User(user::UserArgs),
    /// Create the default admin and manager accounts
    Seed(seed::SeedArgs),
    /// Warranty lookups
    Warranty(warranty::WarrantyArgs),
    /// Warranty and contract expiry
    Expiry(expiry::ExpiryArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> anyhow::Result<()> {
        let config = AppConfig::load(&self.env).context("Failed to load configuration")?;

        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &config, self.format).await,
            Commands::User(args) => user::execute(args, config, self.format).await,
            Commands::Seed(args) => seed::execute(args, config).await,
            Commands::Warranty(args) => warranty::execute(args, config, self.format).await,
            Commands::Expiry(args) => expiry::execute(args, config, self.format).await,
        }
    }
}

/// Helper: connect to the configured database
pub async fn connect(config: &AppConfig) -> anyhow::Result<DatabasePool> {
    tracing::debug!("Connecting to {}", mask_password(&config.database.url));
    DatabasePool::connect(&config.database)
        .await
        .context("Failed to connect to database")
}

/// Helper: connect and wire the full service graph
pub async fn build_state(config: AppConfig) -> anyhow::Result<AppState> {
    let pool = connect(&config).await?;
    AppState::build(config, pool.into_pool()).context("Failed to initialize services")
}
