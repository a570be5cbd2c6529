//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Scheduled maintenance job configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the scheduler starts with the server.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron expression (with seconds) for the warranty expiry sweep.
    #[serde(default = "default_expiry_cron")]
    pub expiry_cron: String,
    /// Contracts ending within this many days are reported as expiring soon.
    #[serde(default = "default_expiring_soon")]
    pub expiring_soon_days: u32,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            expiry_cron: default_expiry_cron(),
            expiring_soon_days: default_expiring_soon(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_expiry_cron() -> String {
    "0 0 1 * * *".to_string()
}

fn default_expiring_soon() -> u32 {
    30
}
