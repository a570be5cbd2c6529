//! Outbound email configuration.

use serde::{Deserialize, Serialize};

/// How outgoing mail is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmailTransport {
    /// Write messages to the log only.
    #[default]
    Log,
    /// POST messages to an HTTP mail relay.
    Http,
}

/// Email delivery and branding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// When false every message goes to the log transport.
    #[serde(default)]
    pub enabled: bool,
    /// Delivery transport.
    #[serde(default)]
    pub transport: EmailTransport,
    /// Relay endpoint for the HTTP transport.
    #[serde(default)]
    pub relay_url: Option<String>,
    /// Bearer token sent to the relay.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Sender address.
    #[serde(default = "default_from_address")]
    pub from_address: String,
    /// Sender display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Company name shown in templates.
    #[serde(default = "default_company")]
    pub company_name: String,
    /// Support mailbox shown in templates.
    #[serde(default = "default_support_email")]
    pub support_email: String,
    /// Support hotline shown in templates.
    #[serde(default = "default_hotline")]
    pub support_hotline: String,
    /// Relay request timeout.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            transport: EmailTransport::Log,
            relay_url: None,
            api_key: None,
            from_address: default_from_address(),
            from_name: default_from_name(),
            company_name: default_company(),
            support_email: default_support_email(),
            support_hotline: default_hotline(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_from_address() -> String {
    "no-reply@example.com".to_string()
}

fn default_from_name() -> String {
    "Warranty Service".to_string()
}

fn default_company() -> String {
    "WMS".to_string()
}

fn default_support_email() -> String {
    "support@example.com".to_string()
}

fn default_hotline() -> String {
    "1900 0000".to_string()
}

fn default_timeout() -> u64 {
    10
}
