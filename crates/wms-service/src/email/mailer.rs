//! Mail transports implementing [`Mailer`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use wms_core::config::email::{EmailConfig, EmailTransport};
use wms_core::error::{AppError, ErrorKind};
use wms_core::result::AppResult;
use wms_core::traits::mailer::{EmailMessage, Mailer};

/// Writes messages to the log instead of delivering them.
#[derive(Debug, Clone)]
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    /// Create a log transport that reports `from` as the sender.
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    fn transport_name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        info!(
            from = %self.from,
            to = %message.to,
            subject = %message.subject,
            html_bytes = message.html.len(),
            "Email written to log transport"
        );
        debug!(body = %message.text, "Email text body");
        Ok(())
    }
}

/// Delivers messages by POSTing them to an HTTP mail relay.
#[derive(Debug, Clone)]
pub struct HttpRelayMailer {
    client: reqwest::Client,
    relay_url: String,
    api_key: Option<String>,
    from: String,
}

#[derive(Serialize)]
struct RelayPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

impl HttpRelayMailer {
    /// Build the relay transport. A missing relay URL is a configuration error.
    pub fn new(config: &EmailConfig) -> AppResult<Self> {
        let relay_url = config
            .relay_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| AppError::configuration("email.relay_url is required for the http transport"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build mail relay client", e)
            })?;

        Ok(Self {
            client,
            relay_url,
            api_key: config.api_key.clone(),
            from: sender(config),
        })
    }
}

#[async_trait]
impl Mailer for HttpRelayMailer {
    fn transport_name(&self) -> &'static str {
        "http"
    }

    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        let payload = RelayPayload {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            html: &message.html,
            text: &message.text,
        };

        let mut request = self.client.post(&self.relay_url).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Mail relay request failed", e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::external(format!(
                "Mail relay rejected message with status {status}: {body}"
            )));
        }

        info!(to = %message.to, subject = %message.subject, "Email sent through relay");
        Ok(())
    }
}

/// `Name <address>` sender string.
fn sender(config: &EmailConfig) -> String {
    format!("{} <{}>", config.from_name, config.from_address)
}

/// Pick the transport for the configuration. Disabled email always logs.
pub fn build_mailer(config: &EmailConfig) -> AppResult<Arc<dyn Mailer>> {
    if !config.enabled {
        return Ok(Arc::new(LogMailer::new(sender(config))));
    }

    match config.transport {
        EmailTransport::Log => Ok(Arc::new(LogMailer::new(sender(config)))),
        EmailTransport::Http => Ok(Arc::new(HttpRelayMailer::new(config)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_email_uses_log_transport() {
        let config = EmailConfig {
            enabled: false,
            transport: EmailTransport::Http,
            ..EmailConfig::default()
        };
        assert_eq!(build_mailer(&config).unwrap().transport_name(), "log");
    }

    #[test]
    fn http_transport_requires_relay_url() {
        let config = EmailConfig {
            enabled: true,
            transport: EmailTransport::Http,
            relay_url: None,
            ..EmailConfig::default()
        };
        let err = build_mailer(&config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);

        let config = EmailConfig {
            relay_url: Some("http://localhost:8025/send".into()),
            ..config
        };
        assert_eq!(build_mailer(&config).unwrap().transport_name(), "http");
    }

    #[tokio::test]
    async fn log_mailer_accepts_messages() {
        let mailer = LogMailer::new("WMS <no-reply@example.com>");
        let message = EmailMessage {
            to: "customer@example.com".into(),
            subject: "Hello".into(),
            html: "<p>Hi</p>".into(),
            text: "Hi".into(),
        };
        assert!(mailer.send(&message).await.is_ok());
    }
}
