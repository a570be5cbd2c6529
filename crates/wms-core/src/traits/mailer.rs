//! Outbound mail delivery abstraction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// A fully rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
    /// Plain-text alternative.
    pub text: String,
}

/// A mail transport.
///
/// Implementations must be safe to share across request handlers.
#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug {
    /// Short name of the transport, used in logs.
    fn transport_name(&self) -> &'static str;

    /// Deliver a single message.
    async fn send(&self, message: &EmailMessage) -> AppResult<()>;
}
