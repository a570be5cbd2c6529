//! Ticket comments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A staff comment on a ticket.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TicketComment {
    /// Comment ID.
    pub id: Uuid,
    /// Ticket.
    pub ticket_id: Uuid,
    /// Author.
    pub user_id: Option<Uuid>,
    /// Author name, filled by joined queries.
    #[sqlx(default)]
    pub author_name: Option<String>,
    /// Comment body.
    pub comment: String,
    /// Internal comments are never shown to customers.
    pub is_internal: bool,
    /// When the comment was written.
    pub created_at: DateTime<Utc>,
}
