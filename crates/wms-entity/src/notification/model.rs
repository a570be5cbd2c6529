//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::NotificationKind;

/// An in-app notification for one staff member, or a broadcast to all.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Notification ID.
    pub id: Uuid,
    /// Recipient; `None` means every staff member sees it.
    pub user_id: Option<Uuid>,
    /// Category.
    pub kind: NotificationKind,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Related ticket.
    pub ticket_id: Option<Uuid>,
    /// Read flag.
    pub is_read: bool,
    /// When it was read.
    pub read_at: Option<DateTime<Utc>>,
    /// When it was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Whether this notification is a broadcast.
    pub fn is_broadcast(&self) -> bool {
        self.user_id.is_none()
    }

    /// Whether `user_id` may see this notification.
    pub fn is_visible_to(&self, user_id: Uuid) -> bool {
        self.user_id.is_none_or(|owner| owner == user_id)
    }
}

/// Data required to create a notification.
#[derive(Debug, Clone)]
pub struct CreateNotification {
    /// Recipient; `None` broadcasts.
    pub user_id: Option<Uuid>,
    /// Category.
    pub kind: NotificationKind,
    /// Title.
    pub title: String,
    /// Message.
    pub message: String,
    /// Related ticket.
    pub ticket_id: Option<Uuid>,
}

impl CreateNotification {
    /// Broadcast to every staff member.
    pub fn broadcast(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user_id: None,
            kind,
            title: title.into(),
            message: message.into(),
            ticket_id: None,
        }
    }

    /// Addressed to a single user.
    pub fn to_user(
        user_id: Uuid,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::broadcast(kind, title, message)
        }
    }

    /// Link to a ticket.
    pub fn for_ticket(mut self, ticket_id: Uuid) -> Self {
        self.ticket_id = Some(ticket_id);
        self
    }
}

/// Partial update of a notification.
#[derive(Debug, Clone, Default)]
pub struct UpdateNotification {
    /// Category.
    pub kind: Option<NotificationKind>,
    /// Title.
    pub title: Option<String>,
    /// Message.
    pub message: Option<String>,
}
