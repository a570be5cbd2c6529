//! Ticket audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Kind of change recorded in a ticket's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ticket_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketAction {
    /// Ticket opened.
    Created,
    /// Technician assigned or work started.
    Assigned,
    /// Generic status move.
    StatusChanged,
    /// Priority changed.
    PriorityChanged,
    /// Moved to resolved.
    Resolved,
    /// Moved to closed.
    Closed,
    /// Moved back to an open status from resolved/closed.
    Reopened,
    /// Customer notified by email.
    EmailSent,
    /// Other field edits.
    Updated,
}

impl TicketAction {
    /// All actions.
    pub const ALL: [TicketAction; 9] = [
        Self::Created,
        Self::Assigned,
        Self::StatusChanged,
        Self::PriorityChanged,
        Self::Resolved,
        Self::Closed,
        Self::Reopened,
        Self::EmailSent,
        Self::Updated,
    ];

    /// Return the action as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Assigned => "assigned",
            Self::StatusChanged => "status_changed",
            Self::PriorityChanged => "priority_changed",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
            Self::Reopened => "reopened",
            Self::EmailSent => "email_sent",
            Self::Updated => "updated",
        }
    }
}

impl fmt::Display for TicketAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketAction {
    type Err = wms_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| wms_core::AppError::validation(format!("Invalid ticket action: '{s}'")))
    }
}

/// One entry in a ticket's history.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TicketHistory {
    /// Entry ID.
    pub id: Uuid,
    /// Ticket this entry belongs to.
    pub ticket_id: Uuid,
    /// Kind of change.
    pub action: TicketAction,
    /// Human-readable description.
    pub description: String,
    /// Value before the change.
    pub old_value: Option<String>,
    /// Value after the change.
    pub new_value: Option<String>,
    /// Staff member who made the change; `None` for portal or system actions.
    pub performed_by: Option<Uuid>,
    /// Name of the performer, filled by joined queries.
    #[sqlx(default)]
    pub performed_by_name: Option<String>,
    /// When the change happened.
    pub created_at: DateTime<Utc>,
}

/// A history entry that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicketHistory {
    /// Kind of change.
    pub action: TicketAction,
    /// Description.
    pub description: String,
    /// Old value.
    pub old_value: Option<String>,
    /// New value.
    pub new_value: Option<String>,
}

impl NewTicketHistory {
    /// Entry without before/after values.
    pub fn new(action: TicketAction, description: impl Into<String>) -> Self {
        Self {
            action,
            description: description.into(),
            old_value: None,
            new_value: None,
        }
    }

    /// Attach before/after values.
    pub fn with_values(mut self, old: impl Into<String>, new: impl Into<String>) -> Self {
        self.old_value = Some(old.into());
        self.new_value = Some(new.into());
        self
    }
}
