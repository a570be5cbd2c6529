//! Ticket entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::priority::TicketPriority;
use super::status::TicketStatus;

/// A customer-reported issue, usually against a serial.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    /// Unique ticket identifier.
    pub id: Uuid,
    /// Human-facing ticket number, unique.
    pub ticket_number: String,
    /// Unit the issue was reported against.
    pub serial_id: Option<Uuid>,
    /// What the customer reported.
    pub issue_description: String,
    /// Urgency.
    pub priority: TicketPriority,
    /// Workflow status.
    pub status: TicketStatus,
    /// Reporting customer.
    pub customer_name: String,
    /// Customer email, required for notification emails.
    pub customer_email: Option<String>,
    /// Customer phone.
    pub customer_phone: Option<String>,
    /// Assigned technician.
    pub assigned_to: Option<Uuid>,
    /// Staff member who opened the ticket; `None` for portal requests.
    pub created_by: Option<Uuid>,
    /// When the ticket entered `resolved`.
    pub resolved_at: Option<DateTime<Utc>>,
    /// When the ticket entered `closed`.
    pub closed_at: Option<DateTime<Utc>>,
    /// When the ticket was created.
    pub created_at: DateTime<Utc>,
    /// When the ticket was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to open a ticket.
#[derive(Debug, Clone)]
pub struct CreateTicket {
    /// Ticket number.
    pub ticket_number: String,
    /// Serial.
    pub serial_id: Option<Uuid>,
    /// Issue description.
    pub issue_description: String,
    /// Priority.
    pub priority: TicketPriority,
    /// Customer name.
    pub customer_name: String,
    /// Customer email.
    pub customer_email: Option<String>,
    /// Customer phone.
    pub customer_phone: Option<String>,
    /// Assignee.
    pub assigned_to: Option<Uuid>,
    /// Creator.
    pub created_by: Option<Uuid>,
}

impl Ticket {
    /// Copy of this ticket's mutable fields, as a starting point for edits.
    pub fn editable(&self) -> TicketChanges {
        TicketChanges {
            issue_description: self.issue_description.clone(),
            priority: self.priority,
            status: self.status,
            customer_name: self.customer_name.clone(),
            customer_email: self.customer_email.clone(),
            customer_phone: self.customer_phone.clone(),
            assigned_to: self.assigned_to,
            resolved_at: self.resolved_at,
            closed_at: self.closed_at,
            base_updated_at: self.updated_at,
        }
    }
}

/// The complete set of mutable ticket fields written back on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketChanges {
    /// Issue description.
    pub issue_description: String,
    /// Priority.
    pub priority: TicketPriority,
    /// Status.
    pub status: TicketStatus,
    /// Customer name.
    pub customer_name: String,
    /// Customer email.
    pub customer_email: Option<String>,
    /// Customer phone.
    pub customer_phone: Option<String>,
    /// Assignee.
    pub assigned_to: Option<Uuid>,
    /// Resolution time.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Closing time.
    pub closed_at: Option<DateTime<Utc>>,
    /// `updated_at` of the row these values were derived from. The write is
    /// refused if the stored row has moved on since.
    pub base_updated_at: DateTime<Utc>,
}
