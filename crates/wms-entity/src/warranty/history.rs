//! Warranty history entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::action::WarrantyAction;

/// A service or status event on a serial's warranty.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WarrantyHistory {
    /// Entry ID.
    pub id: Uuid,
    /// Serial this entry belongs to.
    pub serial_id: Uuid,
    /// Kind of event.
    pub action: WarrantyAction,
    /// Description.
    pub description: String,
    /// Cost of the work in the smallest currency unit.
    pub cost: Option<i64>,
    /// Staff member; `None` for system events.
    pub performed_by: Option<Uuid>,
    /// When the work was done.
    pub performed_at: DateTime<Utc>,
    /// When the entry was recorded.
    pub created_at: DateTime<Utc>,
}

/// Data required to record a warranty event.
#[derive(Debug, Clone)]
pub struct CreateWarrantyHistory {
    /// Serial.
    pub serial_id: Uuid,
    /// Kind of event.
    pub action: WarrantyAction,
    /// Description.
    pub description: String,
    /// Cost.
    pub cost: Option<i64>,
    /// Staff member.
    pub performed_by: Option<Uuid>,
    /// When the work was done; defaults to now.
    pub performed_at: Option<DateTime<Utc>>,
}

/// Partial update of a warranty event.
#[derive(Debug, Clone, Default)]
pub struct UpdateWarrantyHistory {
    /// Kind of event.
    pub action: Option<WarrantyAction>,
    /// Description.
    pub description: Option<String>,
    /// Cost.
    pub cost: Option<i64>,
    /// When the work was done.
    pub performed_at: Option<DateTime<Utc>>,
}
