//! Contract entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::ContractStatus;

/// A customer service agreement with a validity window.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contract {
    /// Unique contract identifier.
    pub id: Uuid,
    /// Human-facing contract number, unique.
    pub contract_number: String,
    /// Customer name.
    pub customer_name: String,
    /// Customer email, used for portal lookups.
    pub customer_email: String,
    /// Customer phone.
    pub customer_phone: Option<String>,
    /// Customer address.
    pub customer_address: Option<String>,
    /// First day the contract is in force.
    pub start_date: NaiveDate,
    /// Last day the contract is in force.
    pub end_date: NaiveDate,
    /// Lifecycle status.
    pub status: ContractStatus,
    /// Internal notes.
    pub notes: Option<String>,
    /// When the contract was created.
    pub created_at: DateTime<Utc>,
    /// When the contract was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Contract {
    /// Whether `day` lies inside the validity window.
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }

    /// Reduce to the summary embedded in serial payloads.
    pub fn summary(&self) -> ContractSummary {
        ContractSummary {
            id: self.id,
            contract_number: self.contract_number.clone(),
            customer_name: self.customer_name.clone(),
            customer_email: self.customer_email.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status,
        }
    }
}

/// Minimal contract view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ContractSummary {
    /// Contract ID.
    pub id: Uuid,
    /// Contract number.
    pub contract_number: String,
    /// Customer name.
    pub customer_name: String,
    /// Customer email.
    pub customer_email: String,
    /// Start date.
    pub start_date: NaiveDate,
    /// End date.
    pub end_date: NaiveDate,
    /// Status.
    pub status: ContractStatus,
}

/// Data required to create a contract (items are inserted separately).
#[derive(Debug, Clone)]
pub struct CreateContract {
    /// Contract number.
    pub contract_number: String,
    /// Customer name.
    pub customer_name: String,
    /// Lowercased customer email.
    pub customer_email: String,
    /// Customer phone.
    pub customer_phone: Option<String>,
    /// Customer address.
    pub customer_address: Option<String>,
    /// Start date.
    pub start_date: NaiveDate,
    /// End date.
    pub end_date: NaiveDate,
    /// Status.
    pub status: ContractStatus,
    /// Notes.
    pub notes: Option<String>,
}

/// Partial update of a contract's header fields.
#[derive(Debug, Clone, Default)]
pub struct UpdateContract {
    /// Contract number.
    pub contract_number: Option<String>,
    /// Customer name.
    pub customer_name: Option<String>,
    /// Customer email.
    pub customer_email: Option<String>,
    /// Customer phone.
    pub customer_phone: Option<String>,
    /// Customer address.
    pub customer_address: Option<String>,
    /// Start date.
    pub start_date: Option<NaiveDate>,
    /// End date.
    pub end_date: Option<NaiveDate>,
    /// Status.
    pub status: Option<ContractStatus>,
    /// Notes.
    pub notes: Option<String>,
}
