//! Serial entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::warranty::{WarrantyCheck, WarrantyStatus};

/// A tracked product unit with its own warranty window.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Serial {
    /// Unique serial identifier.
    pub id: Uuid,
    /// Manufacturer serial number, unique.
    pub serial_number: String,
    /// Product this unit belongs to.
    pub product_id: Uuid,
    /// Contract covering this unit.
    pub contract_id: Option<Uuid>,
    /// Date of manufacture.
    pub manufacture_date: Option<NaiveDate>,
    /// Date the customer bought the unit.
    pub purchase_date: Option<NaiveDate>,
    /// First day of warranty coverage.
    pub warranty_start_date: Option<NaiveDate>,
    /// Last day of warranty coverage.
    pub warranty_end_date: Option<NaiveDate>,
    /// Stored warranty status.
    pub warranty_status: WarrantyStatus,
    /// Internal notes.
    pub notes: Option<String>,
    /// When the serial was registered.
    pub created_at: DateTime<Utc>,
    /// When the serial was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Serial {
    /// Evaluate warranty coverage on `today`.
    pub fn warranty_on(&self, today: NaiveDate) -> WarrantyCheck {
        WarrantyCheck::evaluate(
            self.warranty_status,
            self.warranty_start_date,
            self.warranty_end_date,
            today,
        )
    }

    /// Reduce to the summary embedded in ticket payloads.
    pub fn summary(&self) -> SerialSummary {
        SerialSummary {
            id: self.id,
            serial_number: self.serial_number.clone(),
            product_id: self.product_id,
            warranty_status: self.warranty_status,
            warranty_end_date: self.warranty_end_date,
        }
    }
}

/// Minimal serial view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SerialSummary {
    /// Serial ID.
    pub id: Uuid,
    /// Serial number.
    pub serial_number: String,
    /// Product ID.
    pub product_id: Uuid,
    /// Stored warranty status.
    pub warranty_status: WarrantyStatus,
    /// Warranty end date.
    pub warranty_end_date: Option<NaiveDate>,
}

/// Data required to register a serial, with the warranty window resolved.
#[derive(Debug, Clone)]
pub struct CreateSerial {
    /// Serial number.
    pub serial_number: String,
    /// Product.
    pub product_id: Uuid,
    /// Contract.
    pub contract_id: Option<Uuid>,
    /// Manufacture date.
    pub manufacture_date: Option<NaiveDate>,
    /// Purchase date.
    pub purchase_date: Option<NaiveDate>,
    /// Warranty start.
    pub warranty_start_date: NaiveDate,
    /// Warranty end.
    pub warranty_end_date: NaiveDate,
    /// Initial status.
    pub warranty_status: WarrantyStatus,
    /// Notes.
    pub notes: Option<String>,
}

/// Full replacement of a serial's editable fields.
#[derive(Debug, Clone)]
pub struct UpdateSerial {
    /// Serial number.
    pub serial_number: String,
    /// Product.
    pub product_id: Uuid,
    /// Contract.
    pub contract_id: Option<Uuid>,
    /// Manufacture date.
    pub manufacture_date: Option<NaiveDate>,
    /// Purchase date.
    pub purchase_date: Option<NaiveDate>,
    /// Warranty start.
    pub warranty_start_date: Option<NaiveDate>,
    /// Warranty end.
    pub warranty_end_date: Option<NaiveDate>,
    /// Notes.
    pub notes: Option<String>,
}
