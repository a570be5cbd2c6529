//! Contract line items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use wms_core::AppError;

/// Largest accepted unit price, in the smallest currency unit.
pub const MAX_UNIT_PRICE: i64 = 1_000_000_000_000;

/// Largest accepted quantity on one line.
pub const MAX_QUANTITY: i32 = 1_000_000;

/// A product line on a contract.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContractItem {
    /// Unique item identifier.
    pub id: Uuid,
    /// Owning contract.
    pub contract_id: Uuid,
    /// Product covered by this line.
    pub product_id: Uuid,
    /// Number of units.
    pub quantity: i32,
    /// Unit price in the smallest currency unit.
    pub unit_price: i64,
    /// Line notes.
    pub notes: Option<String>,
    /// When the line was created.
    pub created_at: DateTime<Utc>,
}

/// A line item joined with its product name and model.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContractItemView {
    /// Item ID.
    pub id: Uuid,
    /// Product ID.
    pub product_id: Uuid,
    /// Product name.
    pub product_name: String,
    /// Product model.
    pub product_model: String,
    /// Units.
    pub quantity: i32,
    /// Unit price.
    pub unit_price: i64,
    /// Notes.
    pub notes: Option<String>,
}

impl ContractItemView {
    /// Quantity times unit price, `None` on overflow.
    pub fn line_total(&self) -> Option<i64> {
        i64::from(self.quantity).checked_mul(self.unit_price)
    }
}

/// A line item to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContractItem {
    /// Product.
    pub product_id: Uuid,
    /// Units.
    pub quantity: i32,
    /// Unit price.
    pub unit_price: i64,
    /// Notes.
    pub notes: Option<String>,
}

impl NewContractItem {
    /// Check quantity and price bounds. `position` is 1-based, for messages.
    pub fn check(&self, position: usize) -> Result<(), AppError> {
        if !(1..=MAX_QUANTITY).contains(&self.quantity) {
            return Err(AppError::validation(format!(
                "Item {position}: quantity must be between 1 and {MAX_QUANTITY}"
            )));
        }
        if !(0..=MAX_UNIT_PRICE).contains(&self.unit_price) {
            return Err(AppError::validation(format!(
                "Item {position}: unit price must be between 0 and {MAX_UNIT_PRICE}"
            )));
        }
        Ok(())
    }
}

/// Sum of all line totals, saturating at `i64::MAX`.
///
/// Stored rows predating the bounds may not fit; the total never wraps.
pub fn contract_total(items: &[ContractItemView]) -> i64 {
    items.iter().fold(0i64, |total, item| {
        item.line_total()
            .map_or(i64::MAX, |line| total.saturating_add(line))
    })
}

/// Checked total of lines about to be written.
pub fn checked_total(items: &[NewContractItem]) -> Result<i64, AppError> {
    items.iter().try_fold(0i64, |total, item| {
        i64::from(item.quantity)
            .checked_mul(item.unit_price)
            .and_then(|line| total.checked_add(line))
            .ok_or_else(|| AppError::validation("Contract total value is out of range"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: i32, unit_price: i64) -> ContractItemView {
        ContractItemView {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            product_name: "Air Conditioner".into(),
            product_model: "AC-9000".into(),
            quantity,
            unit_price,
            notes: None,
        }
    }

    #[test]
    fn totals_multiply_quantity_by_price() {
        let items = vec![line(2, 1_500_000), line(1, 250_000)];
        assert_eq!(items[0].line_total(), Some(3_000_000));
        assert_eq!(contract_total(&items), 3_250_000);
        assert_eq!(contract_total(&[]), 0);
    }

    #[test]
    fn huge_stored_prices_saturate_instead_of_wrapping() {
        let items = [line(2, i64::MAX / 2 + 1)];
        assert_eq!(items[0].line_total(), None);
        assert_eq!(contract_total(&items), i64::MAX);

        let items = [line(1, i64::MAX - 1), line(1, 5)];
        assert_eq!(contract_total(&items), i64::MAX);
    }

    fn new_item(quantity: i32, unit_price: i64) -> NewContractItem {
        NewContractItem {
            product_id: Uuid::new_v4(),
            quantity,
            unit_price,
            notes: None,
        }
    }

    #[test]
    fn item_bounds_are_enforced() {
        assert!(new_item(1, MAX_UNIT_PRICE).check(1).is_ok());
        assert!(new_item(MAX_QUANTITY, 0).check(1).is_ok());
        assert!(new_item(0, 10).check(1).is_err());
        assert!(new_item(MAX_QUANTITY + 1, 10).check(1).is_err());
        assert!(new_item(1, -1).check(1).is_err());
        let err = new_item(2, i64::MAX / 2 + 1).check(3).unwrap_err();
        assert_eq!(err.kind, wms_core::error::ErrorKind::Validation);
        assert!(err.message.starts_with("Item 3:"));
    }

    #[test]
    fn checked_total_rejects_overflow() {
        assert_eq!(checked_total(&[new_item(2, 500), new_item(3, 100)]).unwrap(), 1_300);
        assert_eq!(checked_total(&[]).unwrap(), 0);
        let err = checked_total(&[new_item(2, i64::MAX / 2 + 1)]).unwrap_err();
        assert_eq!(err.kind, wms_core::error::ErrorKind::Validation);
        let err = checked_total(&[new_item(1, i64::MAX), new_item(1, 1)]).unwrap_err();
        assert_eq!(err.kind, wms_core::error::ErrorKind::Validation);
    }
}
