//! Warranty status and coverage window arithmetic.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use wms_core::AppError;

/// Stored warranty status of a serial.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "warranty_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WarrantyStatus {
    /// Covered.
    #[default]
    Active,
    /// Coverage window has ended.
    Expired,
    /// Coverage revoked (tampering, misuse, ...).
    Voided,
}

impl WarrantyStatus {
    /// All statuses.
    pub const ALL: [WarrantyStatus; 3] = [Self::Active, Self::Expired, Self::Voided];

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Voided => "voided",
        }
    }
}

impl fmt::Display for WarrantyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WarrantyStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                AppError::validation(format!(
                    "Invalid warranty status: '{s}'. Expected one of: active, expired, voided"
                ))
            })
    }
}

/// A resolved warranty coverage window (both ends inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarrantyWindow {
    /// First covered day.
    pub start: NaiveDate,
    /// Last covered day.
    pub end: NaiveDate,
}

impl WarrantyWindow {
    /// Resolve the window for a serial.
    ///
    /// The start falls back from the explicit value to the purchase date, the
    /// contract start and finally `today`. A missing end is the start plus
    /// `warranty_months` calendar months, clamped to the last day of the
    /// target month.
    pub fn resolve(
        explicit_start: Option<NaiveDate>,
        explicit_end: Option<NaiveDate>,
        purchase_date: Option<NaiveDate>,
        contract_start: Option<NaiveDate>,
        warranty_months: i32,
        today: NaiveDate,
    ) -> Result<Self, AppError> {
        let start = explicit_start
            .or(purchase_date)
            .or(contract_start)
            .unwrap_or(today);

        let end = match explicit_end {
            Some(end) => end,
            None => add_months(start, warranty_months)?,
        };

        if end < start {
            return Err(AppError::validation(format!(
                "Warranty end date {end} is before start date {start}"
            )));
        }

        Ok(Self { start, end })
    }
}

/// Add calendar months to a date, clamping to the end of the month.
pub fn add_months(date: NaiveDate, months: i32) -> Result<NaiveDate, AppError> {
    let months = u32::try_from(months)
        .map_err(|_| AppError::validation("Warranty months must not be negative"))?;
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| AppError::validation("Warranty end date is out of range"))
}

/// Result of a warranty coverage check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarrantyCheck {
    /// Whether the unit is covered today.
    pub is_valid: bool,
    /// Effective status: an active warranty past its end date reads as expired.
    pub status: WarrantyStatus,
    /// First covered day.
    pub start_date: Option<NaiveDate>,
    /// Last covered day.
    pub end_date: Option<NaiveDate>,
    /// Whole days of coverage left after today; zero when not valid.
    pub days_remaining: i64,
}

impl WarrantyCheck {
    /// Evaluate coverage for the stored status and window on `today`.
    pub fn evaluate(
        stored: WarrantyStatus,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        let lapsed = end_date.is_some_and(|end| today > end);
        let status = if stored == WarrantyStatus::Active && lapsed {
            WarrantyStatus::Expired
        } else {
            stored
        };

        let is_valid = status == WarrantyStatus::Active && !lapsed;

        let days_remaining = match end_date {
            Some(end) if is_valid => (end - today).num_days(),
            _ => 0,
        };

        Self {
            is_valid,
            status,
            start_date,
            end_date,
            days_remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn resolve_prefers_explicit_then_purchase_then_contract() {
        let today = d(2024, 6, 1);
        let w = WarrantyWindow::resolve(
            Some(d(2024, 1, 10)),
            None,
            Some(d(2023, 12, 1)),
            None,
            12,
            today,
        )
        .unwrap();
        assert_eq!(w.start, d(2024, 1, 10));
        assert_eq!(w.end, d(2025, 1, 10));

        let w = WarrantyWindow::resolve(None, None, Some(d(2023, 12, 1)), Some(d(2023, 1, 1)), 6, today)
            .unwrap();
        assert_eq!(w.start, d(2023, 12, 1));
        assert_eq!(w.end, d(2024, 6, 1));

        let w = WarrantyWindow::resolve(None, None, None, Some(d(2023, 1, 1)), 24, today).unwrap();
        assert_eq!(w.start, d(2023, 1, 1));
        assert_eq!(w.end, d(2025, 1, 1));

        let w = WarrantyWindow::resolve(None, None, None, None, 1, today).unwrap();
        assert_eq!(w.start, today);
        assert_eq!(w.end, d(2024, 7, 1));
    }

    #[test]
    fn month_addition_clamps_to_month_end() {
        assert_eq!(add_months(d(2024, 1, 31), 1).unwrap(), d(2024, 2, 29));
        assert_eq!(add_months(d(2023, 1, 31), 1).unwrap(), d(2023, 2, 28));
        assert_eq!(add_months(d(2024, 8, 31), 1).unwrap(), d(2024, 9, 30));
        assert!(add_months(d(2024, 1, 1), -1).is_err());
    }

    #[test]
    fn resolve_rejects_inverted_window() {
        let err = WarrantyWindow::resolve(
            Some(d(2024, 5, 1)),
            Some(d(2024, 4, 1)),
            None,
            None,
            12,
            d(2024, 6, 1),
        )
        .unwrap_err();
        assert_eq!(err.kind, wms_core::error::ErrorKind::Validation);
    }

    #[test]
    fn active_warranty_within_window_is_valid() {
        let check = WarrantyCheck::evaluate(
            WarrantyStatus::Active,
            Some(d(2024, 1, 1)),
            Some(d(2024, 12, 31)),
            d(2024, 12, 1),
        );
        assert!(check.is_valid);
        assert_eq!(check.status, WarrantyStatus::Active);
        assert_eq!(check.days_remaining, 30);
    }

    #[test]
    fn last_day_is_still_covered() {
        let check = WarrantyCheck::evaluate(
            WarrantyStatus::Active,
            Some(d(2024, 1, 1)),
            Some(d(2024, 12, 31)),
            d(2024, 12, 31),
        );
        assert!(check.is_valid);
        assert_eq!(check.days_remaining, 0);
    }

    #[test]
    fn active_warranty_past_end_reads_as_expired() {
        let check = WarrantyCheck::evaluate(
            WarrantyStatus::Active,
            Some(d(2023, 1, 1)),
            Some(d(2023, 12, 31)),
            d(2024, 1, 1),
        );
        assert!(!check.is_valid);
        assert_eq!(check.status, WarrantyStatus::Expired);
        assert_eq!(check.days_remaining, 0);
    }

    #[test]
    fn voided_warranty_is_never_valid() {
        let check = WarrantyCheck::evaluate(
            WarrantyStatus::Voided,
            Some(d(2024, 1, 1)),
            Some(d(2030, 1, 1)),
            d(2024, 6, 1),
        );
        assert!(!check.is_valid);
        assert_eq!(check.status, WarrantyStatus::Voided);
    }

    #[test]
    fn future_start_is_valid_until_end() {
        let check = WarrantyCheck::evaluate(
            WarrantyStatus::Active,
            Some(d(2024, 7, 1)),
            Some(d(2025, 7, 1)),
            d(2024, 6, 1),
        );
        assert!(check.is_valid);
        assert_eq!(check.status, WarrantyStatus::Active);
        assert_eq!(check.days_remaining, 395);
    }
}
