//! Contract lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a service contract.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "contract_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    /// Being prepared, not yet in force.
    Draft,
    /// In force.
    #[default]
    Active,
    /// Validity window has passed.
    Expired,
    /// Terminated before its end date.
    Cancelled,
}

impl ContractStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [ContractStatus; 4] = [
        Self::Draft,
        Self::Active,
        Self::Expired,
        Self::Cancelled,
    ];

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractStatus {
    type Err = wms_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                wms_core::AppError::validation(format!(
                    "Invalid contract status: '{s}'. Expected one of: draft, active, expired, cancelled"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(
            "ACTIVE".parse::<ContractStatus>().unwrap(),
            ContractStatus::Active
        );
        assert_eq!(
            "cancelled".parse::<ContractStatus>().unwrap(),
            ContractStatus::Cancelled
        );
        assert!("void".parse::<ContractStatus>().is_err());
    }
}
