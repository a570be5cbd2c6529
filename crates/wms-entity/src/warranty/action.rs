//! Warranty history action types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of event in a serial's warranty history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "warranty_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WarrantyAction {
    /// Serial registered and coverage computed.
    Registered,
    /// Coverage activated.
    Activated,
    /// Unit inspected.
    Inspection,
    /// Unit repaired.
    Repair,
    /// Unit or part replaced.
    Replacement,
    /// Warranty status changed by staff.
    StatusChanged,
    /// Coverage lapsed.
    Expired,
    /// Coverage revoked.
    Voided,
    /// Free-form note.
    Note,
}

impl WarrantyAction {
    /// All actions.
    pub const ALL: [WarrantyAction; 9] = [
        Self::Registered,
        Self::Activated,
        Self::Inspection,
        Self::Repair,
        Self::Replacement,
        Self::StatusChanged,
        Self::Expired,
        Self::Voided,
        Self::Note,
    ];

    /// Return the action as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Activated => "activated",
            Self::Inspection => "inspection",
            Self::Repair => "repair",
            Self::Replacement => "replacement",
            Self::StatusChanged => "status_changed",
            Self::Expired => "expired",
            Self::Voided => "voided",
            Self::Note => "note",
        }
    }
}

impl fmt::Display for WarrantyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WarrantyAction {
    type Err = wms_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                wms_core::AppError::validation(format!("Invalid warranty action: '{s}'"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for action in WarrantyAction::ALL {
            assert_eq!(action.as_str().parse::<WarrantyAction>().unwrap(), action);
        }
        assert!("fixed".parse::<WarrantyAction>().is_err());
    }
}
