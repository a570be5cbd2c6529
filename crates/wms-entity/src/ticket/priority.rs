//! Ticket priority.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Urgency of a ticket.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    sqlx::Type,
)]
#[sqlx(type_name = "ticket_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    /// Low.
    Low,
    /// Medium.
    #[default]
    Medium,
    /// High.
    High,
    /// Urgent.
    Urgent,
}

impl TicketPriority {
    /// All priorities, lowest first.
    pub const ALL: [TicketPriority; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    /// Return the priority as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketPriority {
    type Err = wms_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                wms_core::AppError::validation(format!(
                    "Invalid ticket priority: '{s}'. Expected one of: low, medium, high, urgent"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_urgency() {
        assert!(TicketPriority::Urgent > TicketPriority::High);
        assert!(TicketPriority::Low < TicketPriority::Medium);
        assert_eq!(TicketPriority::default(), TicketPriority::Medium);
    }

    #[test]
    fn parse() {
        assert_eq!("HIGH".parse::<TicketPriority>().unwrap(), TicketPriority::High);
        assert!("critical".parse::<TicketPriority>().is_err());
    }
}
