//! Ticket workflow status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use wms_core::AppError;

use super::history::TicketAction;

/// Workflow status of a ticket.
///
/// The normal path is `new → received → in_progress → resolved → closed`.
/// Open tickets may jump to any status; a closed ticket can only be
/// reopened to `new`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "ticket_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Just reported.
    #[default]
    New,
    /// Acknowledged, unit received for inspection.
    Received,
    /// A technician is working on it.
    InProgress,
    /// Fixed, awaiting closure.
    Resolved,
    /// Finished.
    Closed,
}

impl TicketStatus {
    /// All statuses, in workflow order.
    pub const ALL: [TicketStatus; 5] = [
        Self::New,
        Self::Received,
        Self::InProgress,
        Self::Resolved,
        Self::Closed,
    ];

    /// Return the status as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Received => "received",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    /// Human label used in emails and history descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Received => "Received",
            Self::InProgress => "In progress",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
        }
    }

    /// Still waiting on work.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::New | Self::Received | Self::InProgress)
    }

    /// Work is finished.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }

    /// Check a move from `self` to `target`.
    pub fn ensure_transition(&self, target: TicketStatus) -> Result<(), AppError> {
        if *self == Self::Closed && !matches!(target, Self::Closed | Self::New) {
            return Err(AppError::validation(format!(
                "A closed ticket can only be reopened to 'new', not moved to '{target}'"
            )));
        }
        Ok(())
    }

    /// The history action recorded for a move from `self` to `target`.
    pub fn transition_action(&self, target: TicketStatus) -> TicketAction {
        match target {
            Self::InProgress => TicketAction::Assigned,
            Self::Resolved => TicketAction::Resolved,
            Self::Closed => TicketAction::Closed,
            Self::New | Self::Received if self.is_completed() => TicketAction::Reopened,
            _ => TicketAction::StatusChanged,
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| {
                AppError::validation(format!(
                    "Invalid ticket status: '{s}'. Expected one of: new, received, in_progress, resolved, closed"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_hyphenated_form() {
        assert_eq!(
            "in-progress".parse::<TicketStatus>().unwrap(),
            TicketStatus::InProgress
        );
        assert_eq!(
            "IN_PROGRESS".parse::<TicketStatus>().unwrap(),
            TicketStatus::InProgress
        );
        assert!("open".parse::<TicketStatus>().is_err());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&TicketStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn open_and_completed_partition_statuses() {
        for status in TicketStatus::ALL {
            assert_ne!(status.is_open(), status.is_completed());
        }
    }

    #[test]
    fn closed_tickets_only_reopen_to_new() {
        assert!(TicketStatus::Closed.ensure_transition(TicketStatus::New).is_ok());
        assert!(
            TicketStatus::Closed
                .ensure_transition(TicketStatus::InProgress)
                .is_err()
        );
        assert!(
            TicketStatus::Resolved
                .ensure_transition(TicketStatus::InProgress)
                .is_ok()
        );
        assert!(TicketStatus::New.ensure_transition(TicketStatus::Closed).is_ok());
    }

    #[test]
    fn transition_actions() {
        use TicketStatus::*;
        assert_eq!(New.transition_action(InProgress), TicketAction::Assigned);
        assert_eq!(InProgress.transition_action(Resolved), TicketAction::Resolved);
        assert_eq!(Resolved.transition_action(Closed), TicketAction::Closed);
        assert_eq!(Closed.transition_action(New), TicketAction::Reopened);
        assert_eq!(Resolved.transition_action(Received), TicketAction::Reopened);
        assert_eq!(New.transition_action(Received), TicketAction::StatusChanged);
    }
}
