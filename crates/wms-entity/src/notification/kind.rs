//! Notification kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of an in-app notification.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "notification_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// General information.
    #[default]
    Info,
    /// Something completed successfully.
    Success,
    /// Needs attention.
    Warning,
    /// Something failed.
    Error,
    /// Ticket events.
    Ticket,
    /// Warranty events.
    Warranty,
    /// Contract events.
    Contract,
}

impl NotificationKind {
    /// All kinds.
    pub const ALL: [NotificationKind; 7] = [
        Self::Info,
        Self::Success,
        Self::Warning,
        Self::Error,
        Self::Ticket,
        Self::Warranty,
        Self::Contract,
    ];

    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Ticket => "ticket",
            Self::Warranty => "warranty",
            Self::Contract => "contract",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = wms_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                wms_core::AppError::validation(format!("Invalid notification kind: '{s}'"))
            })
    }
}
