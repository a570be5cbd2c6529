//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Staff roles, ordered by privilege level: Admin > Manager > Technician.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full system administrator, manages staff accounts.
    Admin,
    /// Manages contracts, products, serials and customer communication.
    Manager,
    /// Works tickets and records warranty service.
    #[default]
    Technician,
}

impl UserRole {
    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::Admin => 3,
            Self::Manager => 2,
            Self::Technician => 1,
        }
    }

    /// Check if this role has at least the given role's privileges.
    pub fn has_at_least(&self, other: &UserRole) -> bool {
        self.privilege_level() >= other.privilege_level()
    }

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Technician => "technician",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = wms_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "technician" => Ok(Self::Technician),
            _ => Err(wms_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: admin, manager, technician"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privilege_ordering() {
        assert!(UserRole::Admin.has_at_least(&UserRole::Technician));
        assert!(UserRole::Manager.has_at_least(&UserRole::Manager));
        assert!(!UserRole::Technician.has_at_least(&UserRole::Manager));
        assert!(!UserRole::Manager.has_at_least(&UserRole::Admin));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!(
            " Technician ".parse::<UserRole>().unwrap(),
            UserRole::Technician
        );
        assert!("viewer".parse::<UserRole>().is_err());
    }

    #[test]
    fn default_role_is_technician() {
        assert_eq!(UserRole::default(), UserRole::Technician);
    }
}
