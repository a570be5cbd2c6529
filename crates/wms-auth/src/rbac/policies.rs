//! Role-to-permission mapping definitions.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use wms_entity::user::UserRole;

/// A staff operation guarded by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    // Everyone
    /// Read contracts, products, serials, tickets, history and the dashboard.
    RecordsRead,
    /// Open and edit tickets, change their status and assignee.
    TicketWrite,
    /// Comment on tickets.
    TicketComment,
    /// Record warranty service history.
    WarrantyHistoryWrite,
    /// Read and manage one's own notifications.
    NotificationOwn,

    // Managers
    /// Create, update and delete contracts.
    ContractManage,
    /// Create, update and delete products.
    ProductManage,
    /// Create, update and delete serials.
    SerialManage,
    /// Change a serial's warranty status.
    WarrantyStatusChange,
    /// Delete tickets.
    TicketDelete,
    /// Delete warranty history entries.
    WarrantyHistoryDelete,
    /// Send ticket emails to customers.
    CustomerEmailSend,
    /// Create notifications for other users or everyone.
    NotificationCreate,

    // Admins
    /// Manage staff accounts.
    UserManage,
}

impl Permission {
    /// Every permission.
    pub const ALL: [Permission; 14] = [
        Self::RecordsRead,
        Self::TicketWrite,
        Self::TicketComment,
        Self::WarrantyHistoryWrite,
        Self::NotificationOwn,
        Self::ContractManage,
        Self::ProductManage,
        Self::SerialManage,
        Self::WarrantyStatusChange,
        Self::TicketDelete,
        Self::WarrantyHistoryDelete,
        Self::CustomerEmailSend,
        Self::NotificationCreate,
        Self::UserManage,
    ];

    /// The least privileged role granted this permission by default.
    pub fn minimum_role(&self) -> UserRole {
        match self {
            Self::RecordsRead
            | Self::TicketWrite
            | Self::TicketComment
            | Self::WarrantyHistoryWrite
            | Self::NotificationOwn => UserRole::Technician,
            Self::ContractManage
            | Self::ProductManage
            | Self::SerialManage
            | Self::WarrantyStatusChange
            | Self::TicketDelete
            | Self::WarrantyHistoryDelete
            | Self::CustomerEmailSend
            | Self::NotificationCreate => UserRole::Manager,
            Self::UserManage => UserRole::Admin,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RecordsRead => "records_read",
            Self::TicketWrite => "ticket_write",
            Self::TicketComment => "ticket_comment",
            Self::WarrantyHistoryWrite => "warranty_history_write",
            Self::NotificationOwn => "notification_own",
            Self::ContractManage => "contract_manage",
            Self::ProductManage => "product_manage",
            Self::SerialManage => "serial_manage",
            Self::WarrantyStatusChange => "warranty_status_change",
            Self::TicketDelete => "ticket_delete",
            Self::WarrantyHistoryDelete => "warranty_history_delete",
            Self::CustomerEmailSend => "customer_email_send",
            Self::NotificationCreate => "notification_create",
            Self::UserManage => "user_manage",
        };
        f.write_str(name)
    }
}

/// Maps each role to its set of allowed permissions.
#[derive(Debug, Clone)]
pub struct RbacPolicies {
    policies: HashMap<UserRole, HashSet<Permission>>,
}

impl RbacPolicies {
    /// Creates the default policy set: each role holds every permission whose
    /// minimum role it meets.
    pub fn new() -> Self {
        let policies = [UserRole::Technician, UserRole::Manager, UserRole::Admin]
            .into_iter()
            .map(|role| {
                let granted = Permission::ALL
                    .into_iter()
                    .filter(|permission| role.has_at_least(&permission.minimum_role()))
                    .collect();
                (role, granted)
            })
            .collect();

        Self { policies }
    }

    /// Returns the set of permissions for the given role.
    pub fn permissions_for_role(&self, role: &UserRole) -> HashSet<Permission> {
        self.policies.get(role).cloned().unwrap_or_default()
    }

    /// Checks whether the given role has the specified permission.
    pub fn has_permission(&self, role: &UserRole, permission: Permission) -> bool {
        self.policies
            .get(role)
            .is_some_and(|granted| granted.contains(&permission))
    }
}

impl Default for RbacPolicies {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn technician_reads_and_works_tickets_only() {
        let policies = RbacPolicies::new();
        let tech = UserRole::Technician;
        assert!(policies.has_permission(&tech, Permission::RecordsRead));
        assert!(policies.has_permission(&tech, Permission::TicketWrite));
        assert!(policies.has_permission(&tech, Permission::WarrantyHistoryWrite));
        assert!(!policies.has_permission(&tech, Permission::ContractManage));
        assert!(!policies.has_permission(&tech, Permission::TicketDelete));
        assert!(!policies.has_permission(&tech, Permission::UserManage));
    }

    #[test]
    fn manager_cannot_manage_users() {
        let policies = RbacPolicies::new();
        assert!(policies.has_permission(&UserRole::Manager, Permission::CustomerEmailSend));
        assert!(!policies.has_permission(&UserRole::Manager, Permission::UserManage));
    }

    #[test]
    fn admin_has_everything() {
        let policies = RbacPolicies::new();
        assert_eq!(
            policies.permissions_for_role(&UserRole::Admin).len(),
            Permission::ALL.len()
        );
    }
}
