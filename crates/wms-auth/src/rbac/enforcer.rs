//! RBAC enforcement: checks whether a role holds a required permission.

use wms_core::error::AppError;
use wms_entity::user::UserRole;

use super::policies::{Permission, RbacPolicies};

/// Enforces role-based access control for staff operations.
#[derive(Debug, Clone, Default)]
pub struct RbacEnforcer {
    policies: RbacPolicies,
}

impl RbacEnforcer {
    /// Creates a new enforcer with the default policy set.
    pub fn new() -> Self {
        Self {
            policies: RbacPolicies::new(),
        }
    }

    /// Creates an enforcer with custom policies.
    pub fn with_policies(policies: RbacPolicies) -> Self {
        Self { policies }
    }

    /// Returns `Err(Forbidden)` unless the role holds the permission.
    pub fn require_permission(&self, role: &UserRole, permission: Permission) -> Result<(), AppError> {
        if self.policies.has_permission(role, permission) {
            Ok(())
        } else {
            tracing::debug!(role = %role, permission = %permission, "Permission denied");
            Err(AppError::forbidden(format!(
                "Role '{role}' does not have permission '{permission}'"
            )))
        }
    }

    /// Checks whether the role holds the permission.
    pub fn has_permission(&self, role: &UserRole, permission: Permission) -> bool {
        self.policies.has_permission(role, permission)
    }

    /// Returns `Err(Forbidden)` unless the role is at least `minimum`.
    pub fn require_minimum_role(&self, actual: &UserRole, minimum: &UserRole) -> Result<(), AppError> {
        if actual.has_at_least(minimum) {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "Role '{actual}' is insufficient; minimum required: '{minimum}'"
            )))
        }
    }

    /// Returns a reference to the underlying policies.
    pub fn policies(&self) -> &RbacPolicies {
        &self.policies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wms_core::error::ErrorKind;

    #[test]
    fn denial_is_forbidden() {
        let enforcer = RbacEnforcer::new();
        let err = enforcer
            .require_permission(&UserRole::Technician, Permission::SerialManage)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert!(err.message.contains("serial_manage"));
    }

    #[test]
    fn minimum_role_follows_hierarchy() {
        let enforcer = RbacEnforcer::new();
        assert!(enforcer
            .require_minimum_role(&UserRole::Admin, &UserRole::Manager)
            .is_ok());
        assert!(enforcer
            .require_minimum_role(&UserRole::Technician, &UserRole::Manager)
            .is_err());
    }
}
