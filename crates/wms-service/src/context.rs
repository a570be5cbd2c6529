//! Request context carrying the authenticated staff member.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wms_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Built from the verified JWT claims and passed into service methods so
/// that every operation knows who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The user's email at token issuance.
    pub email: String,
    /// The user's role at token issuance.
    pub role: UserRole,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: Uuid, email: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id,
            email: email.into(),
            role,
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Returns whether the current user is at least a manager.
    pub fn is_manager_or_above(&self) -> bool {
        self.role.has_at_least(&UserRole::Manager)
    }
}
