//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;

/// A staff account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Login email, stored lowercased.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Full display name.
    pub full_name: String,
    /// Staff role.
    pub role: UserRole,
    /// Inactive accounts cannot log in or be assigned tickets.
    pub is_active: bool,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if this user has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Reduce to the public summary embedded in other payloads.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            role: self.role,
        }
    }
}

/// Minimal user view embedded in tickets and login responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserSummary {
    /// User ID.
    pub id: Uuid,
    /// Email.
    pub email: String,
    /// Full name.
    pub full_name: String,
    /// Role.
    pub role: UserRole,
}

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Lowercased email.
    pub email: String,
    /// Pre-computed Argon2 hash.
    pub password_hash: String,
    /// Full name.
    pub full_name: String,
    /// Role.
    pub role: UserRole,
    /// Active flag.
    pub is_active: bool,
}

/// Partial update of a user's fields; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    /// New email.
    pub email: Option<String>,
    /// New full name.
    pub full_name: Option<String>,
    /// New role.
    pub role: Option<UserRole>,
    /// New active flag.
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_serialized() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: "tech@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            full_name: "Field Tech".into(),
            role: UserRole::Technician,
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "technician");
    }
}
