//! Admin user management: listing, creation, updates, password resets and deletion.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use wms_auth::password::{PasswordHasher, PasswordValidator};
use wms_auth::rbac::{Permission, RbacEnforcer};
use wms_core::error::AppError;
use wms_core::types::pagination::{PageRequest, PageResponse};
use wms_database::repositories::{UserFilter, UserRepository};
use wms_entity::user::{CreateUser, UpdateUser, User, UserRole};

use super::normalize_email;
use crate::context::RequestContext;

/// Handles administrative user management.
#[derive(Debug, Clone)]
pub struct AdminUserService {
    user_repo: Arc<UserRepository>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
    rbac: Arc<RbacEnforcer>,
}

/// A new staff account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserInput {
    /// Login email.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Full name.
    pub full_name: String,
    /// Role; technician when omitted.
    pub role: Option<UserRole>,
    /// Active flag; active when omitted.
    pub is_active: Option<bool>,
}

/// Admin changes to a staff account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserInput {
    /// New email.
    pub email: Option<String>,
    /// New full name.
    pub full_name: Option<String>,
    /// New role.
    pub role: Option<UserRole>,
    /// New active flag.
    pub is_active: Option<bool>,
}

impl AdminUserService {
    /// Creates a new admin user service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            validator,
            rbac,
        }
    }

    /// Lists users, newest first.
    pub async fn list_users(
        &self,
        ctx: &RequestContext,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<PageResponse<User>, AppError> {
        self.rbac.require_permission(&ctx.role, Permission::UserManage)?;
        self.user_repo.find_all(filter, page).await
    }

    /// Gets a single user.
    pub async fn get_user(&self, ctx: &RequestContext, user_id: Uuid) -> Result<User, AppError> {
        self.rbac.require_permission(&ctx.role, Permission::UserManage)?;
        self.find(user_id).await
    }

    /// Creates a staff account on behalf of an admin.
    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        input: CreateUserInput,
    ) -> Result<User, AppError> {
        self.rbac.require_permission(&ctx.role, Permission::UserManage)?;
        let user = self.provision(input).await?;
        info!(admin_id = %ctx.user_id, user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    /// Creates a staff account without a caller, for seeding and the CLI.
    pub async fn provision(&self, input: CreateUserInput) -> Result<User, AppError> {
        let email = normalize_email(&input.email)?;
        let full_name = input.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(AppError::validation("Full name is required"));
        }

        self.validator
            .validate(&input.password, &[&email, &full_name])?;

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email already in use"));
        }

        let password_hash = self.hasher.hash_password(&input.password)?;
        self.user_repo
            .create(&CreateUser {
                email,
                password_hash,
                full_name,
                role: input.role.unwrap_or_default(),
                is_active: input.is_active.unwrap_or(true),
            })
            .await
    }

    /// Updates a staff account. Admins cannot deactivate themselves.
    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        input: UpdateUserInput,
    ) -> Result<User, AppError> {
        self.rbac.require_permission(&ctx.role, Permission::UserManage)?;

        if user_id == ctx.user_id && input.is_active == Some(false) {
            return Err(AppError::validation("You cannot deactivate your own account"));
        }
        if user_id == ctx.user_id && input.role.is_some_and(|role| !role.is_admin()) {
            return Err(AppError::validation("You cannot remove your own admin role"));
        }

        let full_name = match input.full_name {
            Some(name) if name.trim().is_empty() => {
                return Err(AppError::validation("Full name cannot be empty"));
            }
            other => other.map(|name| name.trim().to_string()),
        };

        let user = self
            .user_repo
            .update(
                user_id,
                &UpdateUser {
                    email: input.email.as_deref().map(normalize_email).transpose()?,
                    full_name,
                    role: input.role,
                    is_active: input.is_active,
                },
            )
            .await?;

        info!(admin_id = %ctx.user_id, user_id = %user_id, "User updated");
        Ok(user)
    }

    /// Activates or deactivates an account by email, for the CLI.
    pub async fn set_active(&self, email: &str, active: bool) -> Result<User, AppError> {
        let email = normalize_email(email)?;
        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {email} not found")))?;

        self.user_repo
            .update(
                user.id,
                &UpdateUser {
                    is_active: Some(active),
                    ..UpdateUser::default()
                },
            )
            .await
    }

    /// Sets a new password for a user on behalf of an admin.
    pub async fn reset_password(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        new_password: &str,
    ) -> Result<(), AppError> {
        self.rbac.require_permission(&ctx.role, Permission::UserManage)?;
        let user = self.find(user_id).await?;
        self.set_password(&user, new_password).await?;
        info!(admin_id = %ctx.user_id, user_id = %user_id, "Password reset by admin");
        Ok(())
    }

    /// Sets a new password for the user with `email`, for the CLI.
    pub async fn reset_password_by_email(&self, email: &str, new_password: &str) -> Result<User, AppError> {
        let email = normalize_email(email)?;
        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {email} not found")))?;
        self.set_password(&user, new_password).await?;
        Ok(user)
    }

    /// Deletes a staff account. Admins cannot delete themselves.
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: Uuid) -> Result<(), AppError> {
        self.rbac.require_permission(&ctx.role, Permission::UserManage)?;

        if user_id == ctx.user_id {
            return Err(AppError::validation("You cannot delete your own account"));
        }

        if !self.user_repo.delete(user_id).await? {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }

        info!(admin_id = %ctx.user_id, user_id = %user_id, "User deleted");
        Ok(())
    }

    /// Lists every user, for the CLI.
    pub async fn all_users(&self) -> Result<Vec<User>, AppError> {
        let mut page = PageRequest::new(1, 100);
        let mut users = Vec::new();
        loop {
            let batch = self.user_repo.find_all(&UserFilter::default(), page).await?;
            let last = page.page >= batch.total_pages;
            users.extend(batch.items);
            if last {
                return Ok(users);
            }
            page = PageRequest::new(page.page + 1, page.page_size);
        }
    }

    async fn find(&self, user_id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))
    }

    async fn set_password(&self, user: &User, new_password: &str) -> Result<(), AppError> {
        self.validator
            .validate(new_password, &[&user.email, &user.full_name])?;
        let hash = self.hasher.hash_password(new_password)?;
        self.user_repo.update_password(user.id, &hash).await
    }
}
