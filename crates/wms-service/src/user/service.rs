//! Login and self-service profile operations.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use wms_auth::jwt::JwtEncoder;
use wms_auth::password::{PasswordHasher, PasswordValidator};
use wms_core::error::AppError;
use wms_database::repositories::UserRepository;
use wms_entity::user::{UpdateUser, User, UserSummary};

use super::normalize_email;
use crate::context::RequestContext;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Handles login and the current user's own account.
#[derive(Debug, Clone)]
pub struct UserService {
    user_repo: Arc<UserRepository>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
    encoder: Arc<JwtEncoder>,
}

/// Successful login payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed access token.
    pub token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Token expiry.
    pub expires_at: DateTime<Utc>,
    /// The logged-in user.
    pub user: UserSummary,
}

/// Changes to the current user's own profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileInput {
    /// New full name.
    pub full_name: Option<String>,
    /// New login email.
    pub email: Option<String>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        encoder: Arc<JwtEncoder>,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            validator,
            encoder,
        }
    }

    /// Verify credentials and issue an access token.
    ///
    /// Unknown emails, inactive accounts and wrong passwords all fail with
    /// the same `Unauthorized` message.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AppError> {
        let email = email.trim().to_lowercase();

        let user = match self.user_repo.find_by_email(&email).await? {
            Some(user) if user.is_active => user,
            Some(_) => {
                warn!(email = %email, "Login attempt for inactive account");
                return Err(AppError::unauthorized(INVALID_CREDENTIALS));
            }
            None => return Err(AppError::unauthorized(INVALID_CREDENTIALS)),
        };

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        self.user_repo.update_last_login(user.id).await?;
        let issued = self.encoder.issue(user.id, &user.email, user.role)?;

        info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(LoginResponse {
            token: issued.token,
            token_type: "Bearer".to_string(),
            expires_at: issued.expires_at,
            user: user.summary(),
        })
    }

    /// Gets the current user's profile.
    pub async fn get_profile(&self, ctx: &RequestContext) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Updates the current user's name or email.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        input: UpdateProfileInput,
    ) -> Result<User, AppError> {
        let full_name = match input.full_name {
            Some(name) if name.trim().is_empty() => {
                return Err(AppError::validation("Full name cannot be empty"));
            }
            Some(name) => Some(name.trim().to_string()),
            None => None,
        };
        let email = input.email.as_deref().map(normalize_email).transpose()?;

        if let Some(email) = &email {
            if let Some(existing) = self.user_repo.find_by_email(email).await? {
                if existing.id != ctx.user_id {
                    return Err(AppError::conflict("Email already in use"));
                }
            }
        }

        let user = self
            .user_repo
            .update(
                ctx.user_id,
                &UpdateUser {
                    email,
                    full_name,
                    ..UpdateUser::default()
                },
            )
            .await?;

        info!(user_id = %ctx.user_id, "Profile updated");
        Ok(user)
    }

    /// Changes the current user's password after verifying the current one.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let user = self.get_profile(ctx).await?;

        if !self
            .hasher
            .verify_password(current_password, &user.password_hash)?
        {
            return Err(AppError::validation("Current password is incorrect"));
        }

        self.validator
            .validate(new_password, &[&user.email, &user.full_name])?;
        self.validator
            .validate_not_same(current_password, new_password)?;

        let hash = self.hasher.hash_password(new_password)?;
        self.user_repo.update_password(ctx.user_id, &hash).await?;

        info!(user_id = %ctx.user_id, "Password changed");
        Ok(())
    }
}
