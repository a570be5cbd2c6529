//! User repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use wms_core::error::{AppError, ErrorKind};
use wms_core::result::AppResult;
use wms_core::types::pagination::{PageRequest, PageResponse};
use wms_entity::user::{CreateUser, UpdateUser, User, UserRole};

use super::{map_write_error, read_error};

const EMAIL_CONFLICT: &[(&str, &str)] = &[("users_email_key", "Email already in use")];

/// Optional list filters for users.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Restrict to one role.
    pub role: Option<UserRole>,
    /// Case-insensitive substring of email or full name.
    pub search: Option<String>,
}

/// Repository for staff accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(read_error("Failed to find user"))
    }

    /// Find a user by (lowercased) email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(read_error("Failed to find user by email"))
    }

    /// List users, newest first.
    pub async fn find_all(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<User>> {
        const WHERE: &str = "WHERE ($1::user_role IS NULL OR role = $1) \
             AND ($2::text IS NULL OR email ILIKE '%' || $2 || '%' OR full_name ILIKE '%' || $2 || '%')";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users {WHERE}"))
            .bind(filter.role)
            .bind(filter.search.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(read_error("Failed to count users"))?;

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT * FROM users {WHERE} ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        ))
        .bind(filter.role)
        .bind(filter.search.as_deref())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(read_error("Failed to list users"))?;

        Ok(PageResponse::new(users, page, total as u64))
    }

    /// Create a new user.
    pub async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash, full_name, role, is_active) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.full_name)
        .bind(data.role)
        .bind(data.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create user", EMAIL_CONFLICT))
    }

    /// Update a user's fields.
    pub async fn update(&self, id: Uuid, data: &UpdateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET email = COALESCE($2, email), \
                              full_name = COALESCE($3, full_name), \
                              role = COALESCE($4, role), \
                              is_active = COALESCE($5, is_active), \
                              updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(data.email.as_deref())
        .bind(data.full_name.as_deref())
        .bind(data.role)
        .bind(data.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update user", EMAIL_CONFLICT))?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    /// Update a user's password hash.
    pub async fn update_password(&self, user_id: Uuid, password_hash: &str) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(user_id)
                .bind(password_hash)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to update password", e)
                })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }
        Ok(())
    }

    /// Record a successful login.
    pub async fn update_last_login(&self, user_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update last login", e)
            })?;
        Ok(())
    }

    /// Delete a user. Returns false when no row matched.
    pub async fn delete(&self, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete user", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Count all users.
    pub async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(read_error("Failed to count users"))?;
        Ok(count as u64)
    }
}
