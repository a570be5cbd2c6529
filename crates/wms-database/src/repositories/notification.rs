//! Notification repository implementation.
//!
//! A row with a NULL `user_id` is a broadcast visible to every user; its
//! read flag is shared.

use sqlx::PgPool;
use uuid::Uuid;

use wms_core::error::{AppError, ErrorKind};
use wms_core::result::AppResult;
use wms_core::types::pagination::{PageRequest, PageResponse};
use wms_entity::notification::{CreateNotification, Notification, UpdateNotification};

use super::{map_write_error, read_error};

const VISIBLE_TO: &str = "(user_id = $1 OR user_id IS NULL)";

/// Repository for notification CRUD operations.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List notifications visible to a user, newest first.
    pub async fn find_for_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
        page: PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM notifications WHERE {VISIBLE_TO} AND (NOT $2 OR is_read = FALSE)"
        ))
        .bind(user_id)
        .bind(unread_only)
        .fetch_one(&self.pool)
        .await
        .map_err(read_error("Failed to count notifications"))?;

        let items = sqlx::query_as::<_, Notification>(&format!(
            "SELECT * FROM notifications WHERE {VISIBLE_TO} AND (NOT $2 OR is_read = FALSE) \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        ))
        .bind(user_id)
        .bind(unread_only)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(read_error("Failed to list notifications"))?;

        Ok(PageResponse::new(items, page, total as u64))
    }

    /// Find a notification visible to a user.
    pub async fn find_visible(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>(&format!(
            "SELECT * FROM notifications WHERE id = $2 AND {VISIBLE_TO}"
        ))
        .bind(user_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(read_error("Failed to find notification"))
    }

    /// Count unread notifications visible to a user.
    pub async fn count_unread(&self, user_id: Uuid) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM notifications WHERE {VISIBLE_TO} AND is_read = FALSE"
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(read_error("Failed to count unread"))?;
        Ok(count as u64)
    }

    /// Create a notification.
    pub async fn create(&self, data: &CreateNotification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (user_id, kind, title, message, ticket_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(data.user_id)
        .bind(data.kind)
        .bind(&data.title)
        .bind(&data.message)
        .bind(data.ticket_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create notification", &[]))
    }

    /// Mark a notification as read. Returns false when it is not visible.
    pub async fn mark_read(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(&format!(
            "UPDATE notifications SET is_read = TRUE, read_at = COALESCE(read_at, NOW()) \
             WHERE id = $2 AND {VISIBLE_TO}"
        ))
        .bind(user_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark every visible notification as read.
    pub async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(&format!(
            "UPDATE notifications SET is_read = TRUE, read_at = NOW() \
             WHERE {VISIBLE_TO} AND is_read = FALSE"
        ))
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark all read", e))?;
        Ok(result.rows_affected())
    }

    /// Update title, message or kind.
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        data: &UpdateNotification,
    ) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(&format!(
            "UPDATE notifications SET kind = COALESCE($3, kind), \
                                      title = COALESCE($4, title), \
                                      message = COALESCE($5, message) \
             WHERE id = $2 AND {VISIBLE_TO} RETURNING *"
        ))
        .bind(user_id)
        .bind(id)
        .bind(data.kind)
        .bind(data.title.as_deref())
        .bind(data.message.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update notification", &[]))?
        .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))
    }

    /// Delete a notification visible to a user.
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(&format!(
            "DELETE FROM notifications WHERE id = $2 AND {VISIBLE_TO}"
        ))
        .bind(user_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete notification", e)
        })?;
        Ok(result.rows_affected() > 0)
    }
}
