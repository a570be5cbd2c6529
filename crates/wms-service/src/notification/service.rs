//! Personal and broadcast notifications.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use wms_auth::rbac::{Permission, RbacEnforcer};
use wms_core::error::AppError;
use wms_core::types::pagination::{PageRequest, PageResponse};
use wms_database::repositories::{NotificationRepository, UserRepository};
use wms_entity::notification::{
    CreateNotification, Notification, NotificationKind, UpdateNotification,
};
use wms_entity::user::UserRole;

use crate::context::RequestContext;

/// Fields for creating a notification. No recipient means a broadcast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyInput {
    pub user_id: Option<Uuid>,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub ticket_id: Option<Uuid>,
}

/// Reads and manages the caller's notifications.
///
/// A user sees notifications addressed to them plus every broadcast. A
/// broadcast is a single row, so marking it read marks it for everyone.
#[derive(Debug, Clone)]
pub struct NotificationService {
    notification_repo: Arc<NotificationRepository>,
    user_repo: Arc<UserRepository>,
    rbac: Arc<RbacEnforcer>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(
        notification_repo: Arc<NotificationRepository>,
        user_repo: Arc<UserRepository>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            notification_repo,
            user_repo,
            rbac,
        }
    }

    /// Creates a notification for another user or for everyone.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: NotifyInput,
    ) -> Result<Notification, AppError> {
        self.rbac
            .require_permission(&ctx.role, Permission::NotificationCreate)?;

        let title = input.title.trim();
        let message = input.message.trim();
        if title.is_empty() || message.is_empty() {
            return Err(AppError::validation("Title and message are required"));
        }
        if let Some(user_id) = input.user_id {
            if self.user_repo.find_by_id(user_id).await?.is_none() {
                return Err(AppError::not_found(format!("User {user_id} not found")));
            }
        }

        let mut data = match input.user_id {
            Some(user_id) => CreateNotification::to_user(user_id, input.kind, title, message),
            None => CreateNotification::broadcast(input.kind, title, message),
        };
        data.ticket_id = input.ticket_id;

        let notification = self.notification_repo.create(&data).await?;
        info!(
            notification_id = %notification.id,
            broadcast = notification.is_broadcast(),
            created_by = %ctx.user_id,
            "Notification created"
        );
        Ok(notification)
    }

    /// Records a system notification. Failures are logged and swallowed.
    pub async fn notify(&self, data: CreateNotification) -> Option<Notification> {
        match self.notification_repo.create(&data).await {
            Ok(notification) => Some(notification),
            Err(e) => {
                warn!(title = %data.title, error = %e, "Failed to record notification");
                None
            }
        }
    }

    /// Own and broadcast notifications, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        unread_only: bool,
        page: PageRequest,
    ) -> Result<PageResponse<Notification>, AppError> {
        self.rbac
            .require_permission(&ctx.role, Permission::NotificationOwn)?;
        self.notification_repo
            .find_for_user(ctx.user_id, unread_only, page)
            .await
    }

    pub async fn unread_count(&self, ctx: &RequestContext) -> Result<u64, AppError> {
        self.notification_repo.count_unread(ctx.user_id).await
    }

    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> Result<Notification, AppError> {
        self.notification_repo
            .find_visible(id, ctx.user_id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn mark_read(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        if !self.notification_repo.mark_read(id, ctx.user_id).await? {
            return Err(not_found(id));
        }
        Ok(())
    }

    /// Marks everything the caller can see as read. Returns the number changed.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> Result<u64, AppError> {
        let updated = self.notification_repo.mark_all_read(ctx.user_id).await?;
        info!(user_id = %ctx.user_id, updated, "Notifications marked read");
        Ok(updated)
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        data: UpdateNotification,
    ) -> Result<Notification, AppError> {
        if data.title.as_deref().is_some_and(|t| t.trim().is_empty())
            || data.message.as_deref().is_some_and(|m| m.trim().is_empty())
        {
            return Err(AppError::validation("Title and message must not be empty"));
        }
        let current = self.get(ctx, id).await?;
        ensure_can_modify(&self.rbac, &ctx.role, &current)?;
        self.notification_repo.update(id, ctx.user_id, &data).await
    }

    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        let current = self.get(ctx, id).await?;
        ensure_can_modify(&self.rbac, &ctx.role, &current)?;
        if !self.notification_repo.delete(id, ctx.user_id).await? {
            return Err(not_found(id));
        }
        info!(notification_id = %id, user_id = %ctx.user_id, "Notification deleted");
        Ok(())
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("Notification {id} not found"))
}

/// Broadcasts are shared, so only roles that may create them may change them.
fn ensure_can_modify(
    rbac: &RbacEnforcer,
    role: &UserRole,
    notification: &Notification,
) -> Result<(), AppError> {
    if notification.is_broadcast() {
        rbac.require_permission(role, Permission::NotificationCreate)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use wms_core::error::ErrorKind;

    use super::*;

    fn notification(user_id: Option<Uuid>) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            user_id,
            kind: NotificationKind::Info,
            title: "Warranty expiry".into(),
            message: "3 warranties expired".into(),
            ticket_id: None,
            is_read: false,
            read_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn technician_cannot_change_a_broadcast() {
        let rbac = RbacEnforcer::new();
        let err = ensure_can_modify(&rbac, &UserRole::Technician, &notification(None))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[test]
    fn manager_can_change_a_broadcast() {
        let rbac = RbacEnforcer::new();
        assert!(ensure_can_modify(&rbac, &UserRole::Manager, &notification(None)).is_ok());
    }

    #[test]
    fn anyone_can_change_their_own() {
        let rbac = RbacEnforcer::new();
        let own = notification(Some(Uuid::new_v4()));
        assert!(ensure_can_modify(&rbac, &UserRole::Technician, &own).is_ok());
    }
}
