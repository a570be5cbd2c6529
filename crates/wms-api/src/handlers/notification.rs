//! Notification handlers for the current user.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use wms_core::types::pagination::PageResponse;
use wms_entity::notification::Notification;

use crate::dto::request::{
    CreateNotificationRequest, NotificationListQuery, UpdateNotificationRequest,
};
use crate::dto::response::{ApiResponse, CountResponse, MessageResponse, UpdatedResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<NotificationListQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<Notification>>>> {
    let notifications = state
        .notification_service
        .list(
            &auth,
            query.unread_only.unwrap_or(false),
            pagination.into_page_request(),
        )
        .await?;
    Ok(Json(ApiResponse::ok(notifications)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<CountResponse>>> {
    let count = state.notification_service.unread_count(&auth).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// GET /api/notifications/{id}
pub async fn get_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Notification>>> {
    let notification = state.notification_service.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(notification)))
}

/// POST /api/notifications
pub async fn create_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateNotificationRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Notification>>)> {
    let notification = state
        .notification_service
        .create(&auth, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(notification))))
}

/// POST /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.notification_service.mark_read(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Notification marked as read",
    ))))
}

/// POST /api/notifications/mark-all-read
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<UpdatedResponse>>> {
    let updated = state.notification_service.mark_all_read(&auth).await?;
    Ok(Json(ApiResponse::ok(UpdatedResponse { updated })))
}

/// PATCH /api/notifications/{id}
pub async fn update_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateNotificationRequest>,
) -> ApiResult<Json<ApiResponse<Notification>>> {
    let notification = state
        .notification_service
        .update(&auth, id, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(notification)))
}

/// DELETE /api/notifications/{id}
pub async fn delete_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.notification_service.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
