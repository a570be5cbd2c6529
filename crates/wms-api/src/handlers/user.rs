//! Admin user management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use wms_core::types::pagination::PageResponse;
use wms_entity::user::User;

use crate::dto::request::{
    CreateUserRequest, ResetPasswordRequest, UpdateUserRequest, UserListQuery,
};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<User>>>> {
    let users = state
        .admin_user_service
        .list_users(&auth, &query.into(), pagination.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(users)))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state.admin_user_service.get_user(&auth, id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<User>>)> {
    let user = state
        .admin_user_service
        .create_user(&auth, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user))))
}

/// PATCH /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state
        .admin_user_service
        .update_user(&auth, id, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// POST /api/users/{id}/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .admin_user_service
        .reset_password(&auth, id, &req.new_password)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Password reset successfully",
    ))))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.admin_user_service.delete_user(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
