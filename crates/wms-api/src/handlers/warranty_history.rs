//! Warranty service history handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use wms_core::types::pagination::PageResponse;
use wms_entity::warranty::WarrantyHistory;

use crate::dto::request::{
    CreateWarrantyHistoryRequest, UpdateWarrantyHistoryRequest, WarrantyHistoryQuery,
};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// GET /api/warranty-history
pub async fn list_history(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<WarrantyHistoryQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<WarrantyHistory>>>> {
    let history = state
        .warranty_history_service
        .list(query.action, pagination.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(history)))
}

/// GET /api/warranty-history/serial/{serial_id}
pub async fn history_by_serial(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(serial_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Vec<WarrantyHistory>>>> {
    let history = state.warranty_history_service.by_serial(serial_id).await?;
    Ok(Json(ApiResponse::ok(history)))
}

/// GET /api/warranty-history/{id}
pub async fn get_history(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<WarrantyHistory>>> {
    let entry = state.warranty_history_service.get(id).await?;
    Ok(Json(ApiResponse::ok(entry)))
}

/// POST /api/warranty-history
pub async fn create_history(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateWarrantyHistoryRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<WarrantyHistory>>)> {
    let entry = state
        .warranty_history_service
        .create(&auth, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(entry))))
}

/// PATCH /api/warranty-history/{id}
pub async fn update_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateWarrantyHistoryRequest>,
) -> ApiResult<Json<ApiResponse<WarrantyHistory>>> {
    let entry = state
        .warranty_history_service
        .update(&auth, id, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(entry)))
}

/// DELETE /api/warranty-history/{id}
pub async fn delete_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.warranty_history_service.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
