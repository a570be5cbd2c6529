//! Serial and warranty handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use wms_core::types::pagination::PageResponse;
use wms_entity::serial::Serial;
use wms_entity::ticket::Ticket;
use wms_service::serial::{SerialDetail, SerialRecord, WarrantyLookup};

use crate::dto::request::{
    CreateSerialRequest, SerialListQuery, UpdateSerialRequest, WarrantyClaimRequest,
    WarrantyStatusRequest,
};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// GET /api/serials
pub async fn list_serials(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<SerialListQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<Serial>>>> {
    let serials = state
        .serial_service
        .list(&query.into(), pagination.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(serials)))
}

/// GET /api/serials/{id}
pub async fn get_serial(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<SerialDetail>>> {
    let serial = state.serial_service.get(id).await?;
    Ok(Json(ApiResponse::ok(serial)))
}

/// GET /api/serials/number/{serial_number}
pub async fn get_serial_by_number(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(serial_number): Path<String>,
) -> ApiResult<Json<ApiResponse<SerialDetail>>> {
    let serial = state.serial_service.get_by_number(&serial_number).await?;
    Ok(Json(ApiResponse::ok(serial)))
}

/// GET /api/serials/customer/{email}
pub async fn serials_by_customer(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(email): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<SerialRecord>>>> {
    let serials = state.serial_service.find_by_customer_email(&email).await?;
    Ok(Json(ApiResponse::ok(serials)))
}

/// GET /api/serials/warranty/{serial_number}
///
/// Also mounted without authentication as `/api/public/warranty/{serial_number}`.
pub async fn check_warranty(
    State(state): State<AppState>,
    Path(serial_number): Path<String>,
) -> ApiResult<Json<ApiResponse<WarrantyLookup>>> {
    let lookup = state.serial_service.check_warranty(&serial_number).await?;
    Ok(Json(ApiResponse::ok(lookup)))
}

/// POST /api/serials
pub async fn create_serial(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateSerialRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Serial>>)> {
    let serial = state.serial_service.create(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(serial))))
}

/// PATCH /api/serials/{id}
pub async fn update_serial(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateSerialRequest>,
) -> ApiResult<Json<ApiResponse<Serial>>> {
    let serial = state.serial_service.update(&auth, id, req.into()).await?;
    Ok(Json(ApiResponse::ok(serial)))
}

/// PATCH /api/serials/{id}/warranty-status
pub async fn update_warranty_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<WarrantyStatusRequest>,
) -> ApiResult<Json<ApiResponse<Serial>>> {
    let serial = state
        .serial_service
        .update_warranty_status(&auth, id, req.status, req.notes)
        .await?;
    Ok(Json(ApiResponse::ok(serial)))
}

/// POST /api/serials/warranty-request
pub async fn create_warranty_request(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<WarrantyClaimRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Ticket>>)> {
    let ticket = state
        .serial_service
        .create_warranty_request(&auth, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(ticket))))
}

/// DELETE /api/serials/{id}
pub async fn delete_serial(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.serial_service.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
