//! Support ticket handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use wms_core::types::pagination::PageResponse;
use wms_entity::ticket::{Ticket, TicketComment, TicketHistory};
use wms_service::ticket::{EmailReceipt, TicketDetail};

use crate::dto::request::{
    AssignTicketRequest, CommentRequest, CreateTicketRequest, TicketListQuery,
    TicketStatusRequest, UpdateTicketRequest,
};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// GET /api/tickets
pub async fn list_tickets(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<TicketListQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<Ticket>>>> {
    let tickets = state
        .ticket_service
        .list(&query.into(), pagination.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(tickets)))
}

/// GET /api/tickets/{id}
pub async fn get_ticket(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<TicketDetail>>> {
    let ticket = state.ticket_service.get(id).await?;
    Ok(Json(ApiResponse::ok(ticket)))
}

/// POST /api/tickets
pub async fn create_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateTicketRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Ticket>>)> {
    let ticket = state.ticket_service.create(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(ticket))))
}

/// PATCH /api/tickets/{id}
pub async fn update_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateTicketRequest>,
) -> ApiResult<Json<ApiResponse<Ticket>>> {
    let ticket = state.ticket_service.update(&auth, id, req.into()).await?;
    Ok(Json(ApiResponse::ok(ticket)))
}

/// PATCH /api/tickets/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<TicketStatusRequest>,
) -> ApiResult<Json<ApiResponse<Ticket>>> {
    let ticket = state
        .ticket_service
        .update_status(&auth, id, req.status, req.note)
        .await?;
    Ok(Json(ApiResponse::ok(ticket)))
}

/// POST /api/tickets/{id}/assign
pub async fn assign_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<AssignTicketRequest>,
) -> ApiResult<Json<ApiResponse<Ticket>>> {
    let ticket = state
        .ticket_service
        .assign(&auth, id, req.technician_id, req.note)
        .await?;
    Ok(Json(ApiResponse::ok(ticket)))
}

/// GET /api/tickets/{id}/history
pub async fn ticket_history(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Vec<TicketHistory>>>> {
    let history = state.ticket_service.history(id).await?;
    Ok(Json(ApiResponse::ok(history)))
}

/// GET /api/tickets/{id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Vec<TicketComment>>>> {
    let comments = state.ticket_service.comments(id).await?;
    Ok(Json(ApiResponse::ok(comments)))
}

/// POST /api/tickets/{id}/comments
pub async fn add_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<CommentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<TicketComment>>)> {
    let comment = state
        .ticket_service
        .add_comment(&auth, id, &req.comment, req.is_internal)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(comment))))
}

/// POST /api/tickets/{id}/send-email
pub async fn send_email(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<EmailReceipt>>> {
    let receipt = state.ticket_service.send_email(&auth, id).await?;
    Ok(Json(ApiResponse::ok(receipt)))
}

/// DELETE /api/tickets/{id}
pub async fn delete_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.ticket_service.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
