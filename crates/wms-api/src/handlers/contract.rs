//! Service contract handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use wms_core::types::pagination::PageResponse;
use wms_entity::contract::Contract;
use wms_service::{ContractDetail, CustomerContract};

use crate::dto::request::{ContractListQuery, CreateContractRequest, UpdateContractRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// GET /api/contracts
pub async fn list_contracts(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<ContractListQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<Contract>>>> {
    let contracts = state
        .contract_service
        .list(&query.into(), pagination.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(contracts)))
}

/// GET /api/contracts/{id}
pub async fn get_contract(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<ContractDetail>>> {
    let contract = state.contract_service.get(id).await?;
    Ok(Json(ApiResponse::ok(contract)))
}

/// GET /api/contracts/number/{contract_number}
pub async fn get_contract_by_number(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(contract_number): Path<String>,
) -> ApiResult<Json<ApiResponse<ContractDetail>>> {
    let contract = state
        .contract_service
        .get_by_number(&contract_number)
        .await?;
    Ok(Json(ApiResponse::ok(contract)))
}

/// GET /api/contracts/customer/{email}
pub async fn contracts_by_customer(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(email): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<CustomerContract>>>> {
    let contracts = state.contract_service.find_by_customer_email(&email).await?;
    Ok(Json(ApiResponse::ok(contracts)))
}

/// POST /api/contracts
pub async fn create_contract(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateContractRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ContractDetail>>)> {
    let (contract, items) = req.into_parts();
    let detail = state
        .contract_service
        .create(&auth, contract, items)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(detail))))
}

/// PATCH /api/contracts/{id}
pub async fn update_contract(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateContractRequest>,
) -> ApiResult<Json<ApiResponse<ContractDetail>>> {
    let (changes, items) = req.into_parts();
    let detail = state
        .contract_service
        .update(&auth, id, changes, items)
        .await?;
    Ok(Json(ApiResponse::ok(detail)))
}

/// DELETE /api/contracts/{id}
pub async fn delete_contract(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.contract_service.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
