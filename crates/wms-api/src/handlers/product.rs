//! Product catalogue handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use wms_core::types::pagination::PageResponse;
use wms_entity::product::Product;
use wms_service::ProductDetail;

use crate::dto::request::{CreateProductRequest, ProductListQuery, UpdateProductRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<ProductListQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<Product>>>> {
    let products = state
        .product_service
        .list(&query.into(), pagination.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(products)))
}

/// GET /api/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<ProductDetail>>> {
    let product = state.product_service.get(id).await?;
    Ok(Json(ApiResponse::ok(product)))
}

/// POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let product = state.product_service.create(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(product))))
}

/// PATCH /api/products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateProductRequest>,
) -> ApiResult<Json<ApiResponse<Product>>> {
    let product = state.product_service.update(&auth, id, req.into()).await?;
    Ok(Json(ApiResponse::ok(product)))
}

/// DELETE /api/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.product_service.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
