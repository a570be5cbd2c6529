//! Public customer portal handlers. None of these require a token.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use wms_service::portal::CustomerOverview;
use wms_service::serial::SerialRecord;
use wms_service::SupportRequestReceipt;

use crate::dto::request::SupportRequestBody;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// GET /api/customer-portal/overview/{email}
pub async fn overview(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<ApiResponse<CustomerOverview>>> {
    let overview = state.portal_service.overview(&email).await?;
    Ok(Json(ApiResponse::ok(overview)))
}

/// GET /api/customer-portal/warranty-history/{email}
pub async fn warranty_history(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<SerialRecord>>>> {
    let records = state.portal_service.warranty_history(&email).await?;
    Ok(Json(ApiResponse::ok(records)))
}

/// POST /api/customer-portal/support-request
pub async fn support_request(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SupportRequestBody>,
) -> ApiResult<(StatusCode, Json<ApiResponse<SupportRequestReceipt>>)> {
    let receipt = state.portal_service.support_request(req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(receipt))))
}
