//! Dashboard statistics and chart handlers.

use axum::Json;
use axum::extract::State;

use wms_database::repositories::statistics::ProductFailure;
use wms_service::{DashboardStatistics, StatusCount};

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/dashboard/statistics
pub async fn statistics(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<DashboardStatistics>>> {
    let stats = state.dashboard_service.statistics().await?;
    Ok(Json(ApiResponse::ok(stats)))
}

/// GET /api/dashboard/charts/warranty-requests
pub async fn warranty_request_chart(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<StatusCount>>>> {
    let chart = state.dashboard_service.warranty_request_chart().await?;
    Ok(Json(ApiResponse::ok(chart)))
}

/// GET /api/dashboard/charts/product-failures
pub async fn product_failure_chart(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<ProductFailure>>>> {
    let chart = state.dashboard_service.product_failure_chart().await?;
    Ok(Json(ApiResponse::ok(chart)))
}
