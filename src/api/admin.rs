use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::models::admin::Principal;
use crate::models::stats::OverviewStats;
use crate::services::Credentials;

/// `POST /api/admin/auth/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<ApiResponse<Principal>>, ApiError> {
    let Json(credentials) = payload?;
    let principal = state.admin_service().login(&credentials).await?;
    Ok(Json(ApiResponse::success(principal)))
}

/// `GET /api/admin/overview`
pub async fn overview(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<OverviewStats>>, ApiError> {
    let stats = state.admin_service().overview_stats().await?;
    Ok(Json(ApiResponse::success(stats)))
}
