use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::parse_id;
use super::{ApiError, ApiResponse, AppState};
use crate::models::admin::Principal;
use crate::models::teacher::{NewTeacher, Teacher};
use crate::services::Credentials;

/// `POST /api/teachers/register`
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewTeacher>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Teacher>>), ApiError> {
    let Json(input) = payload?;
    let teacher = state.teacher_service().register(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(teacher).with_message("Teacher registered successfully")),
    ))
}

/// `POST /api/teachers/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<ApiResponse<Principal>>, ApiError> {
    let Json(credentials) = payload?;
    let principal = state.teacher_service().login(&credentials).await?;
    Ok(Json(ApiResponse::success(principal)))
}

/// `GET /api/teachers/{id}`
pub async fn get_teacher(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Teacher>>, ApiError> {
    let id = parse_id(&id)?;
    let teacher = state
        .teacher_service()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Teacher"))?;
    Ok(Json(ApiResponse::success(teacher)))
}
