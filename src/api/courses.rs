use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State, rejection::JsonRejection, rejection::QueryRejection},
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{parse_id, teacher_id};
use super::{ApiError, ApiResponse, AppState, DeletedDto, SearchQuery, StatusRequest, TeacherBody};
use crate::domain::CourseStatus;
use crate::models::course::{Course, CourseUpdate, NewCourse};

#[derive(Debug, Deserialize)]
pub struct UpdateCourseRequest {
    #[serde(flatten)]
    pub changes: CourseUpdate,
    pub teacher_id: Option<i32>,
}

fn course_not_found() -> ApiError {
    ApiError::NotFound("Course not found or access denied".to_string())
}

/// `GET /api/courses`
pub async fn list_courses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Course>>>, ApiError> {
    let courses = state.course_service().list_all().await?;
    Ok(Json(ApiResponse::success(courses)))
}

/// `GET /api/courses/active`
pub async fn list_active_courses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Course>>>, ApiError> {
    let courses = state.course_service().list_active().await?;
    Ok(Json(ApiResponse::success(courses)))
}

/// `GET /api/courses/{id}`
pub async fn get_course(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Course>>, ApiError> {
    let id = parse_id(&id)?;
    let course = state
        .course_service()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course"))?;
    Ok(Json(ApiResponse::success(course)))
}

/// `GET /api/courses/teacher/courses`
pub async fn list_teacher_courses(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Vec<Course>>>, ApiError> {
    let teacher_id = teacher_id(&headers, None)?;
    let courses = state.course_service().list_by_teacher(teacher_id).await?;
    Ok(Json(ApiResponse::success(courses)))
}

/// `GET /api/courses/teacher/search?keyword=...`
pub async fn search_teacher_courses(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Course>>>, ApiError> {
    let teacher_id = teacher_id(&headers, None)?;
    let Query(query) = query?;
    let courses = state
        .course_service()
        .search_by_teacher(teacher_id, &query.keyword)
        .await?;
    Ok(Json(ApiResponse::success(courses)))
}

/// `POST /api/courses`
pub async fn create_course(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<NewCourse>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Course>>), ApiError> {
    let Json(mut input) = payload?;
    let body_teacher = (input.teacher_id != 0).then_some(input.teacher_id);
    input.teacher_id = teacher_id(&headers, body_teacher)?;

    let course = state.course_service().create(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(course))))
}

/// `PUT /api/courses/{id}`
pub async fn update_course(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<UpdateCourseRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Course>>, ApiError> {
    let id = parse_id(&id)?;
    let Json(request) = payload?;
    let teacher_id = teacher_id(&headers, request.teacher_id)?;

    let course = state
        .course_service()
        .update(id, teacher_id, request.changes)
        .await?
        .ok_or_else(course_not_found)?;
    Ok(Json(ApiResponse::success(course)))
}

/// `PATCH /api/courses/{id}/status`
pub async fn update_course_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Course>>, ApiError> {
    let id = parse_id(&id)?;
    let Json(request) = payload?;
    let teacher_id = teacher_id(&headers, request.teacher_id)?;
    let status: CourseStatus = request
        .status
        .parse()
        .map_err(|_| ApiError::validation("Status must be either \"active\" or \"disabled\""))?;

    let course = state
        .course_service()
        .update_status(id, teacher_id, status)
        .await?
        .ok_or_else(course_not_found)?;
    Ok(Json(ApiResponse::success(course)))
}

/// `DELETE /api/courses/{id}`
///
/// Succeeds whether or not a row was removed; `deleted` tells which.
pub async fn delete_course(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiResponse<DeletedDto>>, ApiError> {
    let id = parse_id(&id)?;
    let body: TeacherBody = if body.is_empty() {
        TeacherBody::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::validation(format!("Invalid request body: {e}")))?
    };
    let teacher_id = teacher_id(&headers, body.teacher_id)?;

    let deleted = state.course_service().delete(id, teacher_id).await?;
    Ok(Json(ApiResponse::success(DeletedDto { deleted })))
}
