use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::parse_id;
use super::{ApiError, ApiResponse, AppState, MessageError, StatusRequest};
use crate::domain::EnrollmentStatus;
use crate::models::enrollment::{Enrollment, NewEnrollment};
use crate::models::payment::PaymentDetails;
use crate::services::Checkout;

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub enrollment: NewEnrollment,
    pub payment: PaymentDetails,
}

/// `POST /api/enrollments`
pub async fn create_enrollment(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewEnrollment>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Enrollment>>), MessageError> {
    let Json(input) = payload?;
    let enrollment = state.enrollment_service().create_enrollment(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(enrollment).with_message("Enrollment created successfully")),
    ))
}

/// `POST /api/enrollments/checkout`
///
/// Enrollment and payment are written one after the other; a rejected payment
/// leaves the enrollment in place.
pub async fn checkout(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Checkout>>), MessageError> {
    let Json(request) = payload?;
    let checkout = state
        .enrollment_service()
        .enroll_and_pay(request.enrollment, request.payment)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(checkout).with_message("Enrollment and payment created successfully")),
    ))
}

/// `GET /api/enrollments`
pub async fn list_enrollments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Enrollment>>>, MessageError> {
    let enrollments = state.enrollment_service().list_all_enrollments().await?;
    Ok(Json(
        ApiResponse::success(enrollments).with_message("Enrollments retrieved successfully"),
    ))
}

/// `GET /api/enrollments/{id}`
pub async fn get_enrollment(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<Enrollment>>, MessageError> {
    let enrollment = state
        .enrollment_service()
        .get_enrollment(&code)
        .await?
        .ok_or_else(|| ApiError::not_found("Enrollment"))?;
    Ok(Json(
        ApiResponse::success(enrollment).with_message("Enrollment retrieved successfully"),
    ))
}

/// `GET /api/enrollments/email/{email}`
pub async fn list_by_email(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<Vec<Enrollment>>>, MessageError> {
    let enrollments = state
        .enrollment_service()
        .list_enrollments_by_email(&email)
        .await?;
    Ok(Json(
        ApiResponse::success(enrollments).with_message("Enrollments retrieved successfully"),
    ))
}

/// `GET /api/enrollments/course/{course_id}`
pub async fn list_by_course(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Enrollment>>>, MessageError> {
    let course_id = parse_id(&course_id)?;
    let enrollments = state
        .enrollment_service()
        .list_enrollments_by_course(course_id)
        .await?;
    Ok(Json(
        ApiResponse::success(enrollments).with_message("Enrollments retrieved successfully"),
    ))
}

/// `PATCH /api/enrollments/{id}/status`
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Enrollment>>, MessageError> {
    let Json(request) = payload?;
    let status: EnrollmentStatus = request
        .status
        .parse()
        .map_err(|e: crate::domain::UnknownStatus| ApiError::validation(e.to_string()))?;

    let enrollment = state
        .enrollment_service()
        .update_enrollment_status(&code, status)
        .await?
        .ok_or_else(|| ApiError::not_found("Enrollment"))?;
    Ok(Json(
        ApiResponse::success(enrollment).with_message("Enrollment status updated successfully"),
    ))
}
