use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, CompletePaymentRequest, MessageError};
use crate::models::payment::{NewPayment, Payment, PaymentStats};

/// `POST /api/payments`
pub async fn create_payment(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewPayment>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Payment>>), MessageError> {
    let Json(input) = payload?;
    let payment = state.enrollment_service().create_payment(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(payment).with_message("Payment created successfully")),
    ))
}

/// `GET /api/payments`
pub async fn list_payments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Payment>>>, MessageError> {
    let payments = state.enrollment_service().list_all_payments().await?;
    Ok(Json(
        ApiResponse::success(payments).with_message("Payments retrieved successfully"),
    ))
}

/// `GET /api/payments/{id}`
pub async fn get_payment(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<Payment>>, MessageError> {
    let payment = state
        .enrollment_service()
        .get_payment(&code)
        .await?
        .ok_or_else(|| ApiError::not_found("Payment"))?;
    Ok(Json(
        ApiResponse::success(payment).with_message("Payment retrieved successfully"),
    ))
}

/// `GET /api/payments/enrollment/{enrollment_id}`
pub async fn list_by_enrollment(
    State(state): State<Arc<AppState>>,
    Path(enrollment_code): Path<String>,
) -> Result<Json<ApiResponse<Vec<Payment>>>, MessageError> {
    let payments = state
        .enrollment_service()
        .list_payments_by_enrollment(&enrollment_code)
        .await?;
    Ok(Json(
        ApiResponse::success(payments).with_message("Payments retrieved successfully"),
    ))
}

/// `POST /api/payments/{id}/complete`
pub async fn complete_payment(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    payload: Result<Json<CompletePaymentRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Payment>>, MessageError> {
    let Json(request) = payload?;
    if request.transaction_id.trim().is_empty() {
        return Err(ApiError::validation("Transaction ID is required").into());
    }

    let payment = state
        .enrollment_service()
        .complete_payment(&code, request.transaction_id.trim())
        .await?;
    Ok(Json(
        ApiResponse::success(payment).with_message("Payment completed successfully"),
    ))
}

/// `GET /api/payments/stats/overview`
pub async fn payment_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<PaymentStats>>, MessageError> {
    let stats = state.enrollment_service().payment_stats().await?;
    Ok(Json(
        ApiResponse::success(stats).with_message("Payment statistics retrieved successfully"),
    ))
}
