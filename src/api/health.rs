use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{ApiResponse, AppState, HealthDto};

/// `GET /health`
///
/// Reports `OK` when the database answers a ping, `503` otherwise.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let timestamp = chrono::Utc::now().to_rfc3339();

    match state.store().ping().await {
        Ok(()) => Json(HealthDto {
            status: "OK",
            timestamp,
        })
        .into_response(),
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::<()>::error("Database unavailable")),
            )
                .into_response()
        }
    }
}
