use axum::{
    extract::{MatchedPath, Request, State},
    http::{HeaderName, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use super::AppState;
use super::validation::TEACHER_ID_HEADER;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// `GET /api/metrics`: Prometheus text exposition, or 404 when the recorder is off.
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Response {
    match &state.prometheus_handle {
        Some(handle) => (
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            )],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "Metrics are disabled").into_response(),
    }
}

fn outcome(status: StatusCode) -> &'static str {
    if status.is_server_error() {
        "error"
    } else if status.is_client_error() {
        "client_error"
    } else {
        "success"
    }
}

/// Opens a `request` span per call, echoes the request id back in
/// `X-Request-Id`, and records HTTP counters keyed by the matched route.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();

    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_string);

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string());
    let teacher_id = req
        .headers()
        .get(TEACHER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
        route = route.as_deref(),
        teacher_id = teacher_id.as_deref(),
    );

    async move {
        let mut response = next.run(req).await;
        let status = response.status();
        let elapsed = start.elapsed();

        // Unmatched paths share one label
        let route_label = route.unwrap_or_else(|| "unmatched".to_string());
        let labels = [
            ("method", method.to_string()),
            ("route", route_label),
            ("status", status.as_u16().to_string()),
        ];
        metrics::counter!("http_requests_total", &labels).increment(1);
        metrics::histogram!("http_request_duration_seconds", &labels)
            .record(elapsed.as_secs_f64());

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        }

        let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        if status.is_server_error() {
            warn!(
                duration_ms,
                status_code = status.as_u16(),
                outcome = outcome(status),
                "Request finished"
            );
        } else {
            info!(
                duration_ms,
                status_code = status.as_u16(),
                outcome = outcome(status),
                "Request finished"
            );
        }

        response
    }
    .instrument(span)
    .await
}
