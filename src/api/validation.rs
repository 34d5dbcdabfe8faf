use axum::http::HeaderMap;

use super::ApiError;

pub const TEACHER_ID_HEADER: &str = "x-teacher-id";

/// Parses a positive integer id from a path segment or header value.
pub fn parse_id(raw: &str) -> Result<i32, ApiError> {
    match raw.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::validation("ID must be a positive number")),
    }
}

/// Resolves the acting teacher from the `X-Teacher-Id` header, falling back to
/// a `teacher_id` field in the request body.
pub fn teacher_id(headers: &HeaderMap, body_teacher_id: Option<i32>) -> Result<i32, ApiError> {
    if let Some(value) = headers.get(TEACHER_ID_HEADER) {
        let raw = value
            .to_str()
            .map_err(|_| ApiError::validation("ID must be a positive number"))?;
        return parse_id(raw);
    }

    match body_teacher_id {
        Some(id) if id > 0 => Ok(id),
        Some(_) => Err(ApiError::validation("ID must be a positive number")),
        None => Err(ApiError::validation("Teacher ID is required")),
    }
}
