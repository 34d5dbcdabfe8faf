use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::{AdminError, CourseError, EnrollmentError, TeacherError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ValidationError(String),

    InternalError(String),

    Unauthorized(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Status code and client-facing text. Server-side failures are logged and
    /// replaced by a generic message.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            Self::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.status_and_message();
        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

/// Error for the enrollment and payment routes, whose envelopes carry the
/// failure text in `message` as well as in `error`.
#[derive(Debug)]
pub struct MessageError(pub ApiError);

impl IntoResponse for MessageError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.0.status_and_message();
        let body = ApiResponse::<()>::error(error_message.clone()).with_message(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<ApiError> for MessageError {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

impl From<EnrollmentError> for MessageError {
    fn from(err: EnrollmentError) -> Self {
        Self(err.into())
    }
}

impl From<JsonRejection> for MessageError {
    fn from(rejection: JsonRejection) -> Self {
        Self(rejection.into())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(format!("{err:#}"))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::ValidationError(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::ValidationError(rejection.body_text())
    }
}

impl From<CourseError> for ApiError {
    fn from(err: CourseError) -> Self {
        match err {
            CourseError::InvalidInput(msg) => Self::validation(msg),
            CourseError::Store(msg) => Self::DatabaseError(msg),
        }
    }
}

impl From<TeacherError> for ApiError {
    fn from(err: TeacherError) -> Self {
        match err {
            TeacherError::InvalidInput(msg) => Self::validation(msg),
            TeacherError::InvalidCredentials => Self::Unauthorized("Invalid credentials".to_string()),
            TeacherError::Store(msg) => Self::DatabaseError(msg),
        }
    }
}

impl From<EnrollmentError> for ApiError {
    fn from(err: EnrollmentError) -> Self {
        match err {
            EnrollmentError::InvalidInput(msg) => Self::validation(msg),
            EnrollmentError::NotFound(msg) => Self::NotFound(msg),
            EnrollmentError::Store(msg) => Self::DatabaseError(msg),
        }
    }
}

impl From<AdminError> for ApiError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::InvalidInput(msg) => Self::validation(msg),
            AdminError::InvalidCredentials => Self::Unauthorized("Invalid credentials".to_string()),
            AdminError::Store(msg) => Self::DatabaseError(msg),
        }
    }
}

impl ApiError {
    pub fn not_found(resource: &str) -> Self {
        Self::NotFound(format!("{resource} not found"))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }
}
