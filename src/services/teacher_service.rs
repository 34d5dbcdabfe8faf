//! Domain service for teacher accounts: registration, login and lookup.

use thiserror::Error;

use crate::models::admin::Principal;
use crate::models::teacher::{NewTeacher, Teacher};
use crate::services::auth::{AuthError, Credentials};

#[derive(Debug, Error)]
pub enum TeacherError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Store(String),
}

impl From<anyhow::Error> for TeacherError {
    fn from(err: anyhow::Error) -> Self {
        Self::Store(format!("{err:#}"))
    }
}

impl From<sea_orm::DbErr> for TeacherError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<AuthError> for TeacherError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidInput(msg) => Self::InvalidInput(msg),
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::Store(msg) => Self::Store(msg),
        }
    }
}

#[async_trait::async_trait]
pub trait TeacherService: Send + Sync {
    async fn register(&self, input: NewTeacher) -> Result<Teacher, TeacherError>;

    /// # Errors
    ///
    /// Returns [`TeacherError::InvalidCredentials`] for an unknown user or a wrong password.
    async fn login(&self, credentials: &Credentials) -> Result<Principal, TeacherError>;

    async fn get_by_id(&self, id: i32) -> Result<Option<Teacher>, TeacherError>;
}
