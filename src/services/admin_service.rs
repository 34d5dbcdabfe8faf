//! Admin dashboard and admin account management.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::admin::Principal;
use crate::models::stats::OverviewStats;
use crate::services::auth::{AuthError, Credentials};

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Store(String),
}

impl From<anyhow::Error> for AdminError {
    fn from(err: anyhow::Error) -> Self {
        Self::Store(format!("{err:#}"))
    }
}

impl From<sea_orm::DbErr> for AdminError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<AuthError> for AdminError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidInput(_) | AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::Store(msg) => Self::Store(msg),
        }
    }
}

#[async_trait::async_trait]
pub trait AdminService: Send + Sync {
    /// Dashboard rollup for the current month and the two before it.
    async fn overview_stats(&self) -> Result<OverviewStats, AdminError> {
        self.overview_stats_at(Utc::now()).await
    }

    /// Same as [`AdminService::overview_stats`] with an explicit clock.
    async fn overview_stats_at(&self, now: DateTime<Utc>) -> Result<OverviewStats, AdminError>;

    /// # Errors
    ///
    /// Returns [`AdminError::InvalidCredentials`] for empty fields, an unknown
    /// user, or a wrong password, always with the same message.
    async fn login(&self, credentials: &Credentials) -> Result<Principal, AdminError>;

    /// Creates the admin account unless one with this username exists.
    /// Returns `true` when a new account was written.
    async fn ensure_admin(
        &self,
        username: &str,
        password: &str,
        name: &str,
    ) -> Result<bool, AdminError>;
}
