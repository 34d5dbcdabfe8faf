//! Credential checks for the two kinds of accounts.
//!
//! Teachers and admins use different password schemes (Argon2id for teachers,
//! HMAC-SHA256 over a per-record salt for admins). Both sit behind
//! [`Authenticator`] so callers only ever see a [`Principal`].

use std::sync::Arc;

use anyhow::Context;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use thiserror::Error;
use tokio::task;
use tracing::{info, warn};

use crate::db::{AdminRepository, TeacherRepository};
use crate::domain::Role;
use crate::models::admin::Principal;

type HmacSha256 = Hmac<Sha256>;

const ADMIN_SALT_BYTES: usize = 16;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Store(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Store(format!("{err:#}"))
    }
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Store(err.to_string())
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// One way of turning credentials into a [`Principal`].
///
/// Unknown users and wrong passwords must produce the same
/// [`AuthError::InvalidCredentials`].
#[async_trait]
pub trait Authenticator: Send + Sync {
    fn role(&self) -> Role;

    async fn authenticate(&self, credentials: &Credentials) -> Result<Principal, AuthError>;
}

/// Argon2id hash with a fresh random salt, in PHC string format.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))
}

pub fn verify_password(password: &str, stored_hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Runs [`hash_password`] off the async runtime.
pub async fn hash_password_blocking(password: &str) -> anyhow::Result<String> {
    let password = password.to_string();
    task::spawn_blocking(move || hash_password(&password))
        .await
        .context("Password hashing task panicked")?
}

/// Hex salt for a new admin record.
#[must_use]
pub fn generate_admin_salt() -> String {
    let bytes: [u8; ADMIN_SALT_BYTES] = rand::rng().random();
    hex::encode(bytes)
}

/// Hex HMAC-SHA256 of `password`, keyed by the salt text.
pub fn admin_password_hash(password: &str, salt: &str) -> anyhow::Result<String> {
    let mut mac = HmacSha256::new_from_slice(salt.as_bytes())
        .map_err(|e| anyhow::anyhow!("Failed to key HMAC: {e}"))?;
    mac.update(password.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn admin_password_matches(password: &str, salt: &str, stored_hash: &str) -> anyhow::Result<bool> {
    let Ok(expected) = hex::decode(stored_hash) else {
        return Ok(false);
    };
    let mut mac = HmacSha256::new_from_slice(salt.as_bytes())
        .map_err(|e| anyhow::anyhow!("Failed to key HMAC: {e}"))?;
    mac.update(password.as_bytes());
    Ok(mac.verify_slice(&expected).is_ok())
}

pub struct TeacherAuthenticator {
    teachers: Arc<dyn TeacherRepository>,
}

impl TeacherAuthenticator {
    #[must_use]
    pub fn new(teachers: Arc<dyn TeacherRepository>) -> Self {
        Self { teachers }
    }
}

#[async_trait]
impl Authenticator for TeacherAuthenticator {
    fn role(&self) -> Role {
        Role::Teacher
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<Principal, AuthError> {
        let username = credentials.username.trim();
        if username.is_empty() {
            return Err(AuthError::InvalidInput(
                "Username cannot be empty".to_string(),
            ));
        }
        if credentials.password.is_empty() {
            return Err(AuthError::InvalidInput(
                "Password cannot be empty".to_string(),
            ));
        }

        let Some((teacher, stored_hash)) = self.teachers.get_with_password(username).await? else {
            warn!(username, "Teacher login failed");
            return Err(AuthError::InvalidCredentials);
        };

        let password = credentials.password.clone();
        let is_valid = task::spawn_blocking(move || verify_password(&password, &stored_hash))
            .await
            .context("Password verification task panicked")??;

        if !is_valid {
            warn!(username, "Teacher login failed");
            return Err(AuthError::InvalidCredentials);
        }

        info!(teacher_id = teacher.id, "Teacher logged in");
        Ok(Principal {
            id: teacher.id,
            username: teacher.username,
            role: self.role(),
            name: teacher.name,
        })
    }
}

pub struct AdminAuthenticator {
    admins: AdminRepository,
}

impl AdminAuthenticator {
    #[must_use]
    pub const fn new(admins: AdminRepository) -> Self {
        Self { admins }
    }
}

#[async_trait]
impl Authenticator for AdminAuthenticator {
    fn role(&self) -> Role {
        Role::Admin
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<Principal, AuthError> {
        if credentials.username.is_empty() || credentials.password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let Some(admin) = self.admins.get_by_username(&credentials.username).await? else {
            warn!(username = %credentials.username, "Admin login failed");
            return Err(AuthError::InvalidCredentials);
        };

        if !admin_password_matches(
            &credentials.password,
            &admin.password_salt,
            &admin.password_hash,
        )? {
            warn!(username = %credentials.username, "Admin login failed");
            return Err(AuthError::InvalidCredentials);
        }

        info!(admin_id = admin.id, "Admin logged in");
        Ok(Principal {
            id: admin.id,
            username: admin.username,
            role: self.role(),
            name: admin.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_hash_is_keyed_by_salt() {
        let a = admin_password_hash("admin123", "00ff").unwrap();
        let b = admin_password_hash("admin123", "ff00").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
        assert!(admin_password_matches("admin123", "00ff", &a).unwrap());
        assert!(!admin_password_matches("admin124", "00ff", &a).unwrap());
    }

    #[test]
    fn malformed_stored_admin_hash_never_matches() {
        assert!(!admin_password_matches("x", "salt", "not-hex").unwrap());
    }

    #[test]
    fn admin_salt_is_sixteen_hex_bytes() {
        let salt = generate_admin_salt();
        assert_eq!(salt.len(), ADMIN_SALT_BYTES * 2);
        assert!(salt.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn argon2_hash_verifies() {
        let hash = hash_password("password123").unwrap();
        assert!(verify_password("password123", &hash).unwrap());
        assert!(!verify_password("password124", &hash).unwrap());
    }

    #[tokio::test]
    async fn principal_role_comes_from_the_authenticator() {
        let store = crate::db::Store::in_memory().await.unwrap();
        let teachers: Arc<dyn TeacherRepository> = Arc::new(store.teachers());
        let authenticator = TeacherAuthenticator::new(teachers);

        let principal = authenticator
            .authenticate(&Credentials {
                username: "teacher2".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(authenticator.role(), Role::Teacher);
        assert_eq!(principal.role, authenticator.role());
        assert_eq!(principal.name, "Jane Smith");
    }
}
