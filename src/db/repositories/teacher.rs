use anyhow::{Context, Result};
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, Set,
};

use crate::entities::{prelude::*, teachers};
use crate::models::teacher::{NewTeacher, Teacher};

/// Storage for teacher accounts.
///
/// The service layer only ever talks to this trait, so tests can swap the
/// relational store for [`InMemoryTeacherRepository`].
#[async_trait]
pub trait TeacherRepository: Send + Sync {
    async fn get_by_id(&self, id: i32) -> Result<Option<Teacher>>;

    /// Teacher plus stored password hash, for credential checks only.
    async fn get_with_password(&self, username: &str) -> Result<Option<(Teacher, String)>>;

    async fn username_exists(&self, username: &str) -> Result<bool>;

    async fn email_exists(&self, email: &str) -> Result<bool>;

    async fn create(&self, input: &NewTeacher, password_hash: &str) -> Result<Teacher>;
}

pub struct SeaOrmTeacherRepository {
    conn: DatabaseConnection,
}

impl SeaOrmTeacherRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

fn encode_specialties(specialties: &[String]) -> Result<Option<String>> {
    if specialties.is_empty() {
        return Ok(None);
    }
    serde_json::to_string(specialties)
        .map(Some)
        .context("Failed to encode specialties")
}

#[async_trait]
impl TeacherRepository for SeaOrmTeacherRepository {
    async fn get_by_id(&self, id: i32) -> Result<Option<Teacher>> {
        Teachers::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to get teacher")?
            .map(|m| Teacher::try_from(m).context("Failed to decode teacher"))
            .transpose()
    }

    async fn get_with_password(&self, username: &str) -> Result<Option<(Teacher, String)>> {
        Teachers::find()
            .filter(teachers::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query teacher by username")?
            .map(|m| Teacher::from_model(m).context("Failed to decode teacher"))
            .transpose()
    }

    async fn username_exists(&self, username: &str) -> Result<bool> {
        let count = Teachers::find()
            .filter(teachers::Column::Username.eq(username))
            .count(&self.conn)
            .await
            .context("Failed to check teacher username")?;
        Ok(count > 0)
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        let count = Teachers::find()
            .filter(teachers::Column::Email.eq(email))
            .count(&self.conn)
            .await
            .context("Failed to check teacher email")?;
        Ok(count > 0)
    }

    async fn create(&self, input: &NewTeacher, password_hash: &str) -> Result<Teacher> {
        let model = teachers::ActiveModel {
            id: NotSet,
            username: Set(input.username.trim().to_string()),
            email: Set(input.email.trim().to_string()),
            name: Set(input.name.trim().to_string()),
            password_hash: Set(password_hash.to_string()),
            background: Set(input.background.clone()),
            portrait_url: Set(input.portrait_url.clone()),
            specialties: Set(encode_specialties(&input.specialties)?),
            created_at: NotSet,
        }
        .insert(&self.conn)
        .await
        .context("Failed to create teacher")?;

        Teacher::try_from(model).context("Failed to decode teacher")
    }
}

#[cfg(test)]
pub use in_memory::InMemoryTeacherRepository;
