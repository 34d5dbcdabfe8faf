use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter, Set,
};

use crate::entities::{admins, prelude::*};

/// Admin row including credential material. Never serialized.
#[derive(Debug, Clone)]
pub struct AdminRecord {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub password_hash: String,
    pub password_salt: String,
}

impl From<admins::Model> for AdminRecord {
    fn from(model: admins::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            name: model.name,
            password_hash: model.password_hash,
            password_salt: model.password_salt,
        }
    }
}

pub struct AdminRepository {
    conn: DatabaseConnection,
}

impl AdminRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<AdminRecord>> {
        let admin = Admins::find()
            .filter(admins::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query admin by username")?;

        Ok(admin.map(AdminRecord::from))
    }

    pub async fn create(
        &self,
        username: &str,
        name: &str,
        password_hash: &str,
        password_salt: &str,
    ) -> Result<AdminRecord> {
        let model = admins::ActiveModel {
            id: NotSet,
            username: Set(username.to_string()),
            name: Set(name.to_string()),
            password_hash: Set(password_hash.to_string()),
            password_salt: Set(password_salt.to_string()),
            created_at: NotSet,
        }
        .insert(&self.conn)
        .await
        .context("Failed to create admin")?;

        Ok(AdminRecord::from(model))
    }
}
