use crate::entities::{prelude::Teachers, teachers};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Demo accounts shipped with a fresh database.
const DEMO_TEACHERS: [(&str, &str, &str); 2] = [
    ("teacher1", "teacher1@example.com", "John Doe"),
    ("teacher2", "teacher2@example.com", "Jane Smith"),
];

const DEMO_PASSWORD: &[u8] = b"password123";

fn hash_demo_password() -> Result<String, DbErr> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(DEMO_PASSWORD, &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DbErr::Custom(format!("Failed to hash demo password: {e}")))
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (username, email, name) in DEMO_TEACHERS {
            let password_hash = hash_demo_password()?;

            let insert = Query::insert()
                .into_table(Teachers)
                .columns([
                    teachers::Column::Username,
                    teachers::Column::Email,
                    teachers::Column::Name,
                    teachers::Column::PasswordHash,
                ])
                .values([
                    username.into(),
                    email.into(),
                    name.into(),
                    password_hash.into(),
                ])
                .map_err(|e| DbErr::Custom(e.to_string()))?
                .on_conflict(
                    OnConflict::column(teachers::Column::Username)
                        .do_nothing()
                        .to_owned(),
                )
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let usernames: Vec<&str> = DEMO_TEACHERS.iter().map(|(u, _, _)| *u).collect();
        let delete = Query::delete()
            .from_table(Teachers)
            .and_where(Expr::col(teachers::Column::Username).is_in(usernames))
            .to_owned();

        manager.exec_stmt(delete).await?;
        Ok(())
    }
}
