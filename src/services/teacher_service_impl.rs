use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::db::TeacherRepository;
use crate::models::admin::Principal;
use crate::models::teacher::{NewTeacher, Teacher};
use crate::services::auth::{
    Authenticator, Credentials, TeacherAuthenticator, hash_password_blocking,
};
use crate::services::teacher_service::{TeacherError, TeacherService};

const MIN_PASSWORD_LEN: usize = 6;

pub struct DefaultTeacherService {
    teachers: Arc<dyn TeacherRepository>,
    authenticator: TeacherAuthenticator,
}

impl DefaultTeacherService {
    #[must_use]
    pub fn new(teachers: Arc<dyn TeacherRepository>) -> Self {
        Self {
            authenticator: TeacherAuthenticator::new(Arc::clone(&teachers)),
            teachers,
        }
    }
}

fn validate_registration(input: &NewTeacher) -> Result<(), TeacherError> {
    if input.username.trim().is_empty() {
        return Err(TeacherError::InvalidInput(
            "Username cannot be empty".to_string(),
        ));
    }
    if !input.email.contains('@') {
        return Err(TeacherError::InvalidInput("Invalid email format".to_string()));
    }
    if input.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(TeacherError::InvalidInput(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if input.name.trim().is_empty() {
        return Err(TeacherError::InvalidInput("Name cannot be empty".to_string()));
    }
    Ok(())
}

#[async_trait]
impl TeacherService for DefaultTeacherService {
    async fn register(&self, input: NewTeacher) -> Result<Teacher, TeacherError> {
        validate_registration(&input)?;

        if self.teachers.username_exists(input.username.trim()).await? {
            return Err(TeacherError::InvalidInput(
                "Username already exists".to_string(),
            ));
        }
        if self.teachers.email_exists(input.email.trim()).await? {
            return Err(TeacherError::InvalidInput(
                "Email already registered".to_string(),
            ));
        }

        let password_hash = hash_password_blocking(&input.password).await?;
        let teacher = self.teachers.create(&input, &password_hash).await?;

        info!(teacher_id = teacher.id, username = %teacher.username, "Teacher registered");
        Ok(teacher)
    }

    async fn login(&self, credentials: &Credentials) -> Result<Principal, TeacherError> {
        Ok(self.authenticator.authenticate(credentials).await?)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Teacher>, TeacherError> {
        if id <= 0 {
            return Err(TeacherError::InvalidInput("Invalid teacher ID".to_string()));
        }
        Ok(self.teachers.get_by_id(id).await?)
    }
}
