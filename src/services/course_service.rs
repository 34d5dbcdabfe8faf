//! Domain service for the course catalog.
//!
//! Every mutation is scoped to the owning teacher: a course that exists but
//! belongs to somebody else is reported as absent.

use thiserror::Error;

use crate::domain::CourseStatus;
use crate::models::course::{Course, CourseUpdate, NewCourse};

#[derive(Debug, Error)]
pub enum CourseError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Store(String),
}

impl From<anyhow::Error> for CourseError {
    fn from(err: anyhow::Error) -> Self {
        Self::Store(format!("{err:#}"))
    }
}

impl From<sea_orm::DbErr> for CourseError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Store(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait CourseService: Send + Sync {
    /// All courses, newest first.
    async fn list_all(&self) -> Result<Vec<Course>, CourseError>;

    /// Only `active` courses, newest first.
    async fn list_active(&self) -> Result<Vec<Course>, CourseError>;

    /// `Ok(None)` when no course has this id.
    ///
    /// # Errors
    ///
    /// Returns [`CourseError::InvalidInput`] if `id` is not positive.
    async fn get_by_id(&self, id: i32) -> Result<Option<Course>, CourseError>;

    async fn list_by_teacher(&self, teacher_id: i32) -> Result<Vec<Course>, CourseError>;

    async fn search_by_teacher(
        &self,
        teacher_id: i32,
        keyword: &str,
    ) -> Result<Vec<Course>, CourseError>;

    /// Creates a course. The status is always `active`.
    async fn create(&self, input: NewCourse) -> Result<Course, CourseError>;

    /// Applies the supplied fields. `Ok(None)` when `teacher_id` owns no course with this id.
    async fn update(
        &self,
        id: i32,
        teacher_id: i32,
        changes: CourseUpdate,
    ) -> Result<Option<Course>, CourseError>;

    async fn update_status(
        &self,
        id: i32,
        teacher_id: i32,
        status: CourseStatus,
    ) -> Result<Option<Course>, CourseError>;

    /// `true` iff a row was removed. Deleting twice is not an error.
    async fn delete(&self, id: i32, teacher_id: i32) -> Result<bool, CourseError>;
}
