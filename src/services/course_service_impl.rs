//! `SeaORM` implementation of the `CourseService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::db::Store;
use crate::domain::CourseStatus;
use crate::models::course::{Course, CourseUpdate, NewCourse};
use crate::services::course_service::{CourseError, CourseService};

pub struct SeaOrmCourseService {
    store: Store,
}

impl SeaOrmCourseService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

fn check_course_id(id: i32) -> Result<(), CourseError> {
    if id <= 0 {
        return Err(CourseError::InvalidInput("Invalid course ID".to_string()));
    }
    Ok(())
}

fn check_teacher_id(teacher_id: i32) -> Result<(), CourseError> {
    if teacher_id <= 0 {
        return Err(CourseError::InvalidInput("Invalid teacher ID".to_string()));
    }
    Ok(())
}

fn check_title(title: &str) -> Result<(), CourseError> {
    if title.trim().is_empty() {
        return Err(CourseError::InvalidInput(
            "Course title cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn check_price(price: f64) -> Result<(), CourseError> {
    if price < 0.0 || price.is_nan() {
        return Err(CourseError::InvalidInput(
            "Course price cannot be negative".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl CourseService for SeaOrmCourseService {
    async fn list_all(&self) -> Result<Vec<Course>, CourseError> {
        Ok(self.store.courses().list_all().await?)
    }

    async fn list_active(&self) -> Result<Vec<Course>, CourseError> {
        Ok(self
            .store
            .courses()
            .list_by_status(CourseStatus::Active)
            .await?)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Course>, CourseError> {
        check_course_id(id)?;
        Ok(self.store.courses().get_by_id(id).await?)
    }

    async fn list_by_teacher(&self, teacher_id: i32) -> Result<Vec<Course>, CourseError> {
        check_teacher_id(teacher_id)?;
        Ok(self.store.courses().list_by_teacher(teacher_id).await?)
    }

    async fn search_by_teacher(
        &self,
        teacher_id: i32,
        keyword: &str,
    ) -> Result<Vec<Course>, CourseError> {
        check_teacher_id(teacher_id)?;
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(CourseError::InvalidInput(
                "Search keyword cannot be empty".to_string(),
            ));
        }

        Ok(self
            .store
            .courses()
            .search_by_teacher(teacher_id, keyword)
            .await?)
    }

    async fn create(&self, input: NewCourse) -> Result<Course, CourseError> {
        check_title(&input.title)?;
        check_price(input.price)?;
        check_teacher_id(input.teacher_id)?;

        let course = self
            .store
            .courses()
            .create(&input, CourseStatus::Active)
            .await?;

        metrics::counter!("courses_created_total").increment(1);
        info!(course_id = course.id, teacher_id = course.teacher_id, "Course created");
        Ok(course)
    }

    async fn update(
        &self,
        id: i32,
        teacher_id: i32,
        changes: CourseUpdate,
    ) -> Result<Option<Course>, CourseError> {
        check_course_id(id)?;
        check_teacher_id(teacher_id)?;
        if let Some(title) = &changes.title {
            check_title(title)?;
        }
        if let Some(price) = changes.price {
            check_price(price)?;
        }

        let updated = self.store.courses().update(id, teacher_id, &changes).await?;
        if updated.is_some() {
            info!(course_id = id, teacher_id, "Course updated");
        }
        Ok(updated)
    }

    async fn update_status(
        &self,
        id: i32,
        teacher_id: i32,
        status: CourseStatus,
    ) -> Result<Option<Course>, CourseError> {
        check_course_id(id)?;
        check_teacher_id(teacher_id)?;

        let updated = self
            .store
            .courses()
            .update_status(id, teacher_id, status)
            .await?;
        if updated.is_some() {
            info!(course_id = id, teacher_id, %status, "Course status changed");
        }
        Ok(updated)
    }

    async fn delete(&self, id: i32, teacher_id: i32) -> Result<bool, CourseError> {
        check_course_id(id)?;
        check_teacher_id(teacher_id)?;

        let removed = self.store.courses().delete(id, teacher_id).await?;
        if removed {
            info!(course_id = id, teacher_id, "Course deleted");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service() -> SeaOrmCourseService {
        SeaOrmCourseService::new(Store::in_memory().await.unwrap())
    }

    fn input(title: &str, price: f64) -> NewCourse {
        NewCourse {
            title: title.to_string(),
            description: "Learn things".to_string(),
            image_url: "/images/course.png".to_string(),
            instructor: "John Doe".to_string(),
            price,
            category: "General".to_string(),
            teacher_id: 1,
            status: Some(CourseStatus::Disabled),
        }
    }

    fn message(err: CourseError) -> String {
        match err {
            CourseError::InvalidInput(msg) => msg,
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn blank_title_is_rejected_before_any_write() {
        let svc = service().await;
        let err = svc.create(input("   ", 10.0)).await.unwrap_err();
        assert_eq!(message(err), "Course title cannot be empty");
        assert!(svc.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn negative_price_is_rejected() {
        let svc = service().await;
        let err = svc.create(input("Rust", -0.01)).await.unwrap_err();
        assert_eq!(message(err), "Course price cannot be negative");
    }

    #[tokio::test]
    async fn non_positive_ids_are_invalid_but_missing_ids_are_absent() {
        let svc = service().await;
        assert_eq!(
            message(svc.get_by_id(0).await.unwrap_err()),
            "Invalid course ID"
        );
        assert_eq!(
            message(svc.list_by_teacher(-1).await.unwrap_err()),
            "Invalid teacher ID"
        );
        assert!(svc.get_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_forces_active_and_round_trips() {
        let svc = service().await;
        let created = svc.create(input("Rust", 25.5)).await.unwrap();
        assert_eq!(created.status, CourseStatus::Active);
        assert!(!created.created_at.is_empty());

        let fetched = svc.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.title, "Rust");
        assert_eq!(fetched.teacher_id, 1);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let svc = service().await;
        let course = svc.create(input("Rust", 1.0)).await.unwrap();
        assert!(svc.delete(course.id, 1).await.unwrap());
        assert!(!svc.delete(course.id, 1).await.unwrap());
    }

    #[tokio::test]
    async fn status_change_by_non_owner_is_absent() {
        let svc = service().await;
        let course = svc.create(input("Rust", 1.0)).await.unwrap();

        let result = svc
            .update_status(course.id, 2, CourseStatus::Disabled)
            .await
            .unwrap();
        assert!(result.is_none());

        let unchanged = svc.get_by_id(course.id).await.unwrap().unwrap();
        assert_eq!(unchanged.status, CourseStatus::Active);

        let changed = svc
            .update_status(course.id, 1, CourseStatus::Disabled)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(changed.status, CourseStatus::Disabled);
        assert!(svc.list_active().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_validates_supplied_fields_and_checks_owner() {
        let svc = service().await;
        let course = svc.create(input("Rust", 1.0)).await.unwrap();

        let blank = CourseUpdate {
            title: Some(" ".to_string()),
            ..CourseUpdate::default()
        };
        assert_eq!(
            message(svc.update(course.id, 1, blank).await.unwrap_err()),
            "Course title cannot be empty"
        );

        let rename = CourseUpdate {
            title: Some("Rust 2".to_string()),
            ..CourseUpdate::default()
        };
        assert!(svc.update(course.id, 2, rename.clone()).await.unwrap().is_none());
        let renamed = svc.update(course.id, 1, rename).await.unwrap().unwrap();
        assert_eq!(renamed.title, "Rust 2");
    }

    #[tokio::test]
    async fn blank_search_keyword_is_rejected() {
        let svc = service().await;
        assert_eq!(
            message(svc.search_by_teacher(1, "  ").await.unwrap_err()),
            "Search keyword cannot be empty"
        );
    }
}
