use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::domain::{EnrollmentStatus, store_timestamp};
use crate::entities::{enrollments, prelude::*};
use crate::models::enrollment::{Enrollment, NewEnrollment};

pub struct EnrollmentRepository {
    conn: DatabaseConnection,
}

impl EnrollmentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn decode_all(rows: Vec<enrollments::Model>) -> Result<Vec<Enrollment>> {
        rows.into_iter()
            .map(|m| Enrollment::try_from(m).context("Failed to decode enrollment"))
            .collect()
    }

    pub async fn create(&self, code: &str, input: &NewEnrollment) -> Result<Enrollment> {
        let model = enrollments::ActiveModel {
            id: NotSet,
            enrollment_id: Set(code.to_string()),
            course_id: Set(input.course_id),
            first_name: Set(input.first_name.trim().to_string()),
            last_name: Set(input.last_name.trim().to_string()),
            email: Set(input.email.trim().to_string()),
            phone: Set(input.phone.clone()),
            company: Set(input.company.clone()),
            agree_to_terms: Set(input.agree_to_terms),
            status: Set(EnrollmentStatus::Pending.as_str().to_string()),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(&self.conn)
        .await
        .context("Failed to create enrollment")?;

        Enrollment::try_from(model).context("Failed to decode enrollment")
    }

    pub async fn get_by_code(&self, code: &str) -> Result<Option<Enrollment>> {
        Enrollments::find()
            .filter(enrollments::Column::EnrollmentId.eq(code))
            .one(&self.conn)
            .await
            .context("Failed to get enrollment")?
            .map(|m| Enrollment::try_from(m).context("Failed to decode enrollment"))
            .transpose()
    }

    pub async fn list_by_email(&self, email: &str) -> Result<Vec<Enrollment>> {
        let rows = Enrollments::find()
            .filter(enrollments::Column::Email.eq(email))
            .order_by_desc(enrollments::Column::CreatedAt)
            .order_by_desc(enrollments::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list enrollments by email")?;

        Self::decode_all(rows)
    }

    pub async fn list_by_course(&self, course_id: i32) -> Result<Vec<Enrollment>> {
        let rows = Enrollments::find()
            .filter(enrollments::Column::CourseId.eq(course_id))
            .order_by_desc(enrollments::Column::CreatedAt)
            .order_by_desc(enrollments::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list enrollments by course")?;

        Self::decode_all(rows)
    }

    pub async fn list_all(&self) -> Result<Vec<Enrollment>> {
        let rows = Enrollments::find()
            .order_by_desc(enrollments::Column::CreatedAt)
            .order_by_desc(enrollments::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list enrollments")?;

        Self::decode_all(rows)
    }

    /// Sets the status and bumps `updated_at`. Returns the row as stored afterwards.
    pub async fn update_status(
        &self,
        code: &str,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>> {
        let result = Enrollments::update_many()
            .col_expr(enrollments::Column::Status, Expr::value(status.as_str()))
            .col_expr(
                enrollments::Column::UpdatedAt,
                Expr::value(store_timestamp(chrono::Utc::now())),
            )
            .filter(enrollments::Column::EnrollmentId.eq(code))
            .exec(&self.conn)
            .await
            .context("Failed to update enrollment status")?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_by_code(code).await
    }

    pub async fn count_by_status(&self, status: EnrollmentStatus) -> Result<u64> {
        Enrollments::find()
            .filter(enrollments::Column::Status.eq(status.as_str()))
            .count(&self.conn)
            .await
            .context("Failed to count enrollments")
    }
}
