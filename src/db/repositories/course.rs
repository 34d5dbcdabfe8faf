use anyhow::{Context, Result};
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, Select, Set,
};

use crate::domain::CourseStatus;
use crate::entities::{courses, prelude::*};
use crate::models::course::{Course, CourseUpdate, NewCourse};

const LIKE_ESCAPE: char = '!';

/// `%keyword%` with the `LIKE` metacharacters and the escape character escaped.
fn contains_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub struct CourseRepository {
    conn: DatabaseConnection,
}

impl CourseRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Newest first; rows sharing a timestamp fall back to insertion order, newest first.
    fn newest_first(query: Select<Courses>) -> Select<Courses> {
        query
            .order_by_desc(courses::Column::CreatedAt)
            .order_by_desc(courses::Column::Id)
    }

    fn decode(model: courses::Model) -> Result<Course> {
        let id = model.id;
        Course::try_from(model).with_context(|| format!("Failed to decode course {id}"))
    }

    fn decode_all(rows: Vec<courses::Model>) -> Result<Vec<Course>> {
        rows.into_iter().map(Self::decode).collect()
    }

    pub async fn list_all(&self) -> Result<Vec<Course>> {
        let rows = Self::newest_first(Courses::find())
            .all(&self.conn)
            .await
            .context("Failed to list courses")?;

        Self::decode_all(rows)
    }

    pub async fn list_by_status(&self, status: CourseStatus) -> Result<Vec<Course>> {
        let rows = Self::newest_first(
            Courses::find().filter(courses::Column::Status.eq(status.as_str())),
        )
        .all(&self.conn)
        .await
        .context("Failed to list courses by status")?;

        Self::decode_all(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Course>> {
        Courses::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to get course")?
            .map(Self::decode)
            .transpose()
    }

    pub async fn list_by_teacher(&self, teacher_id: i32) -> Result<Vec<Course>> {
        let rows = Self::newest_first(
            Courses::find().filter(courses::Column::TeacherId.eq(teacher_id)),
        )
        .all(&self.conn)
        .await
        .context("Failed to list courses by teacher")?;

        Self::decode_all(rows)
    }

    /// Substring match over title, description and category. `%` and `_` in
    /// the keyword match themselves.
    pub async fn search_by_teacher(&self, teacher_id: i32, keyword: &str) -> Result<Vec<Course>> {
        let pattern = contains_pattern(keyword);
        let like = |column: courses::Column| {
            Expr::col(column).like(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE))
        };
        let matches_keyword = Condition::any()
            .add(like(courses::Column::Title))
            .add(like(courses::Column::Description))
            .add(like(courses::Column::Category));

        let rows = Self::newest_first(
            Courses::find()
                .filter(courses::Column::TeacherId.eq(teacher_id))
                .filter(matches_keyword),
        )
        .all(&self.conn)
        .await
        .context("Failed to search courses")?;

        Self::decode_all(rows)
    }

    pub async fn create(&self, input: &NewCourse, status: CourseStatus) -> Result<Course> {
        let model = courses::ActiveModel {
            id: NotSet,
            title: Set(input.title.clone()),
            description: Set(input.description.clone()),
            image_url: Set(input.image_url.clone()),
            instructor: Set(input.instructor.clone()),
            price: Set(input.price),
            category: Set(input.category.clone()),
            teacher_id: Set(input.teacher_id),
            status: Set(status.as_str().to_string()),
            created_at: NotSet,
        }
        .insert(&self.conn)
        .await
        .context("Failed to create course")?;

        Self::decode(model)
    }

    /// Applies the supplied fields to a course owned by `teacher_id`.
    pub async fn update(
        &self,
        id: i32,
        teacher_id: i32,
        changes: &CourseUpdate,
    ) -> Result<Option<Course>> {
        let Some(existing) = Courses::find_by_id(id)
            .filter(courses::Column::TeacherId.eq(teacher_id))
            .one(&self.conn)
            .await
            .context("Failed to load course for update")?
        else {
            return Ok(None);
        };

        if changes.is_empty() {
            return Self::decode(existing).map(Some);
        }

        let mut active: courses::ActiveModel = existing.into();
        if let Some(title) = &changes.title {
            active.title = Set(title.clone());
        }
        if let Some(description) = &changes.description {
            active.description = Set(description.clone());
        }
        if let Some(image_url) = &changes.image_url {
            active.image_url = Set(image_url.clone());
        }
        if let Some(instructor) = &changes.instructor {
            active.instructor = Set(instructor.clone());
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        if let Some(category) = &changes.category {
            active.category = Set(category.clone());
        }

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update course")?;

        Self::decode(updated).map(Some)
    }

    pub async fn update_status(
        &self,
        id: i32,
        teacher_id: i32,
        status: CourseStatus,
    ) -> Result<Option<Course>> {
        let result = Courses::update_many()
            .col_expr(courses::Column::Status, Expr::value(status.as_str()))
            .filter(courses::Column::Id.eq(id))
            .filter(courses::Column::TeacherId.eq(teacher_id))
            .exec(&self.conn)
            .await
            .context("Failed to update course status")?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Returns `true` only when a row was removed.
    pub async fn delete(&self, id: i32, teacher_id: i32) -> Result<bool> {
        let result = Courses::delete_many()
            .filter(courses::Column::Id.eq(id))
            .filter(courses::Column::TeacherId.eq(teacher_id))
            .exec(&self.conn)
            .await
            .context("Failed to delete course")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        Courses::find()
            .count(&self.conn)
            .await
            .context("Failed to count courses")
    }
}
