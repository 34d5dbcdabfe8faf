use serde::{Deserialize, Serialize};

use super::DecodeError;
use crate::domain::CourseStatus;
use crate::entities::courses;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Course {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub instructor: String,
    pub price: f64,
    pub category: String,
    pub teacher_id: i32,
    pub status: CourseStatus,
    pub created_at: String,
}

impl TryFrom<courses::Model> for Course {
    type Error = DecodeError;

    fn try_from(model: courses::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            status: model.status.parse()?,
            id: model.id,
            title: model.title,
            description: model.description,
            image_url: model.image_url,
            instructor: model.instructor,
            price: model.price,
            category: model.category,
            teacher_id: model.teacher_id,
            created_at: model.created_at,
        })
    }
}

/// Fields accepted when creating a course.
///
/// `status` is accepted for compatibility with older clients but ignored:
/// new courses always start `active`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub instructor: String,
    pub price: f64,
    pub category: String,
    pub teacher_id: i32,
    pub status: Option<CourseStatus>,
}

/// Partial update; only `Some` fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub instructor: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
}

impl CourseUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.image_url.is_none()
            && self.instructor.is_none()
            && self.price.is_none()
            && self.category.is_none()
    }
}
