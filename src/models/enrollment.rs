use serde::{Deserialize, Serialize};

use super::DecodeError;
use crate::domain::EnrollmentStatus;
use crate::entities::enrollments;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enrollment {
    pub id: i32,
    pub enrollment_id: String,
    pub course_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub agree_to_terms: bool,
    pub status: EnrollmentStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<enrollments::Model> for Enrollment {
    type Error = DecodeError;

    fn try_from(model: enrollments::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            status: model.status.parse()?,
            id: model.id,
            enrollment_id: model.enrollment_id,
            course_id: model.course_id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            phone: model.phone,
            company: model.company,
            agree_to_terms: model.agree_to_terms,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewEnrollment {
    pub course_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub agree_to_terms: bool,
}
