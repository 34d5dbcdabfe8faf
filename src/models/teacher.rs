use serde::{Deserialize, Serialize};

use super::DecodeError;
use crate::entities::teachers;

/// Public view of a teacher account. The password hash never leaves the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Teacher {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub name: String,
    pub background: Option<String>,
    pub portrait_url: Option<String>,
    pub specialties: Vec<String>,
    pub created_at: String,
}

impl Teacher {
    pub(crate) fn from_model(model: teachers::Model) -> Result<(Self, String), DecodeError> {
        let specialties = match model.specialties.as_deref() {
            None | Some("") => Vec::new(),
            Some(raw) => serde_json::from_str(raw).map_err(|source| DecodeError::Json {
                field: "specialties",
                source,
            })?,
        };

        Ok((
            Self {
                id: model.id,
                username: model.username,
                email: model.email,
                name: model.name,
                background: model.background,
                portrait_url: model.portrait_url,
                specialties,
                created_at: model.created_at,
            },
            model.password_hash,
        ))
    }
}

impl TryFrom<teachers::Model> for Teacher {
    type Error = DecodeError;

    fn try_from(model: teachers::Model) -> Result<Self, Self::Error> {
        Self::from_model(model).map(|(teacher, _)| teacher)
    }
}

/// Registration payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewTeacher {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: String,
    pub background: Option<String>,
    pub portrait_url: Option<String>,
    pub specialties: Vec<String>,
}
