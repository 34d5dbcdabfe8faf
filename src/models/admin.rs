use serde::Serialize;

use crate::domain::Role;

/// An authenticated caller, as returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub id: i32,
    pub username: String,
    pub role: Role,
    pub name: String,
}
