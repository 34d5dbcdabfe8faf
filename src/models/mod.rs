pub mod admin;
pub mod course;
pub mod enrollment;
pub mod payment;
pub mod stats;
pub mod teacher;

use crate::domain::UnknownStatus;

/// A stored row that could not be turned into its domain shape.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Status(#[from] UnknownStatus),

    #[error("Malformed {field}: {source}")]
    Json {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
