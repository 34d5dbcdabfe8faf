pub mod admin;
pub mod course;
pub mod enrollment;
pub mod payment;
pub mod stats;
pub mod teacher;
