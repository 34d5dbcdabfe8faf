pub mod prelude;

pub mod admins;
pub mod courses;
pub mod enrollments;
pub mod payments;
pub mod teachers;
