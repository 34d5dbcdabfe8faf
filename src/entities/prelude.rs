pub use super::admins::Entity as Admins;
pub use super::courses::Entity as Courses;
pub use super::enrollments::Entity as Enrollments;
pub use super::payments::Entity as Payments;
pub use super::teachers::Entity as Teachers;
