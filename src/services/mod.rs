pub mod auth;
pub use auth::{
    AdminAuthenticator, AuthError, Authenticator, Credentials, TeacherAuthenticator,
};

pub mod course_service;
pub mod course_service_impl;
pub use course_service::{CourseError, CourseService};
pub use course_service_impl::SeaOrmCourseService;

pub mod teacher_service;
pub mod teacher_service_impl;
pub use teacher_service::{TeacherError, TeacherService};
pub use teacher_service_impl::DefaultTeacherService;

pub mod enrollment_service;
pub mod enrollment_service_impl;
pub use enrollment_service::{Checkout, EnrollmentError, EnrollmentService};
pub use enrollment_service_impl::SeaOrmEnrollmentService;

pub mod admin_service;
pub mod admin_service_impl;
pub use admin_service::{AdminError, AdminService};
pub use admin_service_impl::SeaOrmAdminService;
