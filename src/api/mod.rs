use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, patch, post},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

mod admin;
mod courses;
mod enrollments;
mod error;
mod health;
mod observability;
mod payments;
mod teachers;
mod types;
mod validation;

pub use error::{ApiError, MessageError};
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::services::{AdminService, CourseService, EnrollmentService, TeacherService};

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn course_service(&self) -> &Arc<dyn CourseService> {
        &self.shared.course_service
    }

    #[must_use]
    pub fn teacher_service(&self) -> &Arc<dyn TeacherService> {
        &self.shared.teacher_service
    }

    #[must_use]
    pub fn enrollment_service(&self) -> &Arc<dyn EnrollmentService> {
        &self.shared.enrollment_service
    }

    #[must_use]
    pub fn admin_service(&self) -> &Arc<dyn AdminService> {
        &self.shared.admin_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let images_path = state.config().general.images_path.clone();
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_routes())
        .route("/health", get(health::health))
        .nest_service("/images", tower_http::services::ServeDir::new(images_path))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(observability::logging_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer.allow_methods(Any).allow_headers(Any)),
        )
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/courses",
            get(courses::list_courses).post(courses::create_course),
        )
        .route("/courses/active", get(courses::list_active_courses))
        .route(
            "/courses/teacher/courses",
            get(courses::list_teacher_courses),
        )
        .route(
            "/courses/teacher/search",
            get(courses::search_teacher_courses),
        )
        .route(
            "/courses/{id}",
            get(courses::get_course)
                .put(courses::update_course)
                .delete(courses::delete_course),
        )
        .route(
            "/courses/{id}/status",
            patch(courses::update_course_status),
        )
        .route("/teachers/register", post(teachers::register))
        .route("/teachers/login", post(teachers::login))
        .route("/teachers/{id}", get(teachers::get_teacher))
        .route(
            "/enrollments",
            get(enrollments::list_enrollments).post(enrollments::create_enrollment),
        )
        .route("/enrollments/checkout", post(enrollments::checkout))
        .route("/enrollments/{id}", get(enrollments::get_enrollment))
        .route(
            "/enrollments/{id}/status",
            patch(enrollments::update_status),
        )
        .route(
            "/enrollments/email/{email}",
            get(enrollments::list_by_email),
        )
        .route(
            "/enrollments/course/{course_id}",
            get(enrollments::list_by_course),
        )
        .route(
            "/payments",
            get(payments::list_payments).post(payments::create_payment),
        )
        .route("/payments/stats/overview", get(payments::payment_stats))
        .route("/payments/{id}", get(payments::get_payment))
        .route(
            "/payments/{id}/complete",
            post(payments::complete_payment),
        )
        .route(
            "/payments/enrollment/{enrollment_id}",
            get(payments::list_by_enrollment),
        )
        .route("/admin/auth/login", post(admin::login))
        .route("/admin/overview", get(admin::overview))
        .route("/metrics", get(observability::get_metrics))
}
