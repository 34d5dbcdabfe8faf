use std::sync::Arc;

use crate::config::Config;
use crate::db::{SeaOrmTeacherRepository, Store, TeacherRepository};
use crate::services::{
    AdminService, CourseService, DefaultTeacherService, EnrollmentService, SeaOrmAdminService,
    SeaOrmCourseService, SeaOrmEnrollmentService, TeacherService,
};

/// Long-lived handles shared by the HTTP layer and the CLI commands.
#[derive(Clone)]
pub struct SharedState {
    pub config: Config,

    pub store: Store,

    pub course_service: Arc<dyn CourseService>,

    pub teacher_service: Arc<dyn TeacherService>,

    pub enrollment_service: Arc<dyn EnrollmentService>,

    pub admin_service: Arc<dyn AdminService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::from_store(config, store))
    }

    #[must_use]
    pub fn from_store(config: Config, store: Store) -> Self {
        let teachers: Arc<dyn TeacherRepository> =
            Arc::new(SeaOrmTeacherRepository::new(store.conn.clone()));

        Self {
            course_service: Arc::new(SeaOrmCourseService::new(store.clone())),
            teacher_service: Arc::new(DefaultTeacherService::new(teachers)),
            enrollment_service: Arc::new(SeaOrmEnrollmentService::new(store.clone())),
            admin_service: Arc::new(SeaOrmAdminService::new(store.clone())),
            store,
            config,
        }
    }
}
