use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::admin::{AdminRecord, AdminRepository};
pub use repositories::course::CourseRepository;
pub use repositories::enrollment::EnrollmentRepository;
pub use repositories::payment::PaymentRepository;
pub use repositories::stats::StatsRepository;
pub use repositories::teacher::{SeaOrmTeacherRepository, TeacherRepository};

/// Persistence gateway: owns the connection pool and hands out repositories.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    /// Private in-memory database with a single pooled connection, so every
    /// query sees the same data.
    pub async fn in_memory() -> Result<Self> {
        Self::with_pool_options("sqlite::memory:", 1, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)
                    .with_context(|| format!("Failed to create database file {path_str}"))?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt)
            .await
            .context("Failed to connect to database")?;

        migrator::Migrator::up(&conn, None)
            .await
            .context("Failed to apply migrations")?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await
            .context("Database ping failed")?;
        Ok(())
    }

    #[must_use]
    pub fn courses(&self) -> CourseRepository {
        CourseRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn teachers(&self) -> SeaOrmTeacherRepository {
        SeaOrmTeacherRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn enrollments(&self) -> EnrollmentRepository {
        EnrollmentRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn payments(&self) -> PaymentRepository {
        PaymentRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn admins(&self) -> AdminRepository {
        AdminRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn stats(&self) -> StatsRepository {
        StatsRepository::new(self.conn.clone())
    }
}
