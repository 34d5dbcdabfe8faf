use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use tracing::info;

use crate::db::Store;
use crate::domain::EnrollmentStatus;
use crate::models::admin::Principal;
use crate::models::stats::OverviewStats;
use crate::services::admin_service::{AdminError, AdminService};
use crate::services::auth::{
    AdminAuthenticator, Authenticator, Credentials, admin_password_hash, generate_admin_salt,
};

/// Number of calendar months shown on the dashboard, current month included.
const OVERVIEW_MONTHS: u32 = 3;

pub struct SeaOrmAdminService {
    store: Store,
    authenticator: AdminAuthenticator,
}

impl SeaOrmAdminService {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self {
            authenticator: AdminAuthenticator::new(store.admins()),
            store,
        }
    }
}

/// `(year, month)` for the month `back` months before `now`'s month.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn month_before(now: DateTime<Utc>, back: u32) -> (i32, u32) {
    let index = now.year() * 12 + now.month0() as i32 - back as i32;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// `YYYY-MM` labels, oldest first, ending with `now`'s month.
#[must_use]
pub fn month_labels(now: DateTime<Utc>, count: u32) -> Vec<String> {
    (0..count)
        .rev()
        .map(|back| {
            let (year, month) = month_before(now, back);
            format!("{year:04}-{month:02}")
        })
        .collect()
}

#[async_trait]
impl AdminService for SeaOrmAdminService {
    async fn overview_stats_at(&self, now: DateTime<Utc>) -> Result<OverviewStats, AdminError> {
        let months = month_labels(now, OVERVIEW_MONTHS);
        let (year, month) = month_before(now, OVERVIEW_MONTHS - 1);
        let since = format!("{year:04}-{month:02}-01 00:00:00");

        let stats = self.store.stats();
        let courses = stats.courses_per_month(&since).await?;
        let income = stats.income_per_month(&since).await?;
        let pending = self
            .store
            .enrollments()
            .count_by_status(EnrollmentStatus::Pending)
            .await?;

        let new_classes_per_month = months
            .iter()
            .map(|label| {
                courses
                    .iter()
                    .find(|row| &row.month == label)
                    .map_or(0, |row| row.total)
            })
            .collect();

        let income_per_month = months
            .iter()
            .map(|label| {
                income
                    .iter()
                    .find(|row| &row.month == label)
                    .map_or(0.0, |row| row.total)
            })
            .collect();

        Ok(OverviewStats {
            months,
            new_classes_per_month,
            income_per_month,
            pending_enrollments: i64::try_from(pending).unwrap_or(i64::MAX),
        })
    }

    async fn login(&self, credentials: &Credentials) -> Result<Principal, AdminError> {
        Ok(self.authenticator.authenticate(credentials).await?)
    }

    async fn ensure_admin(
        &self,
        username: &str,
        password: &str,
        name: &str,
    ) -> Result<bool, AdminError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AdminError::InvalidInput(
                "Username cannot be empty".to_string(),
            ));
        }
        if password.is_empty() {
            return Err(AdminError::InvalidInput(
                "Password cannot be empty".to_string(),
            ));
        }

        let admins = self.store.admins();
        if admins.get_by_username(username).await?.is_some() {
            return Ok(false);
        }

        let salt = generate_admin_salt();
        let hash = admin_password_hash(password, &salt)?;
        let admin = admins.create(username, name.trim(), &hash, &salt).await?;

        info!(admin_id = admin.id, username, "Admin account created");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn creds(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn month_labels_cross_year_boundary() {
        assert_eq!(
            month_labels(at("2025-02-15T12:00:00Z"), 3),
            vec!["2024-12", "2025-01", "2025-02"]
        );
        assert_eq!(
            month_labels(at("2025-07-01T00:00:00Z"), 3),
            vec!["2025-05", "2025-06", "2025-07"]
        );
    }

    #[tokio::test]
    async fn empty_store_reports_zeroes_for_three_months() {
        let svc = SeaOrmAdminService::new(Store::in_memory().await.unwrap());
        let stats = svc.overview_stats_at(at("2025-03-10T08:00:00Z")).await.unwrap();

        assert_eq!(stats.months, vec!["2025-01", "2025-02", "2025-03"]);
        assert_eq!(stats.new_classes_per_month, vec![0, 0, 0]);
        assert_eq!(stats.income_per_month, vec![0.0, 0.0, 0.0]);
        assert_eq!(stats.pending_enrollments, 0);
    }

    #[tokio::test]
    async fn ensure_admin_is_idempotent_and_login_works() {
        let svc = SeaOrmAdminService::new(Store::in_memory().await.unwrap());
        assert!(svc.ensure_admin("admin", "admin123", "Site Administrator").await.unwrap());
        assert!(!svc.ensure_admin("admin", "other", "Someone").await.unwrap());

        let principal = svc.login(&creds("admin", "admin123")).await.unwrap();
        assert_eq!(principal.role, Role::Admin);
        assert_eq!(principal.name, "Site Administrator");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let svc = SeaOrmAdminService::new(Store::in_memory().await.unwrap());
        svc.ensure_admin("admin", "admin123", "Site Administrator")
            .await
            .unwrap();

        let wrong = svc.login(&creds("admin", "nope")).await.unwrap_err();
        let unknown = svc.login(&creds("ghost", "admin123")).await.unwrap_err();
        let empty = svc.login(&creds("", "")).await.unwrap_err();

        assert_eq!(wrong.to_string(), "Invalid credentials");
        assert_eq!(wrong.to_string(), unknown.to_string());
        assert_eq!(wrong.to_string(), empty.to_string());
    }
}
