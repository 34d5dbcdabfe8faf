use anyhow::{Context, Result};
use sea_orm::{ConnectionTrait, DatabaseConnection, FromQueryResult, Statement};

use crate::domain::PaymentStatus;

#[derive(Debug, Clone, FromQueryResult)]
pub struct MonthlyCount {
    pub month: String,
    pub total: i64,
}

#[derive(Debug, Clone, FromQueryResult)]
pub struct MonthlyAmount {
    pub month: String,
    pub total: f64,
}

/// Month-bucketed rollups used by the admin dashboard.
///
/// `since` is a store timestamp (`YYYY-MM-DD HH:MM:SS`); rows created at or
/// after it are bucketed by `strftime('%Y-%m', created_at)`.
pub struct StatsRepository {
    conn: DatabaseConnection,
}

impl StatsRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn courses_per_month(&self, since: &str) -> Result<Vec<MonthlyCount>> {
        let backend = self.conn.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            r"SELECT strftime('%Y-%m', created_at) AS month, COUNT(*) AS total
              FROM courses
              WHERE created_at >= ?
              GROUP BY month",
            [since.into()],
        );

        MonthlyCount::find_by_statement(stmt)
            .all(&self.conn)
            .await
            .context("Failed to count courses per month")
    }

    /// Sum of `amount` over completed payments, bucketed by the payment's creation month.
    pub async fn income_per_month(&self, since: &str) -> Result<Vec<MonthlyAmount>> {
        let backend = self.conn.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            r"SELECT strftime('%Y-%m', created_at) AS month, CAST(SUM(amount) AS REAL) AS total
              FROM payments
              WHERE status = ? AND created_at >= ?
              GROUP BY month",
            [PaymentStatus::Completed.as_str().into(), since.into()],
        );

        MonthlyAmount::find_by_statement(stmt)
            .all(&self.conn)
            .await
            .context("Failed to sum income per month")
    }
}
