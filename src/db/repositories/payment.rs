use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::domain::{PaymentStatus, store_timestamp};
use crate::entities::{payments, prelude::*};
use crate::models::payment::{NewPayment, Payment, PaymentStats};

pub struct PaymentRepository {
    conn: DatabaseConnection,
}

impl PaymentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn decode_all(rows: Vec<payments::Model>) -> Result<Vec<Payment>> {
        rows.into_iter()
            .map(|m| Payment::try_from(m).context("Failed to decode payment"))
            .collect()
    }

    pub async fn create(&self, code: &str, input: &NewPayment) -> Result<Payment> {
        let model = payments::ActiveModel {
            id: NotSet,
            payment_id: Set(code.to_string()),
            enrollment_id: Set(input.enrollment_id.clone()),
            amount: Set(input.amount),
            payment_method: Set(input.payment_method.trim().to_string()),
            reference: Set(input.reference.trim().to_string()),
            transaction_id: Set(None),
            status: Set(PaymentStatus::Pending.as_str().to_string()),
            created_at: NotSet,
            completed_at: Set(None),
        }
        .insert(&self.conn)
        .await
        .context("Failed to create payment")?;

        Payment::try_from(model).context("Failed to decode payment")
    }

    pub async fn get_by_code(&self, code: &str) -> Result<Option<Payment>> {
        Payments::find()
            .filter(payments::Column::PaymentId.eq(code))
            .one(&self.conn)
            .await
            .context("Failed to get payment")?
            .map(|m| Payment::try_from(m).context("Failed to decode payment"))
            .transpose()
    }

    pub async fn list_by_enrollment(&self, enrollment_code: &str) -> Result<Vec<Payment>> {
        let rows = Payments::find()
            .filter(payments::Column::EnrollmentId.eq(enrollment_code))
            .order_by_desc(payments::Column::CreatedAt)
            .order_by_desc(payments::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list payments by enrollment")?;

        Self::decode_all(rows)
    }

    pub async fn list_all(&self) -> Result<Vec<Payment>> {
        let rows = Payments::find()
            .order_by_desc(payments::Column::CreatedAt)
            .order_by_desc(payments::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list payments")?;

        Self::decode_all(rows)
    }

    /// Writes the new status. `completed_at` is stamped only when moving to `completed`;
    /// `transaction_id` is written only when supplied. Returns the number of rows touched.
    pub async fn set_status(
        &self,
        code: &str,
        status: PaymentStatus,
        transaction_id: Option<&str>,
    ) -> Result<u64> {
        let mut update = Payments::update_many()
            .col_expr(payments::Column::Status, Expr::value(status.as_str()))
            .filter(payments::Column::PaymentId.eq(code));

        if let Some(tx) = transaction_id {
            update = update.col_expr(payments::Column::TransactionId, Expr::value(tx));
        }
        if status == PaymentStatus::Completed {
            update = update.col_expr(
                payments::Column::CompletedAt,
                Expr::value(store_timestamp(chrono::Utc::now())),
            );
        }

        let result = update
            .exec(&self.conn)
            .await
            .context("Failed to update payment status")?;

        Ok(result.rows_affected)
    }

    pub async fn stats(&self) -> Result<PaymentStats> {
        let rows: Vec<(String, i64)> = Payments::find()
            .select_only()
            .column(payments::Column::Status)
            .column_as(payments::Column::Id.count(), "count")
            .group_by(payments::Column::Status)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to compute payment stats")?;

        let mut stats = PaymentStats::default();
        for (status, count) in rows {
            let count = u64::try_from(count).unwrap_or_default();
            stats.total += count;
            match status.parse::<PaymentStatus>() {
                Ok(PaymentStatus::Completed) => stats.completed += count,
                Ok(PaymentStatus::Pending) => stats.pending += count,
                Ok(PaymentStatus::Failed) => stats.failed += count,
                Ok(PaymentStatus::Refunded) | Err(_) => {}
            }
        }

        Ok(stats)
    }
}
