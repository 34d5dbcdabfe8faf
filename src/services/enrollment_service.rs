//! Domain service for enrollments and their payments.
//!
//! Enrollments and payments are linked by the enrollment's external code.
//! Multi-step operations ([`EnrollmentService::complete_payment`] and
//! [`EnrollmentService::enroll_and_pay`]) run as separate statements with no
//! enclosing transaction: a failure in a later step leaves the earlier writes
//! in place.

use serde::Serialize;
use thiserror::Error;

use crate::domain::{EnrollmentStatus, PaymentStatus};
use crate::models::enrollment::{Enrollment, NewEnrollment};
use crate::models::payment::{NewPayment, Payment, PaymentDetails, PaymentStats};

#[derive(Debug, Error)]
pub enum EnrollmentError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Store(String),
}

impl From<anyhow::Error> for EnrollmentError {
    fn from(err: anyhow::Error) -> Self {
        Self::Store(format!("{err:#}"))
    }
}

impl From<sea_orm::DbErr> for EnrollmentError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Store(err.to_string())
    }
}

/// Result of [`EnrollmentService::enroll_and_pay`].
#[derive(Debug, Clone, Serialize)]
pub struct Checkout {
    pub enrollment: Enrollment,
    pub payment: Payment,
}

#[async_trait::async_trait]
pub trait EnrollmentService: Send + Sync {
    /// Validates the applicant and stores a `pending` enrollment under a fresh code.
    async fn create_enrollment(&self, input: NewEnrollment) -> Result<Enrollment, EnrollmentError>;

    async fn get_enrollment(&self, code: &str) -> Result<Option<Enrollment>, EnrollmentError>;

    async fn list_enrollments_by_email(
        &self,
        email: &str,
    ) -> Result<Vec<Enrollment>, EnrollmentError>;

    async fn list_enrollments_by_course(
        &self,
        course_id: i32,
    ) -> Result<Vec<Enrollment>, EnrollmentError>;

    async fn list_all_enrollments(&self) -> Result<Vec<Enrollment>, EnrollmentError>;

    async fn update_enrollment_status(
        &self,
        code: &str,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>, EnrollmentError>;

    /// Stores a `pending` payment. The referenced enrollment is not checked.
    async fn create_payment(&self, input: NewPayment) -> Result<Payment, EnrollmentError>;

    async fn get_payment(&self, code: &str) -> Result<Option<Payment>, EnrollmentError>;

    async fn list_payments_by_enrollment(
        &self,
        enrollment_code: &str,
    ) -> Result<Vec<Payment>, EnrollmentError>;

    async fn list_all_payments(&self) -> Result<Vec<Payment>, EnrollmentError>;

    /// `completed_at` is set only when `status` is `completed`.
    async fn update_payment_status(
        &self,
        code: &str,
        status: PaymentStatus,
        transaction_id: Option<&str>,
    ) -> Result<Option<Payment>, EnrollmentError>;

    /// Marks the payment completed, then confirms its enrollment.
    ///
    /// # Errors
    ///
    /// Returns [`EnrollmentError::NotFound`] when the payment cannot be read
    /// back after the update.
    async fn complete_payment(
        &self,
        code: &str,
        transaction_id: &str,
    ) -> Result<Payment, EnrollmentError>;

    async fn payment_stats(&self) -> Result<PaymentStats, EnrollmentError>;

    /// Creates the enrollment, then a payment pointing at its code.
    /// If the payment fails the enrollment is kept.
    async fn enroll_and_pay(
        &self,
        enrollment: NewEnrollment,
        payment: PaymentDetails,
    ) -> Result<Checkout, EnrollmentError>;
}
