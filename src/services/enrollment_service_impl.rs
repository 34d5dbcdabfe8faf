use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::{info, warn};

use crate::db::Store;
use crate::domain::{EnrollmentStatus, PaymentStatus, codes};
use crate::models::enrollment::{Enrollment, NewEnrollment};
use crate::models::payment::{NewPayment, Payment, PaymentDetails, PaymentStats};
use crate::services::enrollment_service::{Checkout, EnrollmentError, EnrollmentService};

pub struct SeaOrmEnrollmentService {
    store: Store,
}

impl SeaOrmEnrollmentService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

fn invalid(msg: &str) -> EnrollmentError {
    EnrollmentError::InvalidInput(msg.to_string())
}

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));
    re.is_match(email)
}

fn validate_enrollment(input: &NewEnrollment) -> Result<(), EnrollmentError> {
    if input.course_id <= 0 {
        return Err(invalid("Invalid course ID"));
    }
    if input.first_name.trim().is_empty() {
        return Err(invalid("First name is required"));
    }
    if input.last_name.trim().is_empty() {
        return Err(invalid("Last name is required"));
    }
    if !is_valid_email(input.email.trim()) {
        return Err(invalid("Invalid email format"));
    }
    if !input.agree_to_terms {
        return Err(invalid("Terms and conditions must be agreed to"));
    }
    Ok(())
}

fn validate_payment(input: &NewPayment) -> Result<(), EnrollmentError> {
    if input.enrollment_id.trim().is_empty() {
        return Err(invalid("Enrollment ID is required"));
    }
    if input.amount.is_nan() || input.amount <= 0.0 {
        return Err(invalid("Payment amount must be greater than 0"));
    }
    if input.payment_method.trim().is_empty() {
        return Err(invalid("Payment method is required"));
    }
    if input.reference.trim().is_empty() {
        return Err(invalid("Payment reference is required"));
    }
    Ok(())
}

#[async_trait]
impl EnrollmentService for SeaOrmEnrollmentService {
    async fn create_enrollment(&self, input: NewEnrollment) -> Result<Enrollment, EnrollmentError> {
        validate_enrollment(&input)?;

        let code = codes::enrollment_code();
        let enrollment = self.store.enrollments().create(&code, &input).await?;

        metrics::counter!("enrollments_created_total").increment(1);
        info!(
            enrollment_id = %enrollment.enrollment_id,
            course_id = enrollment.course_id,
            "Enrollment created"
        );
        Ok(enrollment)
    }

    async fn get_enrollment(&self, code: &str) -> Result<Option<Enrollment>, EnrollmentError> {
        Ok(self.store.enrollments().get_by_code(code).await?)
    }

    async fn list_enrollments_by_email(
        &self,
        email: &str,
    ) -> Result<Vec<Enrollment>, EnrollmentError> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(invalid("Invalid email format"));
        }
        Ok(self.store.enrollments().list_by_email(email).await?)
    }

    async fn list_enrollments_by_course(
        &self,
        course_id: i32,
    ) -> Result<Vec<Enrollment>, EnrollmentError> {
        if course_id <= 0 {
            return Err(invalid("Invalid course ID"));
        }
        Ok(self.store.enrollments().list_by_course(course_id).await?)
    }

    async fn list_all_enrollments(&self) -> Result<Vec<Enrollment>, EnrollmentError> {
        Ok(self.store.enrollments().list_all().await?)
    }

    async fn update_enrollment_status(
        &self,
        code: &str,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>, EnrollmentError> {
        let updated = self.store.enrollments().update_status(code, status).await?;
        if updated.is_some() {
            info!(enrollment_id = code, %status, "Enrollment status changed");
        }
        Ok(updated)
    }

    async fn create_payment(&self, input: NewPayment) -> Result<Payment, EnrollmentError> {
        validate_payment(&input)?;

        let code = codes::payment_code();
        let payment = self.store.payments().create(&code, &input).await?;

        info!(
            payment_id = %payment.payment_id,
            enrollment_id = %payment.enrollment_id,
            amount = payment.amount,
            "Payment created"
        );
        Ok(payment)
    }

    async fn get_payment(&self, code: &str) -> Result<Option<Payment>, EnrollmentError> {
        Ok(self.store.payments().get_by_code(code).await?)
    }

    async fn list_payments_by_enrollment(
        &self,
        enrollment_code: &str,
    ) -> Result<Vec<Payment>, EnrollmentError> {
        Ok(self
            .store
            .payments()
            .list_by_enrollment(enrollment_code)
            .await?)
    }

    async fn list_all_payments(&self) -> Result<Vec<Payment>, EnrollmentError> {
        Ok(self.store.payments().list_all().await?)
    }

    async fn update_payment_status(
        &self,
        code: &str,
        status: PaymentStatus,
        transaction_id: Option<&str>,
    ) -> Result<Option<Payment>, EnrollmentError> {
        let payments = self.store.payments();
        if payments.set_status(code, status, transaction_id).await? == 0 {
            return Ok(None);
        }

        info!(payment_id = code, %status, "Payment status changed");
        Ok(payments.get_by_code(code).await?)
    }

    async fn complete_payment(
        &self,
        code: &str,
        transaction_id: &str,
    ) -> Result<Payment, EnrollmentError> {
        let payments = self.store.payments();
        payments
            .set_status(code, PaymentStatus::Completed, Some(transaction_id))
            .await?;

        // Read back separately; a row removed in between surfaces as NotFound.
        let payment = payments
            .get_by_code(code)
            .await?
            .ok_or_else(|| EnrollmentError::NotFound("Payment not found".to_string()))?;

        metrics::counter!("payments_completed_total").increment(1);
        info!(payment_id = code, transaction_id, "Payment completed");

        let confirmed = self
            .store
            .enrollments()
            .update_status(&payment.enrollment_id, EnrollmentStatus::Confirmed)
            .await?;

        if confirmed.is_some() {
            info!(enrollment_id = %payment.enrollment_id, "Enrollment confirmed");
        } else {
            warn!(
                payment_id = code,
                enrollment_id = %payment.enrollment_id,
                "Completed payment references no enrollment"
            );
        }

        Ok(payment)
    }

    async fn payment_stats(&self) -> Result<PaymentStats, EnrollmentError> {
        Ok(self.store.payments().stats().await?)
    }

    async fn enroll_and_pay(
        &self,
        enrollment: NewEnrollment,
        payment: PaymentDetails,
    ) -> Result<Checkout, EnrollmentError> {
        let enrollment = self.create_enrollment(enrollment).await?;
        let payment = self
            .create_payment(payment.for_enrollment(enrollment.enrollment_id.clone()))
            .await
            .inspect_err(|e| {
                warn!(
                    enrollment_id = %enrollment.enrollment_id,
                    error = %e,
                    "Payment failed after enrollment was created"
                );
            })?;

        Ok(Checkout {
            enrollment,
            payment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CourseStatus;
    use crate::models::course::NewCourse;

    async fn setup() -> (Store, SeaOrmEnrollmentService, i32) {
        let store = Store::in_memory().await.unwrap();
        let course = store
            .courses()
            .create(
                &NewCourse {
                    title: "Rust".to_string(),
                    price: 100.0,
                    teacher_id: 1,
                    ..NewCourse::default()
                },
                CourseStatus::Active,
            )
            .await
            .unwrap();
        (store.clone(), SeaOrmEnrollmentService::new(store), course.id)
    }

    fn applicant(course_id: i32) -> NewEnrollment {
        NewEnrollment {
            course_id,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            company: Some("Analytical Engines".to_string()),
            agree_to_terms: true,
        }
    }

    fn card(amount: f64) -> PaymentDetails {
        PaymentDetails {
            amount,
            payment_method: "card".to_string(),
            reference: "REF-1".to_string(),
        }
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("@c.d"));
    }

    #[tokio::test]
    async fn enrollment_without_terms_is_rejected_and_not_stored() {
        let (store, svc, course_id) = setup().await;
        let mut input = applicant(course_id);
        input.agree_to_terms = false;

        let err = svc.create_enrollment(input).await.unwrap_err();
        assert!(
            matches!(err, EnrollmentError::InvalidInput(m) if m == "Terms and conditions must be agreed to")
        );
        assert!(store.enrollments().list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn enrollment_starts_pending_with_generated_code() {
        let (_, svc, course_id) = setup().await;
        let enrollment = svc.create_enrollment(applicant(course_id)).await.unwrap();

        assert_eq!(enrollment.status, EnrollmentStatus::Pending);
        assert!(enrollment.enrollment_id.starts_with("ENR-"));
        assert_eq!(
            svc.list_enrollments_by_email("ada@example.com")
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn payment_validation_messages() {
        let (_, svc, _) = setup().await;

        let zero = card(0.0).for_enrollment("ENR-1");
        let err = svc.create_payment(zero).await.unwrap_err();
        assert!(
            matches!(err, EnrollmentError::InvalidInput(m) if m == "Payment amount must be greater than 0")
        );

        let mut no_method = card(5.0).for_enrollment("ENR-1");
        no_method.payment_method = " ".to_string();
        let err = svc.create_payment(no_method).await.unwrap_err();
        assert!(matches!(err, EnrollmentError::InvalidInput(m) if m == "Payment method is required"));
    }

    #[tokio::test]
    async fn completing_payment_confirms_enrollment() {
        let (_, svc, course_id) = setup().await;
        let checkout = svc
            .enroll_and_pay(applicant(course_id), card(100.0))
            .await
            .unwrap();
        assert_eq!(checkout.payment.status, PaymentStatus::Pending);
        assert_eq!(
            checkout.payment.enrollment_id,
            checkout.enrollment.enrollment_id
        );

        let payment = svc
            .complete_payment(&checkout.payment.payment_id, "TX-42")
            .await
            .unwrap();
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert_eq!(payment.transaction_id.as_deref(), Some("TX-42"));
        assert!(payment.completed_at.is_some());

        let enrollment = svc
            .get_enrollment(&checkout.enrollment.enrollment_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(enrollment.status, EnrollmentStatus::Confirmed);
    }

    #[tokio::test]
    async fn completing_unknown_payment_is_not_found() {
        let (_, svc, _) = setup().await;
        let err = svc.complete_payment("PAY-missing", "TX").await.unwrap_err();
        assert!(matches!(err, EnrollmentError::NotFound(m) if m == "Payment not found"));
    }

    #[tokio::test]
    async fn failed_payment_step_keeps_the_enrollment() {
        let (store, svc, course_id) = setup().await;
        let err = svc
            .enroll_and_pay(applicant(course_id), card(-1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, EnrollmentError::InvalidInput(_)));

        let enrollments = store.enrollments().list_all().await.unwrap();
        assert_eq!(enrollments.len(), 1);
        assert_eq!(enrollments[0].status, EnrollmentStatus::Pending);
        assert!(store.payments().list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn status_update_only_stamps_completion_for_completed() {
        let (_, svc, course_id) = setup().await;
        let checkout = svc
            .enroll_and_pay(applicant(course_id), card(10.0))
            .await
            .unwrap();
        let code = checkout.payment.payment_id;

        let failed = svc
            .update_payment_status(&code, PaymentStatus::Failed, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(failed.status, PaymentStatus::Failed);
        assert!(failed.completed_at.is_none());

        let stats = svc.payment_stats().await.unwrap();
        assert_eq!(
            stats,
            PaymentStats {
                total: 1,
                completed: 0,
                pending: 0,
                failed: 1
            }
        );

        assert!(
            svc.update_payment_status("PAY-none", PaymentStatus::Refunded, None)
                .await
                .unwrap()
                .is_none()
        );
    }
}
