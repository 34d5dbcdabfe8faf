//! End-to-end flows through the service layer against an in-memory store.

use coursehub::cli::seed_sample_data;
use coursehub::config::Config;
use coursehub::db::Store;
use coursehub::domain::{CourseStatus, EnrollmentStatus, PaymentStatus};
use coursehub::models::course::NewCourse;
use coursehub::models::enrollment::NewEnrollment;
use coursehub::models::payment::PaymentDetails;
use coursehub::services::{Credentials, EnrollmentError};
use coursehub::state::SharedState;

async fn shared_state() -> SharedState {
    let store = Store::in_memory().await.expect("in-memory store");
    SharedState::from_store(Config::default(), store)
}

fn course(title: &str, price: f64) -> NewCourse {
    NewCourse {
        title: title.to_string(),
        description: "desc".to_string(),
        instructor: "Jane Smith".to_string(),
        price,
        category: "Art".to_string(),
        teacher_id: 2,
        ..NewCourse::default()
    }
}

fn enrollment(course_id: i32, email: &str) -> NewEnrollment {
    NewEnrollment {
        course_id,
        first_name: "Sam".to_string(),
        last_name: "Rivera".to_string(),
        email: email.to_string(),
        agree_to_terms: true,
        ..NewEnrollment::default()
    }
}

#[tokio::test]
async fn requested_status_is_ignored_on_create() {
    let state = shared_state().await;
    let mut input = course("Sketching", 30.0);
    input.status = Some(CourseStatus::Disabled);

    let created = state.course_service.create(input).await.unwrap();
    assert_eq!(created.status, CourseStatus::Active);

    let active = state.course_service.list_active().await.unwrap();
    assert_eq!(active.len(), 1);
}

#[tokio::test]
async fn failed_payment_leaves_enrollment_behind() {
    let state = shared_state().await;
    let created = state
        .course_service
        .create(course("Oil Painting", 80.0))
        .await
        .unwrap();

    let err = state
        .enrollment_service
        .enroll_and_pay(
            enrollment(created.id, "sam@example.com"),
            PaymentDetails {
                amount: 0.0,
                payment_method: "card".to_string(),
                reference: "R-1".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EnrollmentError::InvalidInput(ref msg) if msg == "Payment amount must be greater than 0"));

    let left = state
        .enrollment_service
        .list_enrollments_by_email("sam@example.com")
        .await
        .unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].status, EnrollmentStatus::Pending);
    assert!(
        state
            .enrollment_service
            .list_all_payments()
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn completed_payment_counts_as_income() {
    let state = shared_state().await;
    let created = state
        .course_service
        .create(course("Ceramics", 60.0))
        .await
        .unwrap();

    let checkout = state
        .enrollment_service
        .enroll_and_pay(
            enrollment(created.id, "kim@example.com"),
            PaymentDetails {
                amount: 60.0,
                payment_method: "card".to_string(),
                reference: "R-2".to_string(),
            },
        )
        .await
        .unwrap();

    let before = state.admin_service.overview_stats().await.unwrap();
    assert_eq!(before.pending_enrollments, 1);
    assert_eq!(before.income_per_month.iter().sum::<f64>(), 0.0);

    let payment = state
        .enrollment_service
        .complete_payment(&checkout.payment.payment_id, "TX-9")
        .await
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Completed);

    let after = state.admin_service.overview_stats().await.unwrap();
    assert_eq!(after.pending_enrollments, 0);
    assert_eq!(after.new_classes_per_month.last(), Some(&1));
    assert_eq!(after.income_per_month.last(), Some(&60.0));
}

#[tokio::test]
async fn refunded_payment_has_no_completion_time() {
    let state = shared_state().await;
    let created = state
        .course_service
        .create(course("Calligraphy", 20.0))
        .await
        .unwrap();
    let checkout = state
        .enrollment_service
        .enroll_and_pay(
            enrollment(created.id, "lee@example.com"),
            PaymentDetails {
                amount: 20.0,
                payment_method: "transfer".to_string(),
                reference: "R-3".to_string(),
            },
        )
        .await
        .unwrap();

    let refunded = state
        .enrollment_service
        .update_payment_status(&checkout.payment.payment_id, PaymentStatus::Refunded, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refunded.status, PaymentStatus::Refunded);
    assert!(refunded.completed_at.is_none());
}

#[tokio::test]
async fn demo_teacher_can_log_in() {
    let state = shared_state().await;
    let principal = state
        .teacher_service
        .login(&Credentials {
            username: "teacher1".to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(principal.name, "John Doe");
}

#[tokio::test]
async fn sample_data_seeding_is_idempotent() {
    let state = shared_state().await;
    let now = chrono::Utc::now();

    let first = seed_sample_data(&state.store, now).await.unwrap();
    assert!(first.courses > 0);

    let second = seed_sample_data(&state.store, now).await.unwrap();
    assert_eq!(second.courses, 0);
    assert_eq!(second.enrollments, 0);

    let courses = state.course_service.list_all().await.unwrap();
    assert_eq!(courses.len(), first.courses);
    assert!(courses.iter().all(|c| c.title.starts_with("[Sample]")));
}
