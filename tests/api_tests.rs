use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use coursehub::api::AppState;
use coursehub::config::Config;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

fn test_config() -> Config {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;
    config
}

async fn spawn_state() -> Arc<AppState> {
    coursehub::api::create_app_state_from_config(test_config(), None)
        .await
        .expect("Failed to create app state")
}

async fn spawn_app() -> Router {
    coursehub::api::router(spawn_state().await)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, teacher: Option<i32>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
    if let Some(id) = teacher {
        builder = builder.header("X-Teacher-Id", id.to_string());
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn create_course(app: &Router, teacher: i32, title: &str, price: f64) -> Value {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/courses",
            Some(teacher),
            &json!({
                "title": title,
                "description": "desc",
                "instructor": "John Doe",
                "price": price,
                "category": "Programming"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"].clone()
}

#[tokio::test]
async fn test_health() {
    let app = spawn_app().await;
    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_course_create_then_get() {
    let app = spawn_app().await;
    let created = create_course(&app, 1, "Rust 101", 49.5).await;

    assert_eq!(created["status"], "active");
    assert_eq!(created["teacher_id"], 1);

    let id = created["id"].as_i64().unwrap();
    let (status, body) = send(&app, get(&format!("/api/courses/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["title"], "Rust 101");
    assert_eq!(body["data"]["price"], 49.5);

    let (status, body) = send(&app, get("/api/courses/9999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Course not found");
}

#[tokio::test]
async fn test_courses_list_newest_first() {
    let app = spawn_app().await;
    create_course(&app, 1, "A", 10.0).await;
    create_course(&app, 1, "B", 10.0).await;

    let (status, body) = send(&app, get("/api/courses")).await;
    assert_eq!(status, StatusCode::OK);

    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["B", "A"]);
}

#[tokio::test]
async fn test_course_create_validation() {
    let app = spawn_app().await;

    let (status, body) = send(
        &app,
        json_request("POST", "/api/courses", Some(1), &json!({ "title": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Course title cannot be empty");

    let (status, body) = send(
        &app,
        json_request("POST", "/api/courses", None, &json!({ "title": "No teacher" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Teacher ID is required");
}

#[tokio::test]
async fn test_disabled_courses_hidden_from_active_list() {
    let app = spawn_app().await;
    let course = create_course(&app, 1, "Hidden", 10.0).await;
    let id = course["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/api/courses/{id}/status"),
            Some(1),
            &json!({ "status": "disabled" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "disabled");

    let (_, body) = send(&app, get("/api/courses/active")).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, body) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/api/courses/{id}/status"),
            Some(1),
            &json!({ "status": "archived" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Status must be either \"active\" or \"disabled\"");
}

#[tokio::test]
async fn test_non_owner_cannot_change_course() {
    let app = spawn_app().await;
    let course = create_course(&app, 1, "Owned", 10.0).await;
    let id = course["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/api/courses/{id}/status"),
            Some(2),
            &json!({ "status": "disabled" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Course not found or access denied");

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/courses/{id}"),
            Some(2),
            &json!({ "title": "Stolen" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, get(&format!("/api/courses/{id}"))).await;
    assert_eq!(body["data"]["title"], "Owned");
    assert_eq!(body["data"]["status"], "active");
}

#[tokio::test]
async fn test_delete_course_twice() {
    let app = spawn_app().await;
    let course = create_course(&app, 1, "Short lived", 10.0).await;
    let id = course["id"].as_i64().unwrap();

    let delete = || {
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/courses/{id}"))
            .header("X-Teacher-Id", "1")
            .body(Body::empty())
            .unwrap()
    };

    let (status, body) = send(&app, delete()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], true);

    let (status, body) = send(&app, delete()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], false);
}

#[tokio::test]
async fn test_teacher_search_is_scoped() {
    let app = spawn_app().await;
    create_course(&app, 1, "Advanced Rust", 10.0).await;
    create_course(&app, 2, "Rust for Artists", 10.0).await;

    let request = Request::builder()
        .uri("/api/courses/teacher/search?keyword=rust")
        .header("X-Teacher-Id", "1")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    let found = body["data"].as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["title"], "Advanced Rust");
}

#[tokio::test]
async fn test_teacher_register_and_login() {
    let app = spawn_app().await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/teachers/register",
            None,
            &json!({
                "username": "teacher3",
                "email": "teacher3@example.com",
                "password": "secret1",
                "name": "Ada",
                "specialties": ["Rust", "SQL"]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["message"], "Teacher registered successfully");
    assert_eq!(body["data"]["specialties"], json!(["Rust", "SQL"]));
    assert!(body["data"].get("password_hash").is_none());

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/teachers/login",
            None,
            &json!({ "username": "teacher3", "password": "secret1" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "teacher3");

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/teachers/login",
            None,
            &json!({ "username": "teacher3", "password": "wrong-password" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/teachers/register",
            None,
            &json!({
                "username": "teacher1",
                "email": "other@example.com",
                "password": "secret1",
                "name": "Dup"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username already exists");
}

#[tokio::test]
async fn test_enrollment_requires_terms() {
    let app = spawn_app().await;
    let course = create_course(&app, 1, "Terms", 10.0).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/enrollments",
            None,
            &json!({
                "course_id": course["id"],
                "first_name": "Ann",
                "last_name": "Lee",
                "email": "ann@example.com",
                "agree_to_terms": false
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Terms and conditions must be agreed to");

    let (_, body) = send(&app, get("/api/enrollments")).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_checkout_then_complete_confirms_enrollment() {
    let app = spawn_app().await;
    let course = create_course(&app, 1, "Paid", 120.0).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/enrollments/checkout",
            None,
            &json!({
                "enrollment": {
                    "course_id": course["id"],
                    "first_name": "Ann",
                    "last_name": "Lee",
                    "email": "ann@example.com",
                    "agree_to_terms": true
                },
                "payment": {
                    "amount": 120.0,
                    "payment_method": "card",
                    "reference": "REF-1"
                }
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let enrollment_code = body["data"]["enrollment"]["enrollment_id"]
        .as_str()
        .unwrap()
        .to_string();
    let payment_code = body["data"]["payment"]["payment_id"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(enrollment_code.starts_with("ENR-"));
    assert!(payment_code.starts_with("PAY-"));
    assert_eq!(body["data"]["enrollment"]["status"], "pending");
    assert_eq!(body["data"]["payment"]["enrollment_id"], enrollment_code);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/payments/{payment_code}/complete"),
            None,
            &json!({ "transaction_id": "TX-42" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(body["data"]["transaction_id"], "TX-42");
    assert!(body["data"]["completed_at"].is_string());

    let (_, body) = send(&app, get(&format!("/api/enrollments/{enrollment_code}"))).await;
    assert_eq!(body["data"]["status"], "confirmed");

    let (_, body) = send(&app, get("/api/payments/stats/overview")).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["completed"], 1);
}

#[tokio::test]
async fn test_complete_unknown_payment() {
    let app = spawn_app().await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/payments/PAY-0-NOPE/complete",
            None,
            &json!({ "transaction_id": "TX-1" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Payment not found");

    let (status, body) = send(
        &app,
        json_request("POST", "/api/payments/PAY-0-NOPE/complete", None, &json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Transaction ID is required");
}

#[tokio::test]
async fn test_admin_overview_on_empty_store() {
    let app = spawn_app().await;
    let (status, body) = send(&app, get("/api/admin/overview")).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["months"].as_array().unwrap().len(), 3);
    assert_eq!(data["newClassesPerMonth"], json!([0, 0, 0]));
    assert_eq!(data["incomePerMonth"], json!([0.0, 0.0, 0.0]));
    assert_eq!(data["pendingEnrollments"], 0);
}

#[tokio::test]
async fn test_admin_login_errors_are_indistinguishable() {
    let state = spawn_state().await;
    state
        .admin_service()
        .ensure_admin("admin", "admin123", "Site Administrator")
        .await
        .unwrap();
    let app = coursehub::api::router(state);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/admin/auth/login",
            None,
            &json!({ "username": "admin", "password": "admin123" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "admin");
    assert_eq!(body["data"]["name"], "Site Administrator");

    let (wrong_status, wrong_password) = send(
        &app,
        json_request(
            "POST",
            "/api/admin/auth/login",
            None,
            &json!({ "username": "admin", "password": "nope" }),
        ),
    )
    .await;
    let (unknown_status, unknown_user) = send(
        &app,
        json_request(
            "POST",
            "/api/admin/auth/login",
            None,
            &json!({ "username": "ghost", "password": "nope" }),
        ),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_user);
}

#[tokio::test]
async fn test_invalid_json_is_bad_request() {
    let app = spawn_app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/enrollments")
        .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request body")
    );
}

#[tokio::test]
async fn test_enrollment_and_payment_errors_carry_message() {
    let app = spawn_app().await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/enrollments",
            None,
            &json!({
                "course_id": 1,
                "first_name": "Ann",
                "last_name": "Lee",
                "email": "ann@example.com",
                "agree_to_terms": false
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Terms and conditions must be agreed to");
    assert_eq!(body["error"], body["message"]);

    let (status, body) = send(&app, get("/api/enrollments/ENR-0-MISSING")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Enrollment not found");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/payments",
            None,
            &json!({ "enrollment_id": "ENR-1", "amount": 0, "payment_method": "card", "reference": "R" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Payment amount must be greater than 0");

    let (status, body) = send(&app, get("/api/payments/PAY-0-MISSING")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Payment not found");

    // Course routes keep the plain error envelope.
    let (_, body) = send(&app, get("/api/courses/9999")).await;
    assert!(body.get("message").is_none());
}
