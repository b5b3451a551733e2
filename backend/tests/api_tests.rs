//! HTTP API tests
//!
//! These drive the full router with `tower::ServiceExt::oneshot`. The pool
//! connects lazily to a closed port, so every request here is answered
//! either before any query runs or with the database unreachable.

use std::{sync::Arc, time::Duration};

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use getvolunteer_backend::{create_app, AppState, Config};

// ============================================================================
// Helpers
// ============================================================================

/// Nothing listens on port 1
const UNREACHABLE_DATABASE_URL: &str = "postgres://getvolunteer@127.0.0.1:1/getvolunteer_test";

fn test_app() -> Router {
    let config: Config = Config::defaults("test")
        .and_then(|b| b.set_override("database.url", UNREACHABLE_DATABASE_URL))
        .and_then(|b| b.build())
        .and_then(|c| c.try_deserialize())
        .expect("test configuration");

    let db = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(250))
        .connect_lazy(&config.database.url)
        .expect("lazy pool");

    create_app(AppState {
        db,
        config: Arc::new(config),
    })
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn volunteer_body() -> Value {
    json!({
        "name": "Ana Souza",
        "email": "ana@example.org",
        "password": "correct horse",
        "skills": "Cooking, logistics"
    })
}

fn need_body() -> Value {
    json!({
        "title": "Food bank sorting",
        "description": "Sort donated cans on Saturday mornings",
        "num_volunteers_needed": 4,
        "format": "in-person",
        "contact_name": "Jo",
        "contact_email": "jo@foodbank.org",
        "owner_id": 1
    })
}

fn assert_validation_error(body: &Value, field: &str) {
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["field"], field);
    assert!(body["error"]["message"].is_string());
}

// ============================================================================
// Root
// ============================================================================

#[tokio::test]
async fn test_root_returns_welcome_message() {
    let (status, body) = send(test_app(), Method::GET, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to getVolunteer Backend API!");
}

#[tokio::test]
async fn test_health_reports_unreachable_database() {
    let (status, body) = send(test_app(), Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "DATABASE_UNAVAILABLE");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .starts_with("Database connection failed"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (status, _) = send(test_app(), Method::GET, "/api/v1/unknown", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Volunteers
// ============================================================================

#[tokio::test]
async fn test_create_volunteer_rejects_invalid_email() {
    let mut body = volunteer_body();
    body["email"] = json!("not-an-email");

    let (status, body) = send(test_app(), Method::POST, "/api/v1/volunteers", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_validation_error(&body, "email");
}

#[tokio::test]
async fn test_create_volunteer_rejects_short_password() {
    let mut body = volunteer_body();
    body["password"] = json!("short");

    let (status, body) = send(test_app(), Method::POST, "/api/v1/volunteers", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_validation_error(&body, "password");
    assert_eq!(
        body["error"]["message"],
        "Password must be at least 8 characters"
    );
}

#[tokio::test]
async fn test_create_volunteer_rejects_blank_name() {
    let mut body = volunteer_body();
    body["name"] = json!("   ");

    let (status, body) = send(test_app(), Method::POST, "/api/v1/volunteers", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_validation_error(&body, "name");
}

#[tokio::test]
async fn test_create_volunteer_requires_password_field() {
    let mut body = volunteer_body();
    body.as_object_mut().unwrap().remove("password");

    let (status, _) = send(test_app(), Method::POST, "/api/v1/volunteers", Some(body)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_volunteer_rejects_invalid_phone() {
    let mut body = volunteer_body();
    body["phone"] = json!("call me maybe");

    let (status, body) = send(test_app(), Method::PUT, "/api/v1/volunteers/1", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_validation_error(&body, "phone");
}

#[tokio::test]
async fn test_create_volunteer_requires_json_content_type() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/volunteers")
        .body(Body::from(volunteer_body().to_string()))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_list_volunteers_rejects_negative_skip() {
    let (status, _) = send(test_app(), Method::GET, "/api/v1/volunteers?skip=-1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_volunteers_rejects_non_numeric_limit() {
    let (status, _) = send(test_app(), Method::GET, "/api/v1/volunteers?limit=all", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_volunteer_rejects_non_numeric_id() {
    let (status, _) = send(test_app(), Method::GET, "/api/v1/volunteers/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Needs
// ============================================================================

#[tokio::test]
async fn test_create_need_rejects_unknown_format() {
    let mut body = need_body();
    body["format"] = json!("hybrid");

    let (status, _) = send(test_app(), Method::POST, "/api/v1/needs", Some(body)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_need_rejects_zero_volunteers() {
    let mut body = need_body();
    body["num_volunteers_needed"] = json!(0);

    let (status, body) = send(test_app(), Method::POST, "/api/v1/needs", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_validation_error(&body, "num_volunteers_needed");
}

#[tokio::test]
async fn test_create_need_rejects_invalid_contact_email() {
    let mut body = need_body();
    body["contact_email"] = json!("jo at foodbank");

    let (status, body) = send(test_app(), Method::POST, "/api/v1/needs", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_validation_error(&body, "contact_email");
}

#[tokio::test]
async fn test_update_need_rejects_blank_title() {
    let mut body = need_body();
    body["title"] = json!("");

    let (status, body) = send(test_app(), Method::PUT, "/api/v1/needs/1", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_validation_error(&body, "title");
}

// ============================================================================
// Matches
// ============================================================================

#[tokio::test]
async fn test_create_match_rejects_blank_details() {
    let body = json!({
        "volunteer_id": 1,
        "need_id": 1,
        "match_details": "  "
    });

    let (status, body) = send(test_app(), Method::POST, "/api/v1/matches", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_validation_error(&body, "match_details");
}

#[tokio::test]
async fn test_matches_collection_has_no_list_route() {
    let (status, _) = send(test_app(), Method::GET, "/api/v1/matches", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
