#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use classflow::router::init_router;
use classflow::state::AppState;
use classflow_config::{CorsConfig, RateLimitConfig};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

/// App with rate limiting off so tests can fire requests freely.
pub fn setup_test_app(pool: PgPool) -> Router {
    let rate_limit = RateLimitConfig {
        enabled: false,
        ..RateLimitConfig::default()
    };
    setup_test_app_with_rate_limit(pool, rate_limit)
}

pub fn setup_test_app_with_rate_limit(pool: PgPool, rate_limit: RateLimitConfig) -> Router {
    let cors = CorsConfig::from_lookup(|_| None);
    init_router(AppState::new(pool, cors, rate_limit))
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Sends `request` and returns the status with the decoded JSON body
/// (`Value::Null` for an empty body).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn unique_code(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..8])
}

pub async fn create_test_teacher(pool: &PgPool, name: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO teachers (code, name, email) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(unique_code("T"))
    .bind(name)
    .bind(format!("{}@test.com", Uuid::new_v4()))
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_manager(pool: &PgPool, name: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>("INSERT INTO managers (code, name) VALUES ($1, $2) RETURNING id")
        .bind(unique_code("M"))
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_test_student(pool: &PgPool, name: &str, class_id: Option<Uuid>) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO students (code, name, class_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(unique_code("S"))
    .bind(name)
    .bind(class_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_holiday(pool: &PgPool, date: &str, name: &str) {
    sqlx::query("INSERT INTO holidays (date, name) VALUES ($1::DATE, $2)")
        .bind(date)
        .bind(name)
        .execute(pool)
        .await
        .unwrap();
}

/// Creates a class through the API and returns its detail body.
pub async fn create_class_via_api(
    app: &Router,
    start_date: &str,
    week_day: i32,
    total_sessions: i32,
) -> Value {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/classes",
            serde_json::json!({
                "code": unique_code("C"),
                "name": "Test Class",
                "start_date": start_date,
                "week_day": week_day,
                "total_sessions": total_sessions,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create class failed: {body}");
    body
}
