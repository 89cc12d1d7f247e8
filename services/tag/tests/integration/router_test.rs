//! Routing, extraction and error rendering through the full middleware stack.
//!
//! The database handle is disconnected and Redis points at a closed port, so
//! only paths that fail before touching storage are exercised here. The
//! request limiters let traffic through when Redis is unreachable.

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use vahan_tag::router::build_router;
use vahan_tag::state::AppState;

const ADMIN_KEY: &str = "test-admin-key";

fn server() -> TestServer {
    let redis = deadpool_redis::Config::from_url("redis://127.0.0.1:1")
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .unwrap();
    let state = AppState::new(DatabaseConnection::Disconnected, redis, ADMIN_KEY);
    TestServer::new(build_router(state, &["http://localhost:5173".to_owned()])).unwrap()
}

fn admin_header(value: &'static str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-admin-key"),
        HeaderValue::from_static(value),
    )
}

#[tokio::test]
async fn should_answer_liveness() {
    let response = server().get("/healthz").await;
    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn should_report_not_ready_without_database() {
    let response = server().get("/readyz").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_render_unknown_route_as_json() {
    let response = server().get("/does/not/exist").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["kind"], "ROUTE_NOT_FOUND");
    assert_eq!(body["message"], "route not found");
}

#[tokio::test]
async fn should_attach_request_id() {
    let response = server().get("/healthz").await;
    assert!(response.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn should_require_admin_key() {
    let response = server()
        .post("/qr")
        .json(&json!({"qr_code": "abc123", "type": "vehicle"}))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["kind"], "ADMIN_KEY_REQUIRED");
}

#[tokio::test]
async fn should_reject_wrong_admin_key() {
    let (name, value) = admin_header("not-the-key");
    let response = server()
        .patch("/admin/qr/ABC123/revoke")
        .add_header(name, value)
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_ADMIN_KEY");
}

#[tokio::test]
async fn should_accept_exact_admin_key() {
    // Blank fields fail validation, which only runs after the key is accepted.
    let (name, value) = admin_header(ADMIN_KEY);
    let response = server()
        .post("/qr")
        .add_header(name, value)
        .json(&json!({"qr_code": "", "type": ""}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "MISSING_QR_FIELDS");
}

#[tokio::test]
async fn should_render_malformed_json_as_invalid_body() {
    let response = server()
        .post("/otp/send")
        .content_type("application/json")
        .bytes("{\"mobile\":".into())
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_BODY");
}

#[tokio::test]
async fn should_validate_mobile_on_send() {
    let response = server()
        .post("/otp/send")
        .json(&json!({"mobile": "12345"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_MOBILE");
    assert_eq!(body["message"], "invalid mobile number");
}

#[tokio::test]
async fn should_require_mobile_on_send() {
    let response = server().post("/otp/send").json(&json!({})).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "MISSING_MOBILE");
}

#[tokio::test]
async fn should_require_both_otp_fields() {
    let response = server()
        .post("/otp/verify")
        .json(&json!({"mobile": "9876543210"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "MISSING_OTP_FIELDS");
}

#[tokio::test]
async fn should_reject_view_as_contact_action() {
    let response = server()
        .post("/qr/ABC123/contact")
        .json(&json!({"action_type": "view"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_ACTION_TYPE");
}

#[tokio::test]
async fn should_reject_short_emergency_sms() {
    let response = server()
        .post("/emergency/ABC123/sms")
        .json(&json!({"message": " hi "}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_MESSAGE");
    assert_eq!(body["message"], "valid message required");
}

#[tokio::test]
async fn should_reject_oversized_body() {
    let message = "x".repeat(20 * 1024);
    let response = server()
        .post("/emergency/ABC123/sms")
        .json(&json!({"message": message}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_BODY");
}
