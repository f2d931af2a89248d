/// Common test utilities for frontdesk integration tests
///
/// This file contains shared functions for all integration tests: test
/// application setup, login helpers, and authenticated request builders.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use frontdesk::db::{init_pool, DbPool};
use frontdesk::{create_app, repo};
use serde_json::Value;
use std::sync::Arc;
use tower::Service;

/// Creates a test application with an in-memory SQLite database
///
/// Each test gets a unique shared in-memory database (plain ":memory:" would
/// give every pooled connection its own database), migrated and with a
/// bootstrap "admin" user whose password is "admin".
///
/// ### Returns
///
/// The pool and an Axum Router wired to it
pub async fn create_test_app() -> (Arc<DbPool>, Router) {
    let database_url = format!("file:test_{}?mode=memory&cache=shared", uuid::Uuid::new_v4());
    let pool = Arc::new(init_pool(&database_url));

    let conn = &mut pool.get().unwrap();
    frontdesk::run_migrations(conn);

    repo::bootstrap_admin(&pool, "admin").await.unwrap();

    let app = create_app(pool.clone(), chrono::Duration::minutes(30));
    (pool, app)
}

/// Logs in over the API and returns the bearer token
pub async fn login(app: &mut Router, username: &str, password: &str) -> String {
    let request = Request::builder()
        .uri("/auth/login")
        .method("POST")
        .header("Content-Type", "application/json")
        .body(Body::from(format!(
            r#"{{"username":"{}","password":"{}"}}"#,
            username, password
        )))
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK, "login failed");

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let login: Value = serde_json::from_slice(&body).unwrap();
    login["token"].as_str().unwrap().to_string()
}

/// Builds an authenticated GET request
pub fn authed_get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("GET")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Builds an authenticated POST request with a JSON body
pub fn authed_post(uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Builds an authenticated PUT request with a JSON body
pub fn authed_put(uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("PUT")
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Sends a request and parses the JSON response body
pub async fn send(app: &mut Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.call(request).await.unwrap();
    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (parts.status, json)
}

/// Creates a room over the API and returns its id
pub async fn create_room(app: &mut Router, token: &str, number: &str, rate_cents: i64) -> String {
    let (status, room) = send(
        app,
        authed_post(
            "/rooms",
            token,
            serde_json::json!({ "number": number, "room_type": "double", "rate_cents": rate_cents }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create_room failed: {}", room);
    room["id"].as_str().unwrap().to_string()
}

/// Creates a customer over the API and returns their id
pub async fn create_customer(app: &mut Router, token: &str, name: &str) -> String {
    let (status, customer) = send(
        app,
        authed_post("/customers", token, serde_json::json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create_customer failed: {}", customer);
    customer["id"].as_str().unwrap().to_string()
}

/// Creates a single-room booking over the API and returns the booking id
pub async fn create_booking(
    app: &mut Router,
    token: &str,
    customer_id: &str,
    room_id: &str,
    check_in: &str,
    check_out: &str,
) -> String {
    let (status, detail) = send(
        app,
        authed_post(
            "/bookings",
            token,
            serde_json::json!({
                "customer_id": customer_id,
                "rooms": [{ "room_id": room_id, "check_in": check_in, "check_out": check_out }]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create_booking failed: {}", detail);
    detail["booking"]["id"].as_str().unwrap().to_string()
}
