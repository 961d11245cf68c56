//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, RwLock};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::util::ServiceExt;

use pairdays::accounts::seed_accounts;
use pairdays::api::AppState;
use pairdays::api::app;
use pairdays::core::AppConfig;
use pairdays::core::config::{SeedAccount, default_accounts};
use pairdays::core::db::{initialize_db, memory_db};

fn test_config(accounts: &[SeedAccount]) -> AppConfig {
    AppConfig {
        storage_path: String::from(":memory:"),
        db_path: String::from(":memory:"),
        accounts: accounts.to_vec(),
        stats_window_days: 30,
    }
}

/// Creates a test application router backed by a private in-memory
/// database seeded with `accounts`.
pub async fn test_app_with(accounts: &[SeedAccount]) -> Router {
    let db = memory_db().await.expect("Failed to open in-memory db");
    db.call(|conn| {
        initialize_db(conn).expect("Failed to initialize db");
        Ok(())
    })
    .await
    .unwrap();
    seed_accounts(&db, accounts)
        .await
        .expect("Failed to seed accounts");

    let app_state = AppState::new(db, test_config(accounts));
    app(Arc::new(RwLock::new(app_state)))
}

/// Creates a test application router with the two default accounts.
pub async fn test_app() -> Router {
    test_app_with(&default_accounts()).await
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_to_json(body: Body) -> Value {
    serde_json::from_str(&body_to_string(body).await).unwrap()
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn send_json(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method(method)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Run a request and return the status with the decoded JSON body.
pub async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

/// Log in and return the session token.
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = call(
        app,
        send_json(
            "POST",
            "/api/login",
            None,
            serde_json::json!({ "username": username, "password": password }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

/// Upsert one day for the caller behind `token`.
pub async fn put_event(app: &Router, token: &str, date: &str, status: Value, note: &str) {
    let (code, body) = call(
        app,
        send_json(
            "PUT",
            "/api/calendar/event",
            Some(token),
            serde_json::json!({ "date": date, "status": status, "note": note }),
        ),
    )
    .await;
    assert_eq!(code, StatusCode::OK, "upsert failed: {}", body);
}
