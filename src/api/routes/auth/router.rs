//! Router for the auth API

use axum::extract::rejection::JsonRejection;
use axum::{Json, Router, extract::State};
use http::HeaderMap;

use super::public;
use crate::accounts::{Identity, authenticate};
use crate::api::public::{ApiError, MessageResponse, json_body};
use crate::api::session::bearer_token;
use crate::api::state::{SharedState, read_state, write_state};

async fn login(
    State(state): State<SharedState>,
    payload: Result<Json<public::LoginRequest>, JsonRejection>,
) -> Result<Json<public::LoginResponse>, ApiError> {
    let req = json_body(payload)?;
    let db = read_state(&state)?.db.clone();

    let account = authenticate(&db, &req.username, &req.password).await?;
    let identity = Identity::from(&account);
    let token = write_state(&state)?.start_session(identity.clone());
    tracing::info!("User {} logged in", identity.username);

    Ok(Json(public::LoginResponse {
        success: true,
        message: "Logged in".to_string(),
        token,
        user: identity,
    }))
}

async fn logout(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    if let Some(token) = bearer_token(&headers) {
        if let Some(identity) = write_state(&state)?.end_session(token) {
            tracing::info!("User {} logged out", identity.username);
        }
    }
    Ok(MessageResponse::ok("Logged out"))
}

async fn check_auth(identity: Identity) -> Json<public::CheckAuthResponse> {
    Json(public::CheckAuthResponse {
        success: true,
        user: identity,
    })
}

/// Create the auth router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/login", axum::routing::post(login))
        .route("/logout", axum::routing::post(logout))
        .route("/check_auth", axum::routing::get(check_auth))
}
