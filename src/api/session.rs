//! Resolve the caller's identity from the `Authorization` header

use axum::extract::FromRequestParts;
use http::{HeaderMap, header, request::Parts};

use super::public::ApiError;
use super::state::{SharedState, read_state};
use crate::accounts::Identity;
use crate::core::CalendarError;

/// Extract the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub fn current_identity(state: &SharedState, headers: &HeaderMap) -> Result<Identity, ApiError> {
    let token = bearer_token(headers).ok_or(CalendarError::Unauthenticated)?;
    let identity = read_state(state)?.session(token);
    identity.ok_or_else(|| CalendarError::Unauthenticated.into())
}

/// Handlers that take an `Identity` argument only run for logged in
/// callers.
impl FromRequestParts<SharedState> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        current_identity(state, &parts.headers)
    }
}
