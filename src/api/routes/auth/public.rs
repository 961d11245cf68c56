//! Public types for the auth API
use serde::{Deserialize, Serialize};

use crate::accounts::Identity;

/// Missing fields are accepted here and rejected with a validation
/// message by the handler.
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    /// Present as `Authorization: Bearer <token>` on later requests
    pub token: String,
    pub user: Identity,
}

#[derive(Serialize)]
pub struct CheckAuthResponse {
    pub success: bool,
    pub user: Identity,
}
