//! Public API types

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::Serialize;

use crate::core::CalendarError;

// Errors

/// Every failure is answered with `{"success": false, "message": ...}`.
pub struct ApiError(anyhow::Error);

impl ApiError {
    fn classify(&self) -> (StatusCode, String) {
        match self.0.downcast_ref::<CalendarError>() {
            Some(err @ (CalendarError::Unauthenticated | CalendarError::InvalidCredentials)) => {
                (StatusCode::UNAUTHORIZED, err.to_string())
            }
            Some(err @ CalendarError::Validation(_)) => (StatusCode::BAD_REQUEST, err.to_string()),
            Some(err @ CalendarError::PartnerNotFound) => (StatusCode::NOT_FOUND, err.to_string()),
            Some(err @ CalendarError::AlreadyExists(_)) => (StatusCode::CONFLICT, err.to_string()),
            Some(CalendarError::Storage(_)) | None => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong".to_string(),
            ),
        }
    }
}

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.classify();

        // Internal details only go to the log
        if status.is_server_error() {
            tracing::error!("{:#}", self.0);
        } else {
            tracing::debug!("Rejected request: {}", message);
        }

        (
            status,
            Json(MessageResponse {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` to turn them into `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Unwrap a JSON body, reporting malformed input as a validation failure
/// rather than axum's plain text rejection.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| CalendarError::Validation(rejection.body_text()).into())
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: &str) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.to_string(),
        })
    }
}

// Re-export public types from each route

pub mod auth {
    pub use crate::api::routes::auth::public::*;
}

pub mod calendar {
    pub use crate::api::routes::calendar::public::*;
}

pub mod partner {
    pub use crate::api::routes::partner::public::*;
}

pub mod stats {
    pub use crate::api::routes::stats::public::*;
}

pub mod user {
    pub use crate::api::routes::user::public::*;
}
