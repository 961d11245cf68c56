//! API routes module

pub mod auth;
pub mod calendar;
pub mod partner;
pub mod stats;
pub mod user;

use axum::Router;

use crate::api::state::SharedState;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Login, logout and session check
        .merge(auth::router())
        // The caller's own calendar
        .nest("/calendar", calendar::router())
        // Export of everything the caller recorded
        .nest("/user", user::router())
        // The partner's calendar
        .nest("/partner", partner::router())
        // Mutual free days
        .merge(stats::router())
}
