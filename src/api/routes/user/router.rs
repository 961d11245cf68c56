//! Router for the user API

use axum::{Json, Router, extract::State};

use super::public;
use crate::accounts::Identity;
use crate::api::public::ApiError;
use crate::api::state::{SharedState, read_state};
use crate::calendar::find_all_events;

async fn all_events(
    State(state): State<SharedState>,
    identity: Identity,
) -> Result<Json<public::AllEventsResponse>, ApiError> {
    let db = read_state(&state)?.db.clone();
    let events = find_all_events(&db, identity.id).await?;
    Ok(Json(public::AllEventsResponse {
        success: true,
        events,
    }))
}

/// Create the user router
pub fn router() -> Router<SharedState> {
    Router::new().route("/events", axum::routing::get(all_events))
}
