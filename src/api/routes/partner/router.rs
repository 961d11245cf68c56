//! Router for the partner API

use axum::{
    Json, Router,
    extract::{Path, State},
};

use super::public;
use crate::accounts::Identity;
use crate::api::public::ApiError;
use crate::api::state::{SharedState, read_state};
use crate::calendar::events_for_partner_in_month;

async fn partner_month(
    State(state): State<SharedState>,
    identity: Identity,
    Path((year, month)): Path<(String, String)>,
) -> Result<Json<public::MonthEventsResponse>, ApiError> {
    let db = read_state(&state)?.db.clone();
    let events = events_for_partner_in_month(&db, &identity, &year, &month).await?;
    Ok(Json(public::MonthEventsResponse {
        success: true,
        events,
    }))
}

/// Create the partner router
pub fn router() -> Router<SharedState> {
    Router::new().route("/events/{year}/{month}", axum::routing::get(partner_month))
}
