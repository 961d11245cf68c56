//! Router for the stats API

use axum::{Json, Router, extract::State};
use chrono::Local;

use super::public;
use crate::accounts::Identity;
use crate::api::public::ApiError;
use crate::api::state::{SharedState, read_state};
use crate::calendar::stats_for;

/// Mutual free days and the caller's status counts from today onwards
async fn stats(
    State(state): State<SharedState>,
    identity: Identity,
) -> Result<Json<public::StatsResponse>, ApiError> {
    let (db, window_days) = {
        let shared_state = read_state(&state)?;
        (shared_state.db.clone(), shared_state.config.stats_window_days)
    };
    let today = Local::now().date_naive();
    let stats = stats_for(&db, &identity, today, window_days).await?;
    Ok(Json(public::StatsResponse {
        success: true,
        stats,
    }))
}

/// Create the stats router
pub fn router() -> Router<SharedState> {
    Router::new().route("/stats", axum::routing::get(stats))
}
