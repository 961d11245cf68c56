//! Router for the calendar API

use axum::extract::rejection::JsonRejection;
use axum::{
    Json, Router,
    extract::{Path, State},
};

use super::public;
use crate::accounts::Identity;
use crate::api::public::{ApiError, MessageResponse, json_body};
use crate::api::state::{SharedState, read_state};
use crate::calendar::{
    EventDate, create_event, delete_event, events_for_user_in_month, upsert_event,
};

/// The caller's own days in a month
async fn get_month(
    State(state): State<SharedState>,
    identity: Identity,
    Path((year, month)): Path<(String, String)>,
) -> Result<Json<public::MonthEventsResponse>, ApiError> {
    let db = read_state(&state)?.db.clone();
    let events = events_for_user_in_month(&db, identity.id, &year, &month).await?;
    Ok(Json(public::MonthEventsResponse {
        success: true,
        events,
    }))
}

/// Strict create, fails if the day already has an event
async fn create(
    State(state): State<SharedState>,
    identity: Identity,
    payload: Result<Json<public::EventRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let event = json_body(payload)?.validate()?;
    let db = read_state(&state)?.db.clone();
    create_event(&db, identity.id, event.date, event.status, event.note).await?;
    Ok(MessageResponse::ok("Event created"))
}

/// Create the day or overwrite it if it already exists
async fn upsert(
    State(state): State<SharedState>,
    identity: Identity,
    payload: Result<Json<public::EventRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let event = json_body(payload)?.validate()?;
    let db = read_state(&state)?.db.clone();
    let outcome = upsert_event(&db, identity.id, event.date, event.status, event.note).await?;
    Ok(MessageResponse::ok(outcome.message()))
}

async fn delete(
    State(state): State<SharedState>,
    identity: Identity,
    payload: Result<Json<public::DeleteEventRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let req = json_body(payload)?;
    let date = EventDate::parse(req.date.as_deref().unwrap_or_default())?;
    let db = read_state(&state)?.db.clone();
    delete_event(&db, identity.id, date).await?;
    Ok(MessageResponse::ok("Event deleted"))
}

/// Create the calendar router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/{year}/{month}", axum::routing::get(get_month))
        .route(
            "/event",
            axum::routing::post(create).put(upsert).delete(delete),
        )
}
