//! Public types for the user API
use serde::Serialize;

use crate::calendar::CalendarEvent;

/// Every event the caller recorded, oldest date first, including
/// timestamps.
#[derive(Serialize)]
pub struct AllEventsResponse {
    pub success: bool,
    pub events: Vec<CalendarEvent>,
}
