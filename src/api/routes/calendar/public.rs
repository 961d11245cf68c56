//! Public types for the calendar API
use serde::{Deserialize, Serialize};

use crate::calendar::{EventDate, MonthEvents, Status};
use crate::core::CalendarResult;

/// Body for creating or updating a day. `status` may be null, empty or
/// "none" to leave the day without a status.
#[derive(Deserialize)]
pub struct EventRequest {
    pub date: Option<String>,
    pub status: Option<String>,
    pub note: Option<String>,
}

/// An `EventRequest` that passed validation.
pub struct ValidEvent {
    pub date: EventDate,
    pub status: Option<Status>,
    pub note: String,
}

impl EventRequest {
    pub fn validate(self) -> CalendarResult<ValidEvent> {
        let date = EventDate::parse(self.date.as_deref().unwrap_or_default())?;
        let status = Status::parse_optional(self.status.as_deref())?;
        Ok(ValidEvent {
            date,
            status,
            note: self.note.unwrap_or_default(),
        })
    }
}

#[derive(Deserialize)]
pub struct DeleteEventRequest {
    pub date: Option<String>,
}

#[derive(Serialize)]
pub struct MonthEventsResponse {
    pub success: bool,
    pub events: MonthEvents,
}
