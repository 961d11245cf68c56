//! Month views over the event repository
use std::collections::BTreeMap;

use tokio_rusqlite::Connection;

use super::db::find_events_in_range;
use super::models::{DateWindow, DayEntry};
use crate::accounts::{Identity, find_partner};
use crate::core::{CalendarError, CalendarResult};

/// Date (`YYYY-MM-DD`) to that day's status and note.
pub type MonthEvents = BTreeMap<String, DayEntry>;

/// Parse `year` and `month` as integers and build the month window.
///
/// Only integer parsing is checked. A month such as 13 yields a window
/// that matches no stored date instead of an error. Integers whose next
/// month cannot be computed are refused like non-integers.
pub fn month_range(year: &str, month: &str) -> Option<DateWindow> {
    let year = year.trim().parse::<i64>().ok()?;
    let month = month.trim().parse::<i64>().ok()?;
    DateWindow::month(year, month)
}

fn invalid_month() -> CalendarError {
    CalendarError::Validation("Invalid year or month".to_string())
}

pub async fn events_for_user_in_month(
    db: &Connection,
    user_id: i64,
    year: &str,
    month: &str,
) -> CalendarResult<MonthEvents> {
    let window = month_range(year, month).ok_or_else(invalid_month)?;
    tracing::debug!(
        "Fetching events for user {} in [{}, {})",
        user_id,
        window.start,
        window.end
    );

    let events = find_events_in_range(db, user_id, &window).await?;
    Ok(events
        .into_iter()
        .map(|event| (event.date.to_string(), DayEntry::from(event)))
        .collect())
}

/// Same as `events_for_user_in_month` but for the caller's partner.
pub async fn events_for_partner_in_month(
    db: &Connection,
    caller: &Identity,
    year: &str,
    month: &str,
) -> CalendarResult<MonthEvents> {
    let partner = find_partner(db, caller.id).await?;
    events_for_user_in_month(db, partner.id, year, month).await
}
