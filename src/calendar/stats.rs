//! Mutual free days and per-status counts over an upcoming window
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tokio_rusqlite::Connection;

use super::db::find_pair_events_in_range;
use super::models::{CalendarEvent, DateWindow, Status};
use crate::accounts::{Identity, find_partner};
use crate::core::{CalendarError, CalendarResult};

/// Days the caller marked with each status. Days without a status are
/// not counted anywhere, so the total can be lower than the number of
/// rows in the window.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct StatusCounts {
    pub busy: usize,
    pub free: usize,
    pub date: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub common_free_days: Vec<String>,
    pub common_free_count: usize,
    pub user_status_counts: StatusCounts,
    /// The `[start, end)` window the report covers
    pub window: DateWindow,
}

/// Join both users' rows by date and tally the caller's statuses.
///
/// A day is mutually free only when both users have a row for it and
/// both rows say free. A missing row is never treated as free.
pub fn compare(
    caller_id: i64,
    partner_id: i64,
    events: &[CalendarEvent],
    window: DateWindow,
) -> StatsReport {
    let mut caller_days: BTreeMap<String, Option<Status>> = BTreeMap::new();
    let mut partner_days: BTreeMap<String, Option<Status>> = BTreeMap::new();
    let mut counts = StatusCounts::default();

    for event in events {
        let key = event.date.to_string();
        if event.user_id == caller_id {
            match event.status {
                Some(Status::Busy) => counts.busy += 1,
                Some(Status::Free) => counts.free += 1,
                Some(Status::Date) => counts.date += 1,
                None => {}
            }
            caller_days.insert(key, event.status);
        } else if event.user_id == partner_id {
            partner_days.insert(key, event.status);
        }
    }

    let common_free_days: Vec<String> = caller_days
        .iter()
        .filter(|(day, status)| {
            **status == Some(Status::Free)
                && partner_days.get(*day) == Some(&Some(Status::Free))
        })
        .map(|(day, _)| day.clone())
        .collect();

    StatsReport {
        common_free_count: common_free_days.len(),
        common_free_days,
        user_status_counts: counts,
        window,
    }
}

/// Build the report for `caller` over `[today, today + window_days)`.
pub async fn stats_for(
    db: &Connection,
    caller: &Identity,
    today: NaiveDate,
    window_days: i64,
) -> CalendarResult<StatsReport> {
    let partner = find_partner(db, caller.id).await?;
    let window = DateWindow::days_from(today, window_days).ok_or_else(|| {
        CalendarError::Validation(format!("Stats window of {} days is out of range", window_days))
    })?;
    tracing::debug!(
        "Comparing users {} and {} in [{}, {})",
        caller.id,
        partner.id,
        window.start,
        window.end
    );

    let events = find_pair_events_in_range(db, caller.id, partner.id, &window).await?;
    Ok(compare(caller.id, partner.id, &events, window))
}
