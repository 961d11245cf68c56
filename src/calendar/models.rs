use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use rusqlite::ToSql;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize, Serializer};

use crate::core::CalendarError;

/// Daily availability label. "No status" is modelled as `Option::None`
/// and stored as NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Busy,
    Free,
    Date,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Busy => "busy",
            Status::Free => "free",
            Status::Date => "date",
        }
    }

    /// Interpret a status coming from a client. Missing, empty and the
    /// literal "none" all mean no status.
    pub fn parse_optional(value: Option<&str>) -> Result<Option<Status>, CalendarError> {
        match value {
            None | Some("") | Some("none") => Ok(None),
            Some(s) => s.parse().map(Some),
        }
    }
}

impl FromStr for Status {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "busy" => Ok(Status::Busy),
            "free" => Ok(Status::Free),
            "date" => Ok(Status::Date),
            other => Err(CalendarError::Validation(format!(
                "Invalid status value: {other}"
            ))),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for Status {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Status {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|_| FromSqlError::InvalidType)
    }
}

/// A calendar day that is known to be a real `YYYY-MM-DD` date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventDate(NaiveDate);

impl EventDate {
    pub fn parse(value: &str) -> Result<Self, CalendarError> {
        if value.is_empty() {
            return Err(CalendarError::Validation(
                "Date must not be empty".to_string(),
            ));
        }
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(EventDate)
            .map_err(|_| {
                CalendarError::Validation(format!(
                    "Invalid date format: {value}, expected YYYY-MM-DD"
                ))
            })
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for EventDate {
    fn from(date: NaiveDate) -> Self {
        EventDate(date)
    }
}

impl fmt::Display for EventDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl Serialize for EventDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl ToSql for EventDate {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.to_string().into())
    }
}

impl FromSql for EventDate {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(EventDate)
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// Half open range of date keys, `[start, end)`.
///
/// Bounds are kept as text because month windows are built from
/// whatever integers the caller supplied and may not name a real day
/// (month 13 is accepted and simply matches nothing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateWindow {
    pub start: String,
    pub end: String,
}

impl DateWindow {
    /// `[first of month, first of next month)`, rolling December over
    /// into January of the next year. The month is not range checked.
    /// `None` when the next month cannot be represented.
    pub fn month(year: i64, month: i64) -> Option<Self> {
        let start = format!("{:04}-{:02}-01", year, month);
        let end = if month == 12 {
            format!("{:04}-01-01", year.checked_add(1)?)
        } else {
            format!("{:04}-{:02}-01", year, month.checked_add(1)?)
        };
        Some(Self { start, end })
    }

    /// `[from, from + days)`, or `None` past the last representable date.
    pub fn days_from(from: NaiveDate, days: i64) -> Option<Self> {
        let end = from.checked_add_signed(Duration::try_days(days)?)?;
        Some(Self {
            start: from.format("%Y-%m-%d").to_string(),
            end: end.format("%Y-%m-%d").to_string(),
        })
    }
}

impl Serialize for DateWindow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.start, &self.end).serialize(serializer)
    }
}

/// One stored row: a user's status and note for a single day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub id: i64,
    #[serde(skip)]
    pub user_id: i64,
    pub date: EventDate,
    pub status: Option<Status>,
    pub note: String,
    pub created_at: String,
    pub updated_at: String,
}

/// What a calendar view shows for a single day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayEntry {
    pub status: Option<Status>,
    pub note: String,
}

impl From<CalendarEvent> for DayEntry {
    fn from(event: CalendarEvent) -> Self {
        Self {
            status: event.status,
            note: event.note,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

impl UpsertOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            UpsertOutcome::Created => "Event created",
            UpsertOutcome::Updated => "Event updated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_treats_empty_and_none_as_no_status() {
        assert_eq!(Status::parse_optional(None).unwrap(), None);
        assert_eq!(Status::parse_optional(Some("")).unwrap(), None);
        assert_eq!(Status::parse_optional(Some("none")).unwrap(), None);
        assert_eq!(
            Status::parse_optional(Some("free")).unwrap(),
            Some(Status::Free)
        );
    }

    #[test]
    fn it_rejects_unknown_status() {
        assert!(matches!(
            Status::parse_optional(Some("Free")),
            Err(CalendarError::Validation(_))
        ));
        assert!(matches!(
            Status::parse_optional(Some("maybe")),
            Err(CalendarError::Validation(_))
        ));
    }

    #[test]
    fn it_validates_dates() {
        assert_eq!(
            EventDate::parse("2025-06-10").unwrap().to_string(),
            "2025-06-10"
        );
        assert!(EventDate::parse("").is_err());
        assert!(EventDate::parse("2025-02-30").is_err());
        assert!(EventDate::parse("2025-06").is_err());
        assert!(EventDate::parse("2025-06-10T00:00").is_err());
        assert!(EventDate::parse("10/06/2025").is_err());
    }

    #[test]
    fn it_builds_month_windows() {
        assert_eq!(
            DateWindow::month(2024, 12),
            Some(DateWindow {
                start: "2024-12-01".to_string(),
                end: "2025-01-01".to_string()
            })
        );
        assert_eq!(
            DateWindow::month(2024, 2),
            Some(DateWindow {
                start: "2024-02-01".to_string(),
                end: "2024-03-01".to_string()
            })
        );
    }

    #[test]
    fn it_refuses_month_windows_that_overflow() {
        assert_eq!(DateWindow::month(2024, i64::MAX), None);
        assert_eq!(DateWindow::month(i64::MAX, 12), None);
        assert!(DateWindow::month(i64::MAX, 11).is_some());
        assert!(DateWindow::month(2024, i64::MIN).is_some());
    }

    #[test]
    fn it_builds_day_windows_with_exclusive_end() {
        let from = NaiveDate::from_ymd_opt(2025, 12, 20).unwrap();
        let window = DateWindow::days_from(from, 30).unwrap();
        assert_eq!(window.start, "2025-12-20");
        assert_eq!(window.end, "2026-01-19");
    }

    #[test]
    fn it_refuses_day_windows_past_the_calendar() {
        let from = NaiveDate::from_ymd_opt(2025, 12, 20).unwrap();
        assert_eq!(DateWindow::days_from(from, i64::MAX), None);
        assert_eq!(DateWindow::days_from(from, 1_000_000_000), None);
    }

    #[test]
    fn it_serializes_absent_status_as_null() {
        let entry = DayEntry {
            status: None,
            note: "dentist".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            serde_json::json!({"status": null, "note": "dentist"})
        );
    }
}
