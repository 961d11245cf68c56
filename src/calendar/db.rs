//! Event repository: one row per (user, day)
use rusqlite::{ErrorCode, TransactionBehavior};
use tokio_rusqlite::{Connection, params};

use super::models::{CalendarEvent, DateWindow, EventDate, Status, UpsertOutcome};
use crate::core::{CalendarError, CalendarResult};

const EVENT_COLUMNS: &str = "id, user_id, date, status, note, created_at, updated_at";

fn map_event(row: &rusqlite::Row<'_>) -> rusqlite::Result<CalendarEvent> {
    Ok(CalendarEvent {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date: row.get(2)?,
        status: row.get(3)?,
        note: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

/// Insert or overwrite the event for (`user_id`, `date`).
///
/// The insert relies on the (user_id, date) unique constraint and falls
/// through to an update on conflict, both inside one immediate
/// transaction, so concurrent writers never create duplicates and never
/// see a conflict error. `created_at` is preserved on update.
pub async fn upsert_event(
    db: &Connection,
    user_id: i64,
    date: EventDate,
    status: Option<Status>,
    note: String,
) -> CalendarResult<UpsertOutcome> {
    let outcome = db
        .call(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let inserted = tx.execute(
                r"
                INSERT INTO calendar_events (user_id, date, status, note)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(user_id, date) DO NOTHING
                ",
                params![user_id, date, status, note],
            )?;
            let outcome = if inserted == 1 {
                UpsertOutcome::Created
            } else {
                tx.execute(
                    r"
                    UPDATE calendar_events
                    SET status = ?3, note = ?4, updated_at = CURRENT_TIMESTAMP
                    WHERE user_id = ?1 AND date = ?2
                    ",
                    params![user_id, date, status, note],
                )?;
                UpsertOutcome::Updated
            };
            tx.commit()?;
            Ok(outcome)
        })
        .await?;

    tracing::info!("{:?} event for user {} on {}", outcome, user_id, date);
    Ok(outcome)
}

/// Insert a new event, reporting `AlreadyExists` if the day is taken.
pub async fn create_event(
    db: &Connection,
    user_id: i64,
    date: EventDate,
    status: Option<Status>,
    note: String,
) -> CalendarResult<()> {
    let inserted = db
        .call(move |conn| {
            let result = conn.execute(
                "INSERT INTO calendar_events (user_id, date, status, note) VALUES (?1, ?2, ?3, ?4)",
                params![user_id, date, status, note],
            );
            match result {
                Ok(_) => Ok(true),
                Err(e) if is_unique_violation(&e) => Ok(false),
                Err(e) => Err(e.into()),
            }
        })
        .await?;

    if !inserted {
        tracing::debug!("Event for user {} on {} already exists", user_id, date);
        return Err(CalendarError::AlreadyExists(date.to_string()));
    }

    tracing::info!("Created event for user {} on {}", user_id, date);
    Ok(())
}

/// Remove the event for (`user_id`, `date`). Returns whether a row was
/// removed; a missing row is not an error.
pub async fn delete_event(db: &Connection, user_id: i64, date: EventDate) -> CalendarResult<bool> {
    let deleted = db
        .call(move |conn| {
            let n = conn.execute(
                "DELETE FROM calendar_events WHERE user_id = ?1 AND date = ?2",
                params![user_id, date],
            )?;
            Ok(n > 0)
        })
        .await?;

    tracing::info!(
        "Delete event for user {} on {} (removed: {})",
        user_id,
        date,
        deleted
    );
    Ok(deleted)
}

/// All events for `user_id` with `date` in `[window.start, window.end)`.
/// No particular order.
pub async fn find_events_in_range(
    db: &Connection,
    user_id: i64,
    window: &DateWindow,
) -> CalendarResult<Vec<CalendarEvent>> {
    let DateWindow { start, end } = window.clone();
    let events = db
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {EVENT_COLUMNS} FROM calendar_events
                 WHERE user_id = ?1 AND date >= ?2 AND date < ?3"
            ))?;
            let rows = stmt
                .query_map(params![user_id, start, end], map_event)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await?;
    Ok(events)
}

/// Events for both users in the window, fetched in a single query and
/// ordered by date.
pub async fn find_pair_events_in_range(
    db: &Connection,
    user_id: i64,
    partner_id: i64,
    window: &DateWindow,
) -> CalendarResult<Vec<CalendarEvent>> {
    let DateWindow { start, end } = window.clone();
    let events = db
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {EVENT_COLUMNS} FROM calendar_events
                 WHERE (user_id = ?1 OR user_id = ?2) AND date >= ?3 AND date < ?4
                 ORDER BY date"
            ))?;
            let rows = stmt
                .query_map(params![user_id, partner_id, start, end], map_event)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await?;
    Ok(events)
}

/// Every event for `user_id`, oldest date first.
pub async fn find_all_events(db: &Connection, user_id: i64) -> CalendarResult<Vec<CalendarEvent>> {
    let events = db
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {EVENT_COLUMNS} FROM calendar_events WHERE user_id = ?1 ORDER BY date"
            ))?;
            let rows = stmt
                .query_map([user_id], map_event)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await?;
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{find_account_by_username, seed_accounts};
    use crate::core::config::default_accounts;
    use crate::core::db::{async_db, initialize_db, memory_db};

    async fn seeded(db: &Connection) -> (i64, i64) {
        db.call(|conn| {
            initialize_db(conn)?;
            Ok(())
        })
        .await
        .unwrap();
        seed_accounts(db, &default_accounts()).await.unwrap();
        let alice = find_account_by_username(db, "alice").await.unwrap().unwrap();
        let bob = find_account_by_username(db, "bob").await.unwrap().unwrap();
        (alice.id, bob.id)
    }

    fn day(s: &str) -> EventDate {
        EventDate::parse(s).unwrap()
    }

    async fn row_count(db: &Connection, user_id: i64) -> i64 {
        db.call(move |conn| {
            Ok(conn.query_row(
                "SELECT COUNT(*) FROM calendar_events WHERE user_id = ?1",
                [user_id],
                |r| r.get(0),
            )?)
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn it_upserts_in_place() {
        let db = memory_db().await.unwrap();
        let (alice, _) = seeded(&db).await;

        let first = upsert_event(&db, alice, day("2025-06-10"), Some(Status::Busy), "work".into())
            .await
            .unwrap();
        assert_eq!(first, UpsertOutcome::Created);

        let original = find_all_events(&db, alice).await.unwrap().remove(0);

        let second = upsert_event(&db, alice, day("2025-06-10"), Some(Status::Free), "off".into())
            .await
            .unwrap();
        assert_eq!(second, UpsertOutcome::Updated);

        let events = find_all_events(&db, alice).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].status, Some(Status::Free));
        assert_eq!(events[0].note, "off");
        assert_eq!(events[0].id, original.id);
        assert_eq!(events[0].created_at, original.created_at);
    }

    #[tokio::test]
    async fn it_keeps_the_note_when_status_is_cleared() {
        let db = memory_db().await.unwrap();
        let (alice, _) = seeded(&db).await;

        upsert_event(&db, alice, day("2025-06-10"), Some(Status::Date), "dinner".into())
            .await
            .unwrap();
        upsert_event(&db, alice, day("2025-06-10"), None, "dinner".into())
            .await
            .unwrap();

        let events = find_all_events(&db, alice).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].status, None);
        assert_eq!(events[0].note, "dinner");

        let raw: Option<String> = db
            .call(|conn| {
                Ok(conn.query_row("SELECT status FROM calendar_events", [], |r| r.get(0))?)
            })
            .await
            .unwrap();
        assert_eq!(raw, None);
    }

    #[tokio::test]
    async fn it_reports_existing_rows_on_strict_create() {
        let db = memory_db().await.unwrap();
        let (alice, _) = seeded(&db).await;

        create_event(&db, alice, day("2025-06-10"), Some(Status::Busy), String::new())
            .await
            .unwrap();
        let again =
            create_event(&db, alice, day("2025-06-10"), Some(Status::Free), String::new()).await;
        assert!(matches!(again, Err(CalendarError::AlreadyExists(d)) if d == "2025-06-10"));

        let events = find_all_events(&db, alice).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].status, Some(Status::Busy));
    }

    #[tokio::test]
    async fn it_deletes_idempotently() {
        let db = memory_db().await.unwrap();
        let (alice, _) = seeded(&db).await;

        assert!(!delete_event(&db, alice, day("2025-06-10")).await.unwrap());

        upsert_event(&db, alice, day("2025-06-10"), None, "x".into())
            .await
            .unwrap();
        assert!(delete_event(&db, alice, day("2025-06-10")).await.unwrap());
        assert_eq!(row_count(&db, alice).await, 0);
    }

    #[tokio::test]
    async fn it_queries_half_open_ranges_per_user() {
        let db = memory_db().await.unwrap();
        let (alice, bob) = seeded(&db).await;

        for d in ["2025-05-31", "2025-06-01", "2025-06-30", "2025-07-01"] {
            upsert_event(&db, alice, day(d), Some(Status::Busy), String::new())
                .await
                .unwrap();
        }
        upsert_event(&db, bob, day("2025-06-15"), Some(Status::Free), String::new())
            .await
            .unwrap();

        let june = DateWindow::month(2025, 6).unwrap();
        let mut dates: Vec<String> = find_events_in_range(&db, alice, &june)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.date.to_string())
            .collect();
        dates.sort();
        assert_eq!(dates, vec!["2025-06-01", "2025-06-30"]);

        let both = find_pair_events_in_range(&db, alice, bob, &june)
            .await
            .unwrap();
        assert_eq!(both.len(), 3);
    }

    #[tokio::test]
    async fn it_exports_remaining_rows_in_date_order() {
        let db = memory_db().await.unwrap();
        let (alice, _) = seeded(&db).await;

        for d in ["2025-03-01", "2024-12-31", "2025-01-15", "2025-02-02"] {
            upsert_event(&db, alice, day(d), Some(Status::Free), d.to_string())
                .await
                .unwrap();
        }
        delete_event(&db, alice, day("2025-01-15")).await.unwrap();

        let dates: Vec<String> = find_all_events(&db, alice)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.date.to_string())
            .collect();
        assert_eq!(dates, vec!["2024-12-31", "2025-02-02", "2025-03-01"]);
    }

    #[tokio::test]
    async fn it_never_duplicates_under_concurrent_upserts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calendar.db");
        let path = path.to_str().unwrap();

        let first = async_db(path).await.unwrap();
        let (alice, _) = seeded(&first).await;
        let second = async_db(path).await.unwrap();

        let writes = (0..20).map(|i| {
            let db = if i % 2 == 0 { first.clone() } else { second.clone() };
            async move {
                upsert_event(&db, alice, day("2025-06-10"), Some(Status::Free), format!("w{i}"))
                    .await
            }
        });
        let results = spawn_all(writes).await;
        assert!(results.iter().all(Result::is_ok));

        let created = results
            .iter()
            .filter(|r| matches!(r, Ok(UpsertOutcome::Created)))
            .count();
        assert_eq!(created, 1);
        assert_eq!(row_count(&first, alice).await, 1);
    }

    async fn spawn_all<F, T>(futures: impl Iterator<Item = F>) -> Vec<T>
    where
        F: std::future::Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let handles: Vec<_> = futures.map(tokio::spawn).collect();
        let mut out = Vec::with_capacity(handles.len());
        for handle in handles {
            out.push(handle.await.unwrap());
        }
        out
    }
}
