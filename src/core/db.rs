//! Database connection and schema management
use std::fs;
use std::time::Duration;

use anyhow::Result;
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use super::AppConfig;
use crate::accounts::seed_accounts;

const CREATE_USERS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT UNIQUE NOT NULL,
        password TEXT NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    );
";

// `status` is NULL when no status is set. The literal 'none' is never stored.
const CREATE_EVENTS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS calendar_events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        date DATE NOT NULL,
        status TEXT CHECK (status IN ('busy', 'free', 'date')),
        note TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (user_id) REFERENCES users (id),
        UNIQUE(user_id, date)
    );
";

fn configure(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    // In-memory databases answer "memory" here, which is fine
    let _mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    Ok(())
}

/// Open the database file at `db_path` on a dedicated connection thread.
pub async fn async_db(db_path: &str) -> Result<Connection> {
    let db = Connection::open(db_path).await?;
    db.call(|conn| {
        configure(conn)?;
        Ok(())
    })
    .await?;
    tracing::debug!("Opened database at {}", db_path);
    Ok(db)
}

/// Open a private in-memory database. Mostly useful for tests.
pub async fn memory_db() -> Result<Connection> {
    let db = Connection::open_in_memory().await?;
    db.call(|conn| {
        configure(conn)?;
        Ok(())
    })
    .await?;
    Ok(db)
}

/// Create any missing tables. Safe to run on every boot.
pub fn initialize_db(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CREATE_USERS_TABLE)?;
    conn.execute_batch(CREATE_EVENTS_TABLE)?;
    Ok(())
}

/// Open the configured database, create missing tables and seed the
/// accounts. Everything here is idempotent so it runs on every boot.
pub async fn prepare_db(config: &AppConfig) -> Result<Connection> {
    fs::create_dir_all(&config.storage_path)?;
    let db = async_db(&config.db_path).await?;
    db.call(|conn| {
        initialize_db(conn)?;
        Ok(())
    })
    .await?;
    seed_accounts(&db, &config.accounts).await?;
    Ok(db)
}

/// What `migrate_db` changed.
#[derive(Debug, Default, PartialEq)]
pub struct MigrationReport {
    /// Rows copied out of a leftover `calendar_events_old` table
    pub copied_legacy_rows: Option<usize>,
    /// Rows carried over when `calendar_events` was rebuilt
    pub rebuilt_rows: Option<usize>,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        self.copied_legacy_rows.is_none() && self.rebuilt_rows.is_none()
    }
}

fn table_exists(conn: &rusqlite::Connection, name: &str) -> rusqlite::Result<bool> {
    let found: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Older schemas declared `status` as NOT NULL or allowed the literal
/// 'none' as a status.
fn events_table_is_outdated(conn: &rusqlite::Connection) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare("PRAGMA table_info(calendar_events)")?;
    let status_not_null = stmt
        .query_map([], |row| {
            let name: String = row.get(1)?;
            let not_null: i64 = row.get(3)?;
            Ok((name, not_null))
        })?
        .filter_map(Result::ok)
        .any(|(name, not_null)| name == "status" && not_null == 1);

    let sql: String = conn.query_row(
        "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = 'calendar_events'",
        [],
        |row| row.get(0),
    )?;

    Ok(status_not_null || sql.contains("'none'"))
}

/// Copy every row of `source` into `calendar_events`. Any clash on `id`
/// or `(user_id, date)` fails the statement so no row is lost silently.
fn copy_events_from(conn: &rusqlite::Connection, source: &str) -> rusqlite::Result<usize> {
    conn.execute(
        &format!(
            r"
            INSERT INTO calendar_events
                (id, user_id, date, status, note, created_at, updated_at)
            SELECT id, user_id, date, NULLIF(status, 'none'), COALESCE(note, ''),
                   created_at, updated_at
            FROM {source}
            "
        ),
        [],
    )
}

/// Bring an older database up to the current `calendar_events` schema.
///
/// All changes happen in a single transaction. A row that cannot be
/// carried over aborts the whole migration and leaves the database as it
/// was. Running it against an up to date database does nothing.
pub fn migrate_db(conn: &mut rusqlite::Connection) -> rusqlite::Result<MigrationReport> {
    // Legacy rows may reference users that were never created. Foreign
    // key enforcement can only be toggled outside a transaction.
    conn.execute_batch("PRAGMA foreign_keys = OFF;")?;
    let result = migrate_in_transaction(conn);
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    result
}

fn migrate_in_transaction(conn: &mut rusqlite::Connection) -> rusqlite::Result<MigrationReport> {
    let tx = conn.transaction()?;
    let mut report = MigrationReport::default();

    // Rebuild first so legacy rows land in a table that accepts NULL status
    if table_exists(&tx, "calendar_events")? && events_table_is_outdated(&tx)? {
        tx.execute_batch("ALTER TABLE calendar_events RENAME TO calendar_events_backup")?;
        tx.execute_batch(CREATE_EVENTS_TABLE)?;
        let copied = copy_events_from(&tx, "calendar_events_backup")?;
        tx.execute_batch("DROP TABLE calendar_events_backup")?;
        report.rebuilt_rows = Some(copied);
    }

    if table_exists(&tx, "calendar_events_old")? {
        tx.execute_batch(CREATE_EVENTS_TABLE)?;
        let copied = copy_events_from(&tx, "calendar_events_old")?;
        tx.execute_batch("DROP TABLE calendar_events_old")?;
        report.copied_legacy_rows = Some(copied);
    }

    tx.execute_batch(CREATE_USERS_TABLE)?;
    tx.execute_batch(CREATE_EVENTS_TABLE)?;
    tx.commit()?;
    Ok(report)
}
