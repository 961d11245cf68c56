use anyhow::Result;

use crate::core::AppConfig;
use crate::core::db::{async_db, migrate_db};

pub async fn run(config: &AppConfig) -> Result<()> {
    println!("Migrating db at {}...", config.db_path);
    let db = async_db(&config.db_path).await?;
    let report = db
        .call(|conn| {
            let report = migrate_db(conn)?;
            Ok(report)
        })
        .await?;

    if report.is_noop() {
        println!("Schema is already up to date");
    }
    if let Some(n) = report.copied_legacy_rows {
        println!("Copied {} rows from calendar_events_old", n);
    }
    if let Some(n) = report.rebuilt_rows {
        println!("Rebuilt calendar_events, carried over {} rows", n);
    }
    println!("Finished migrating db");
    Ok(())
}
