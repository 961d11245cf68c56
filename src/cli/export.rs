use anyhow::{Result, anyhow};

use crate::accounts::find_account_by_username;
use crate::calendar::find_all_events;
use crate::core::AppConfig;
use crate::core::db::async_db;

pub async fn run(config: &AppConfig, username: &str) -> Result<()> {
    let db = async_db(&config.db_path).await?;
    let account = find_account_by_username(&db, username)
        .await?
        .ok_or_else(|| anyhow!("No account named {}", username))?;
    let events = find_all_events(&db, account.id).await?;
    println!("{}", serde_json::to_string_pretty(&events)?);
    Ok(())
}
