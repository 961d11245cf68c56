use anyhow::Result;

use crate::core::AppConfig;
use crate::core::db::prepare_db;

pub async fn run(config: &AppConfig) -> Result<()> {
    println!("Initializing db at {}...", config.db_path);
    prepare_db(config).await?;
    for account in &config.accounts {
        println!("Account ready: {}", account.username);
    }
    println!("Finished initializing db");
    Ok(())
}
