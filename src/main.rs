use anyhow::Result;
use pairdays::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
