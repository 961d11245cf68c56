use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::core::AppConfig;

pub mod export;
pub mod init;
pub mod migrate;
pub mod serve;

#[derive(Subcommand)]
enum Command {
    /// Create the database schema and seed the two accounts
    Init {},
    /// Upgrade a database created by an older release
    Migrate {},
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "5000")]
        port: String,
    },
    /// Print every event recorded by a user as JSON
    Export {
        #[arg(long)]
        username: String,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    let config = AppConfig::default();

    // Handle each sub command
    match args.command {
        Some(Command::Init {}) => {
            init::run(&config).await?;
        }
        Some(Command::Migrate {}) => {
            migrate::run(&config).await?;
        }
        Some(Command::Serve { host, port }) => {
            serve::run(host, port, config).await?;
        }
        Some(Command::Export { username }) => {
            export::run(&config, &username).await?;
        }
        None => {}
    }

    Ok(())
}
