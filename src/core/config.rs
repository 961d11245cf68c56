use std::env;

/// Credentials for an account created on first boot.
#[derive(Clone, Debug, PartialEq)]
pub struct SeedAccount {
    pub username: String,
    pub password: String,
}

impl SeedAccount {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// Parse `username:password`. The password may itself contain colons.
    pub fn parse(value: &str) -> Option<Self> {
        let (username, password) = value.split_once(':')?;
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self::new(username, password))
    }
}

/// The two accounts the service ships with.
pub fn default_accounts() -> Vec<SeedAccount> {
    vec![
        SeedAccount::new("alice", "alice123"),
        SeedAccount::new("bob", "bob123"),
    ]
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub storage_path: String,
    pub db_path: String,
    pub accounts: Vec<SeedAccount>,
    pub stats_window_days: i64,
}

pub const DEFAULT_STATS_WINDOW_DAYS: i64 = 30;
/// Ten years. Larger windows are clamped to this.
pub const MAX_STATS_WINDOW_DAYS: i64 = 3650;

impl Default for AppConfig {
    fn default() -> Self {
        let storage_path = env::var("PAIRDAYS_STORAGE_PATH").unwrap_or("./".to_string());
        let db_path = format!("{}/calendar.db", storage_path.trim_end_matches('/'));

        let defaults = default_accounts();
        let accounts = ["PAIRDAYS_ACCOUNT_1", "PAIRDAYS_ACCOUNT_2"]
            .iter()
            .zip(defaults)
            .map(|(var, fallback)| {
                env::var(var)
                    .ok()
                    .and_then(|v| SeedAccount::parse(&v))
                    .unwrap_or(fallback)
            })
            .collect();

        let stats_window_days = env::var("PAIRDAYS_STATS_WINDOW_DAYS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|days| *days > 0)
            .unwrap_or(DEFAULT_STATS_WINDOW_DAYS)
            .min(MAX_STATS_WINDOW_DAYS);

        Self {
            storage_path,
            db_path,
            accounts,
            stats_window_days,
        }
    }
}
