//! Account store queries
use rusqlite::OptionalExtension;
use tokio_rusqlite::{Connection, params};

use super::models::{Account, hash_password, uses_default_credentials};
use crate::core::config::SeedAccount;
use crate::core::{CalendarError, CalendarResult};

fn map_account(row: &rusqlite::Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        username: row.get(1)?,
        credential_hash: row.get(2)?,
    })
}

/// Create the seed accounts that do not exist yet. Existing accounts are
/// left untouched, including their passwords. Returns how many accounts
/// were created.
pub async fn seed_accounts(db: &Connection, accounts: &[SeedAccount]) -> CalendarResult<usize> {
    let rows: Vec<(String, String, bool)> = accounts
        .iter()
        .map(|a| {
            (
                a.username.clone(),
                hash_password(&a.password),
                uses_default_credentials(a),
            )
        })
        .collect();

    let created = db
        .call(move |conn| {
            let tx = conn.transaction()?;
            let mut created = Vec::new();
            {
                let mut stmt =
                    tx.prepare("INSERT OR IGNORE INTO users (username, password) VALUES (?1, ?2)")?;
                for (username, hash, is_default) in rows {
                    if stmt.execute(params![username, hash])? == 1 {
                        created.push((username, is_default));
                    }
                }
            }
            tx.commit()?;
            Ok(created)
        })
        .await?;

    for (username, is_default) in &created {
        tracing::info!("Created account {}", username);
        if *is_default {
            tracing::warn!(
                "Account {} uses the published default password, change it before exposing this service",
                username
            );
        }
    }

    Ok(created.len())
}

/// Look up the account whose username and password hash both match.
pub async fn authenticate(
    db: &Connection,
    username: &str,
    password: &str,
) -> CalendarResult<Account> {
    if username.is_empty() || password.is_empty() {
        return Err(CalendarError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    let username = username.to_string();
    let hash = hash_password(password);
    let account = db
        .call(move |conn| {
            let account = conn
                .query_row(
                    "SELECT id, username, password FROM users WHERE username = ?1 AND password = ?2",
                    params![username, hash],
                    map_account,
                )
                .optional()?;
            Ok(account)
        })
        .await?;

    account.ok_or(CalendarError::InvalidCredentials)
}

pub async fn find_account_by_username(
    db: &Connection,
    username: &str,
) -> CalendarResult<Option<Account>> {
    let username = username.to_string();
    let account = db
        .call(move |conn| {
            let account = conn
                .query_row(
                    "SELECT id, username, password FROM users WHERE username = ?1",
                    [username],
                    map_account,
                )
                .optional()?;
            Ok(account)
        })
        .await?;
    Ok(account)
}

/// Resolve the partner of `caller_id`.
///
/// This is a two account system, so the partner is simply the other
/// account. Should a third account ever exist, the one with the lowest
/// id wins.
pub async fn find_partner(db: &Connection, caller_id: i64) -> CalendarResult<Account> {
    let partner = db
        .call(move |conn| {
            let partner = conn
                .query_row(
                    "SELECT id, username, password FROM users WHERE id != ?1 ORDER BY id LIMIT 1",
                    [caller_id],
                    map_account,
                )
                .optional()?;
            Ok(partner)
        })
        .await?;

    partner.ok_or(CalendarError::PartnerNotFound)
}
