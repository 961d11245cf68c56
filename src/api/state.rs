use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{Result, anyhow};
use tokio_rusqlite::Connection;

use crate::accounts::Identity;
use crate::core::AppConfig;

pub type SharedState = Arc<RwLock<AppState>>;

/// Sessions kept per account. Logging in again past this evicts the
/// oldest session of that account.
pub const MAX_SESSIONS_PER_ACCOUNT: usize = 8;

struct Session {
    identity: Identity,
    issued: u64,
}

pub struct AppState {
    pub db: Connection,
    pub config: AppConfig,
    // Session token to the identity that logged in with it. Sessions do
    // not survive a restart.
    sessions: HashMap<String, Session>,
    issued: u64,
}

impl AppState {
    pub fn new(db: Connection, config: AppConfig) -> Self {
        Self {
            db,
            config,
            sessions: HashMap::new(),
            issued: 0,
        }
    }

    /// Issue a new session token for `identity`.
    pub fn start_session(&mut self, identity: Identity) -> String {
        let mut held: Vec<(u64, String)> = self
            .sessions
            .iter()
            .filter(|(_, session)| session.identity.id == identity.id)
            .map(|(token, session)| (session.issued, token.clone()))
            .collect();
        if held.len() >= MAX_SESSIONS_PER_ACCOUNT {
            held.sort();
            let excess = held.len() + 1 - MAX_SESSIONS_PER_ACCOUNT;
            for (_, token) in held.into_iter().take(excess) {
                self.sessions.remove(&token);
            }
            tracing::debug!("Evicted {} old session(s) of {}", excess, identity.username);
        }

        self.issued += 1;
        let token = uuid::Uuid::new_v4().simple().to_string();
        self.sessions.insert(
            token.clone(),
            Session {
                identity,
                issued: self.issued,
            },
        );
        token
    }

    pub fn end_session(&mut self, token: &str) -> Option<Identity> {
        self.sessions.remove(token).map(|session| session.identity)
    }

    pub fn session(&self, token: &str) -> Option<Identity> {
        self.sessions
            .get(token)
            .map(|session| session.identity.clone())
    }
}

pub fn read_state(state: &SharedState) -> Result<RwLockReadGuard<'_, AppState>> {
    state.read().map_err(|_| anyhow!("Shared state lock poisoned"))
}

pub fn write_state(state: &SharedState) -> Result<RwLockWriteGuard<'_, AppState>> {
    state.write().map_err(|_| anyhow!("Shared state lock poisoned"))
}
