use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::core::config::{SeedAccount, default_accounts};

/// One of the two partners. Accounts are created at first boot and are
/// never renamed or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    pub id: i64,
    pub username: String,
    #[serde(skip)]
    pub credential_hash: String,
}

/// The authenticated caller, passed explicitly into every calendar
/// operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identity {
    pub id: i64,
    pub username: String,
}

impl From<&Account> for Identity {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
        }
    }
}

/// Hex encoded SHA-256 of the password. Credentials are only ever
/// compared in this form.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// True when the account still uses one of the published default
/// credentials.
pub fn uses_default_credentials(account: &SeedAccount) -> bool {
    default_accounts().contains(account)
}
