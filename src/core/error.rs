//! Domain errors shared by the account, calendar and API layers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Not logged in")]
    Unauthenticated,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("{0}")]
    Validation(String),

    #[error("Partner account not found")]
    PartnerNotFound,

    #[error("Event already exists for {0}")]
    AlreadyExists(String),

    #[error("Storage error: {0}")]
    Storage(#[from] tokio_rusqlite::Error),
}

impl From<rusqlite::Error> for CalendarError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(err.into())
    }
}

pub type CalendarResult<T> = Result<T, CalendarError>;
