//! Prospect store database: connection bootstrap and schema upgrades.
//!
//! # Responsibility
//! - Hand out SQLite connections whose `prospects` and `settings` tables
//!   are ready to use.
//! - Report which schema step failed when an upgrade cannot be applied.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - A failed upgrade rolls back every step of the same open.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Storage bootstrap errors.
#[derive(Debug)]
pub enum DbError {
    /// Connection setup or a pragma query failed.
    Sqlite(rusqlite::Error),
    /// One schema step failed; nothing from this open was committed.
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
    /// The file was written by a newer build of the app.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "schema step {version} ({name}) failed: {source}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "prospect store schema {db_version} was written by a newer app (this build reads up to {latest_supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
