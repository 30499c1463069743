pub mod comments;
pub mod migrations;
pub mod models;
pub mod photos;
pub mod social_medias;
pub mod users;

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::{Connection, ErrorCode};
use thiserror::Error;
use tracing::info;

use mygram_types::Id;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Id },
    /// UNIQUE or FOREIGN KEY violation (or a trigger abort).
    #[error("constraint violation: {0}")]
    Constraint(String),
    #[error("sqlite error: {0}")]
    Sqlite(rusqlite::Error),
    #[error("database lock poisoned")]
    LockPoisoned,
}

impl From<rusqlite::Error> for DbError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::SqliteFailure(err, msg) if err.code == ErrorCode::ConstraintViolation => {
                DbError::Constraint(msg.unwrap_or_else(|| err.to_string()))
            }
            other => DbError::Sqlite(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Single SQLite connection shared by every request. The mutex is the only
/// in-process shared mutable state.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;

        let db = Self::init(conn)?;
        info!("Database opened at {}", path.display());
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(mut conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        migrations::run(&mut conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|_| DbError::LockPoisoned)?;
        f(&conn)
    }

    /// Mutable access, needed to open a transaction.
    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock().map_err(|_| DbError::LockPoisoned)?;
        f(&mut conn)
    }
}

/// SQLite rowids are signed; an id past `i64::MAX` names no row.
pub(crate) fn rowid(id: Id) -> Option<i64> {
    i64::try_from(id).ok()
}

/// [`rowid`] for lookups where a missing row is an error.
pub(crate) fn require_rowid(entity: &'static str, id: Id) -> Result<i64> {
    rowid(id).ok_or(DbError::NotFound { entity, id })
}

/// Timestamps are kept at millisecond precision so they survive the trip
/// through SQLite text unchanged.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
