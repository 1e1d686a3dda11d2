//! Database connection management.
//!
//! [`Database`] owns a shared [`rusqlite::Connection`] and guarantees that the
//! schema exists before any other operation.

use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use rusqlite::Connection;
use thiserror::Error;

/// Current schema version, tracked with `PRAGMA user_version`.
const SCHEMA_VERSION: u32 = 1;

const SCHEMA_V1: &str = "
CREATE TABLE IF NOT EXISTS messages (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    text        TEXT    NOT NULL,
    author_name TEXT    NOT NULL,
    author_id   TEXT    NOT NULL,
    created_at  INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS users (
    id         TEXT    PRIMARY KEY,
    name       TEXT    NOT NULL UNIQUE,
    token      TEXT    NOT NULL UNIQUE,
    muted      INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL
);
";

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database connection lock is poisoned")]
    Poisoned,

    #[error("blocking task failed: {0}")]
    Join(String),
}

/// Cloneable handle to a single SQLite connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) a database file at `path`.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        tracing::info!(path = %path.display(), "opening database");
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::init(conn)
    }

    /// Open a private in-memory database (used by tests).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, DatabaseError> {
        let current: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        if current < SCHEMA_VERSION {
            tracing::info!(
                current_version = current,
                target_version = SCHEMA_VERSION,
                "applying database schema"
            );
            conn.execute_batch(SCHEMA_V1)?;
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        }

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking thread pool.
    pub(super) async fn run<T, F>(&self, f: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || -> Result<T, DatabaseError> {
            let guard = conn.lock().map_err(|_| DatabaseError::Poisoned)?;
            Ok(f(&guard)?)
        })
        .await
        .map_err(|e| DatabaseError::Join(e.to_string()))?
    }
}
