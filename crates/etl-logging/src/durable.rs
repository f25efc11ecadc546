//! `SQLite` durable sink.
//!
//! Rows go to a single `logs` table created on open if absent. The user
//! column is named `username` since `user` is reserved in several SQL
//! dialects.

use std::path::{Path, PathBuf};
use std::time::Duration;

use etl_core::SessionId;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{LogError, Result};
use crate::types::EventRecord;

/// SQL DDL for the log table.
pub const CREATE_TABLES: &str = r"
CREATE TABLE IF NOT EXISTS logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp TEXT NOT NULL,
    counter INTEGER NOT NULL,
    uuid TEXT NOT NULL,
    process_type TEXT NOT NULL,
    step_runtime REAL NOT NULL,
    total_runtime REAL NOT NULL,
    message TEXT NOT NULL,
    username TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_logs_uuid ON logs(uuid);
";

const PRAGMAS: &str = r"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
";

/// Connection parameters for the durable sink.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurableSinkConfig {
    /// Database file. Parent directories are created on open.
    pub path: PathBuf,
    /// How long an insert waits on a locked database.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

impl DurableSinkConfig {
    /// Config for `path` with the default busy timeout.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

/// One-connection `SQLite` sink for event records.
pub struct SqliteSink {
    conn: Connection,
    path: PathBuf,
}

impl SqliteSink {
    /// Open or create the database and ensure the log table exists.
    pub fn open(config: &DurableSinkConfig) -> Result<Self> {
        if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| LogError::Durable(format!("create dir: {e}")))?;
        }

        let conn = Connection::open(&config.path)?;
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
        conn.execute_batch(PRAGMAS)
            .map_err(|e| LogError::Durable(format!("pragmas: {e}")))?;
        conn.execute_batch(CREATE_TABLES)
            .map_err(|e| LogError::Durable(format!("schema: {e}")))?;

        debug!(path = %config.path.display(), "durable log sink opened");

        Ok(Self {
            conn,
            path: config.path.clone(),
        })
    }

    #[cfg(test)]
    pub(crate) fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(CREATE_TABLES)
            .map_err(|e| LogError::Durable(format!("schema: {e}")))?;
        Ok(Self {
            conn,
            path: PathBuf::from(":memory:"),
        })
    }

    /// Insert one row for `record`.
    pub fn insert(&self, record: &EventRecord) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO logs (timestamp, counter, uuid, process_type, step_runtime, \
             total_runtime, message, username) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        let _ = stmt.execute(rusqlite::params![
            record.emitted_at,
            record.sequence,
            record.session_id.as_str(),
            record.process_type,
            record.step_runtime,
            record.total_runtime,
            record.message,
            record.user,
        ])?;
        Ok(())
    }

    /// Total rows in the log table.
    pub fn count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM logs", [], |row| row.get(0))?)
    }

    /// Rows recorded under `session_id`.
    pub fn count_for_session(&self, session_id: &SessionId) -> Result<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM logs WHERE uuid = ?1",
            [session_id.as_str()],
            |row| row.get(0),
        )?)
    }

    /// Database location (`:memory:` for in-memory sinks).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the connection, surfacing any error `SQLite` reports.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| LogError::from(e))
    }
}

impl std::fmt::Debug for SqliteSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteSink").field("path", &self.path).finish()
    }
}
