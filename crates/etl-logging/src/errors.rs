//! Logger error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the session logger and its sinks.
#[derive(Debug, Error)]
pub enum LogError {
    /// An event was recorded before `start_session` (or after close).
    #[error("no active logging session")]
    NotStarted,

    /// The text sink could not be created or opened.
    #[error("failed to open text sink {}: {source}", .path.display())]
    TextSink {
        /// Requested sink location.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// Writing or flushing a text line failed.
    #[error("failed to write log line: {0}")]
    Write(#[from] std::io::Error),

    /// The durable sink failed to open, create its table, or insert.
    #[error("durable sink error: {0}")]
    Durable(String),
}

impl From<rusqlite::Error> for LogError {
    fn from(e: rusqlite::Error) -> Self {
        LogError::Durable(e.to_string())
    }
}

/// Result type for logger operations.
pub type Result<T> = std::result::Result<T, LogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_started_display() {
        assert_eq!(LogError::NotStarted.to_string(), "no active logging session");
    }

    #[test]
    fn text_sink_display_includes_path() {
        let err = LogError::TextSink {
            path: PathBuf::from("/nope/run.log"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/nope/run.log"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn io_error_converts_to_write() {
        let err: LogError = std::io::Error::other("disk full").into();
        assert!(matches!(err, LogError::Write(_)));
    }

    #[test]
    fn sqlite_error_converts_to_durable() {
        let err: LogError = rusqlite::Error::InvalidQuery.into();
        assert!(matches!(err, LogError::Durable(_)));
    }
}
