//! Job error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the jobs.
#[derive(Debug, Error)]
pub enum JobError {
    /// A directory could not be created.
    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir {
        /// Directory that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// An output file could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// File that was being written.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// Request, non-success status, or body decode failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serializing the payload failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for job operations.
pub type Result<T> = std::result::Result<T, JobError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_dir_display_includes_path() {
        let err = JobError::CreateDir {
            path: PathBuf::from("/srv/etl/logs"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/srv/etl/logs"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn json_error_converts() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: JobError = source.into();
        assert!(matches!(err, JobError::Json(_)));
    }
}
