//! Managed directory tree.
//!
//! ```text
//! <root>/
//! ├── file_watcher/   incoming files
//! ├── logs/           session logs
//! └── archive/        processed files
//! ```

use std::path::{Path, PathBuf};

use etl_settings::{DirectorySettings, EtlSettings};
use tracing::{debug, info};

use crate::errors::{JobError, Result};

/// Absolute locations of the managed directories.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryLayout {
    /// Root every other directory lives under.
    pub root: PathBuf,
    /// Incoming files picked up by watchers.
    pub file_watcher: PathBuf,
    /// Session logs.
    pub logs: PathBuf,
    /// Processed files.
    pub archive: PathBuf,
}

impl DirectoryLayout {
    /// Layout under `root` with the default subdirectory names.
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        Self::with_names(root, &DirectorySettings::default())
    }

    /// Layout under `root` with the given subdirectory names.
    pub fn with_names(root: impl Into<PathBuf>, names: &DirectorySettings) -> Self {
        let root = root.into();
        Self {
            file_watcher: root.join(&names.file_watcher),
            logs: root.join(&names.logs),
            archive: root.join(&names.archive),
            root,
        }
    }

    /// Layout described by `settings`.
    pub fn from_settings(settings: &EtlSettings) -> Self {
        Self::with_names(settings.root_path(), &settings.directories)
    }

    /// Every directory in creation order, root first.
    pub fn all(&self) -> [&Path; 4] {
        [&self.root, &self.file_watcher, &self.logs, &self.archive]
    }
}

/// Create `path` and any missing ancestors.
///
/// Returns `true` if the directory was created, `false` if it already
/// existed.
pub fn ensure_directory_exists(path: &Path) -> Result<bool> {
    if path.is_dir() {
        debug!(path = %path.display(), "directory already exists");
        return Ok(false);
    }

    std::fs::create_dir_all(path).map_err(|source| JobError::CreateDir {
        path: path.to_owned(),
        source,
    })?;
    info!(path = %path.display(), "created directory");
    Ok(true)
}

/// Ensure every directory in `layout` exists. Returns the ones created.
pub fn initialize_directories(layout: &DirectoryLayout) -> Result<Vec<PathBuf>> {
    let mut created = Vec::new();
    for dir in layout.all() {
        if ensure_directory_exists(dir)? {
            created.push(dir.to_owned());
        }
    }
    Ok(created)
}
