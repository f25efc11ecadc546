//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]` so a settings
//! file may be partial: missing fields take their compiled default.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default rates endpoint (NY Fed reference rates, latest observation).
pub const DEFAULT_RATES_URL: &str = "https://markets.newyorkfed.org/api/rates/all/latest.json";

/// Root settings type.
///
/// ```json
/// {
///   "rootDir": "/srv/etl_hub",
///   "rates": { "timeoutSecs": 10 },
///   "logging": { "database": "/srv/etl_hub/logs/logs.db" }
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EtlSettings {
    /// Root directory every job works under.
    pub root_dir: String,
    /// Subdirectories of `root_dir` created by the bootstrap job.
    pub directories: DirectorySettings,
    /// Rates fetch job settings.
    pub rates: RatesSettings,
    /// Session logger settings.
    pub logging: LoggingSettings,
}

impl Default for EtlSettings {
    fn default() -> Self {
        Self {
            root_dir: home_dir().join("etl_hub").to_string_lossy().into_owned(),
            directories: DirectorySettings::default(),
            rates: RatesSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl EtlSettings {
    /// Root directory as a path.
    pub fn root_path(&self) -> PathBuf {
        PathBuf::from(&self.root_dir)
    }

    /// Directory session logs are written to.
    pub fn log_dir(&self) -> PathBuf {
        self.root_path().join(&self.directories.logs)
    }

    /// Directory the rates job writes into. Falls back to the file watcher
    /// directory so downstream watchers pick the file up.
    pub fn rates_output_dir(&self) -> PathBuf {
        self.rates.output_dir.as_ref().map_or_else(
            || self.root_path().join(&self.directories.file_watcher),
            PathBuf::from,
        )
    }
}

/// Names of the managed subdirectories, relative to the root.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DirectorySettings {
    /// Incoming files picked up by watchers.
    pub file_watcher: String,
    /// Session log files and the optional log database.
    pub logs: String,
    /// Processed files.
    pub archive: String,
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            file_watcher: "file_watcher".to_string(),
            logs: "logs".to_string(),
            archive: "archive".to_string(),
        }
    }
}

/// Rates fetch job settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RatesSettings {
    /// Endpoint returning the rates JSON document.
    pub url: String,
    /// Output directory override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
    /// Filename prefix; the timestamp and `.json` are appended.
    pub base_filename: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RatesSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_RATES_URL.to_string(),
            output_dir: None,
            base_filename: "ny_fed_rates".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Session logger settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Diagnostic (`tracing`) level for stderr output.
    pub level: String,
    /// `SQLite` file for the durable sink. Text-only when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// Persist every CLI-recorded event to the durable sink.
    pub persist_by_default: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            database: None,
            persist_by_default: false,
        }
    }
}

pub(crate) fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = EtlSettings::default();
        assert!(s.root_dir.ends_with("etl_hub"));
        assert_eq!(s.directories.logs, "logs");
        assert_eq!(s.rates.url, DEFAULT_RATES_URL);
        assert_eq!(s.rates.base_filename, "ny_fed_rates");
        assert_eq!(s.rates.timeout_secs, 30);
        assert_eq!(s.logging.level, "warn");
        assert!(s.logging.database.is_none());
        assert!(!s.logging.persist_by_default);
    }

    #[test]
    fn derived_paths() {
        let s = EtlSettings {
            root_dir: "/srv/etl".to_string(),
            ..Default::default()
        };
        assert_eq!(s.log_dir(), PathBuf::from("/srv/etl/logs"));
        assert_eq!(s.rates_output_dir(), PathBuf::from("/srv/etl/file_watcher"));
    }

    #[test]
    fn rates_output_dir_override() {
        let mut s = EtlSettings::default();
        s.rates.output_dir = Some("/data/rates".to_string());
        assert_eq!(s.rates_output_dir(), PathBuf::from("/data/rates"));
    }

    #[test]
    fn serializes_camel_case_and_omits_none() {
        let json = serde_json::to_value(EtlSettings::default()).unwrap();
        assert!(json.get("rootDir").is_some());
        assert!(json["rates"].get("baseFilename").is_some());
        assert!(json["rates"].get("outputDir").is_none());
        assert!(json["logging"].get("database").is_none());
        assert_eq!(json["logging"]["persistByDefault"], false);
    }
}
