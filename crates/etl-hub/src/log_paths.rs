//! Session log path policy.
//!
//! Every job writes to `<log_dir>/<job>_<YYYYMMDD>.log`, so runs of the
//! same job on the same day share one file and can be told apart by their
//! session id.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use etl_logging::DurableSinkConfig;
use etl_settings::EtlSettings;

/// `chrono` format for the date part of a log filename.
pub const LOG_DATE_FORMAT: &str = "%Y%m%d";

/// Log file for `job` on `date`.
#[must_use]
pub fn log_path_for_job(log_dir: &Path, job: &str, date: NaiveDate) -> PathBuf {
    log_dir.join(format!("{job}_{}.log", date.format(LOG_DATE_FORMAT)))
}

/// Today's (local date) log file for `job` under the configured log dir.
#[must_use]
pub fn todays_log_path(settings: &EtlSettings, job: &str) -> PathBuf {
    log_path_for_job(&settings.log_dir(), job, chrono::Local::now().date_naive())
}

/// Durable sink config, when `logging.database` is set.
///
/// A relative database path is resolved against the log directory.
#[must_use]
pub fn durable_config(settings: &EtlSettings) -> Option<DurableSinkConfig> {
    let database = settings.logging.database.as_deref()?;
    let path = Path::new(database);
    let path = if path.is_absolute() {
        path.to_owned()
    } else {
        settings.log_dir().join(path)
    };
    Some(DurableSinkConfig::new(path))
}
