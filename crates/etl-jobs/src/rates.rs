//! Reference-rate fetch job.
//!
//! Downloads the latest rates document and stores it verbatim as
//! `<base>_<YYYYMMDDTHHMMSS>.json`, pretty-printed with 4-space indentation.
//! A failed fetch is reported and skipped; only a failed write is an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeZone};
use etl_settings::RatesSettings;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::{debug, info, warn};

use crate::errors::{JobError, Result};

/// Timeout used by [`RatesClient::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// `chrono` format for the filename timestamp.
pub const FILENAME_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

const USER_AGENT: &str = concat!("etl-hub/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the rates endpoint.
#[derive(Clone, Debug)]
pub struct RatesClient {
    client: reqwest::Client,
}

impl RatesClient {
    /// Create a client with the default timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a client whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Create a client from the rates settings section.
    pub fn from_settings(settings: &RatesSettings) -> Self {
        Self::with_timeout(Duration::from_secs(settings.timeout_secs))
    }

    /// GET `url` and parse the body as JSON. Non-2xx statuses are errors.
    pub async fn fetch(&self, url: &str) -> Result<Value> {
        debug!(url, "fetching rates");
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.json::<Value>().await?)
    }
}

impl Default for RatesClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Filename for a document captured at `at`.
pub fn rates_filename<Tz>(base_filename: &str, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{base_filename}_{}.json",
        at.format(FILENAME_TIMESTAMP_FORMAT)
    )
}

/// Write `data` to `<output_dir>/<base>_<timestamp>.json`, creating
/// `output_dir` if needed. Returns the written path.
pub fn save_json_data(data: &Value, output_dir: &Path, base_filename: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir).map_err(|source| JobError::CreateDir {
        path: output_dir.to_owned(),
        source,
    })?;

    let path = output_dir.join(rates_filename(base_filename, &chrono::Local::now()));

    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    data.serialize(&mut ser)?;

    std::fs::write(&path, &buf).map_err(|source| JobError::Write {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), bytes = buf.len(), "rates data saved");
    Ok(path)
}

/// Fetch `url` and save the document under `output_dir`.
///
/// Returns `Ok(None)` without writing anything when the fetch fails.
pub async fn run_rates_job(
    client: &RatesClient,
    url: &str,
    output_dir: &Path,
    base_filename: &str,
) -> Result<Option<PathBuf>> {
    match client.fetch(url).await {
        Ok(data) => save_json_data(&data, output_dir, base_filename).map(Some),
        Err(e) => {
            warn!(url, error = %e, "failed to fetch rates data, nothing saved");
            Ok(None)
        }
    }
}
