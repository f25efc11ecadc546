//! # etl-hub
//!
//! Runs one ETL job per invocation inside a logging session.

#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use etl_hub::log_paths::{durable_config, todays_log_path};
use etl_jobs::{DirectoryLayout, RatesClient, initialize_directories, run_rates_job};
use etl_logging::{DEFAULT_PROCESS_TYPE, SessionLogger};
use etl_settings::{EtlSettings, get_settings, init_settings, load_settings, load_settings_from_path};
use tracing::warn;

/// ETL job runner.
#[derive(Parser, Debug)]
#[command(name = "etl-hub", about = "ETL job runner with session logging")]
struct Cli {
    /// Settings file (defaults to `~/.etlhub/settings.json`).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the managed directory tree under the root directory.
    InitDirs,

    /// Fetch the latest reference rates and save them as JSON.
    FetchRates {
        /// Endpoint to fetch (overrides settings).
        #[arg(long)]
        url: Option<String>,

        /// Directory to save into (overrides settings).
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Record one event in the `log` job's session log.
    Log {
        /// Message to record.
        message: String,

        /// Process type tag.
        #[arg(long, default_value = DEFAULT_PROCESS_TYPE)]
        process_type: String,

        /// Also write the event to the log database.
        #[arg(long)]
        persist: bool,
    },
}

impl Command {
    fn job_name(&self) -> &'static str {
        match self {
            Self::InitDirs => "init_dirs",
            Self::FetchRates { .. } => "fetch_rates",
            Self::Log { .. } => "log",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // An explicit settings file must load; the default one falls back.
    let (settings, load_error) = match &args.settings {
        Some(path) => {
            let settings = load_settings_from_path(path)
                .with_context(|| format!("Failed to load settings: {}", path.display()))?;
            (settings, None)
        }
        None => match load_settings() {
            Ok(settings) => (settings, None),
            Err(e) => (EtlSettings::default(), Some(e)),
        },
    };

    etl_core::logging::init_subscriber(&settings.logging.level);
    if let Some(e) = load_error {
        warn!(error = %e, "failed to load settings, using defaults");
    }
    let _ = init_settings(settings);
    let settings = get_settings();

    let job = args.command.job_name();
    let log_path = todays_log_path(settings, job);
    let durable = durable_config(settings);

    let mut logger = SessionLogger::new();
    let _ = logger
        .start_session(&log_path, durable.as_ref())
        .with_context(|| format!("Failed to start log session: {}", log_path.display()))?;

    let result = run(args.command, settings, &mut logger).await;
    if let Err(e) = &result {
        logger.log_event(&format!("Job failed: {e:#}"), job, settings.logging.persist_by_default);
    }
    logger.close_session().context("Failed to close log session")?;
    result
}

async fn run(command: Command, settings: &EtlSettings, logger: &mut SessionLogger) -> Result<()> {
    let persist = settings.logging.persist_by_default;
    let job = command.job_name();

    match command {
        Command::InitDirs => {
            let layout = DirectoryLayout::from_settings(settings);
            logger.log_event("Initializing directories", job, persist);

            let created = initialize_directories(&layout)?;
            for dir in layout.all() {
                let status = if created.iter().any(|c| c == dir) {
                    "created"
                } else {
                    "exists"
                };
                println!("{status:>8}  {}", dir.display());
            }

            logger.log_event(
                &format!("Created {} of {} directories", created.len(), layout.all().len()),
                job,
                persist,
            );
        }

        Command::FetchRates { url, output_dir } => {
            let url = url.unwrap_or_else(|| settings.rates.url.clone());
            let output_dir = output_dir.unwrap_or_else(|| settings.rates_output_dir());
            let client = RatesClient::from_settings(&settings.rates);

            logger.log_event(&format!("Fetching rates from {url}"), job, persist);
            match run_rates_job(&client, &url, &output_dir, &settings.rates.base_filename).await? {
                Some(path) => {
                    println!("Data saved to {}", path.display());
                    logger.log_event(&format!("Data saved to {}", path.display()), job, persist);
                }
                None => {
                    println!("Failed to fetch data from {url}");
                    logger.log_event(&format!("Failed to fetch data from {url}"), job, persist);
                }
            }
        }

        Command::Log {
            message,
            process_type,
            persist: persist_flag,
        } => {
            let _ = logger
                .record_event(&message, &process_type, persist_flag || persist)
                .context("Failed to record event")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_fetch_rates_overrides() {
        let cli = Cli::try_parse_from([
            "etl-hub",
            "fetch-rates",
            "--url",
            "http://localhost:1/rates.json",
            "--output-dir",
            "/tmp/out",
        ])
        .unwrap();
        match cli.command {
            Command::FetchRates { url, output_dir } => {
                assert_eq!(url.as_deref(), Some("http://localhost:1/rates.json"));
                assert_eq!(output_dir, Some(PathBuf::from("/tmp/out")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_log_defaults() {
        let cli = Cli::try_parse_from(["etl-hub", "log", "hello world"]).unwrap();
        match cli.command {
            Command::Log {
                message,
                process_type,
                persist,
            } => {
                assert_eq!(message, "hello world");
                assert_eq!(process_type, DEFAULT_PROCESS_TYPE);
                assert!(!persist);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn settings_flag_is_global() {
        let cli =
            Cli::try_parse_from(["etl-hub", "init-dirs", "--settings", "/etc/etl.json"]).unwrap();
        assert_eq!(cli.settings, Some(PathBuf::from("/etc/etl.json")));
        assert_eq!(cli.command.job_name(), "init_dirs");
    }

    #[tokio::test]
    async fn init_dirs_creates_layout_and_logs() {
        let dir = tempfile::tempdir().unwrap();
        let settings = EtlSettings {
            root_dir: dir.path().join("etl_hub").to_string_lossy().into_owned(),
            ..Default::default()
        };
        let log_path = todays_log_path(&settings, "init_dirs");

        let mut logger = SessionLogger::new();
        let _ = logger.start_session(&log_path, None).unwrap();
        run(Command::InitDirs, &settings, &mut logger).await.unwrap();
        logger.close_session().unwrap();

        assert!(DirectoryLayout::from_settings(&settings).all().iter().all(|p| p.is_dir()));
        let content = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("Created 4 of 4 directories"));
    }

    #[tokio::test]
    async fn log_command_records_with_given_process_type() {
        let dir = tempfile::tempdir().unwrap();
        let settings = EtlSettings {
            root_dir: dir.path().to_string_lossy().into_owned(),
            ..Default::default()
        };
        let log_path = todays_log_path(&settings, "log");

        let mut logger = SessionLogger::new();
        let _ = logger.start_session(&log_path, None).unwrap();
        let command = Command::Log {
            message: "nightly load done".to_string(),
            process_type: "load".to_string(),
            persist: true,
        };
        run(command, &settings, &mut logger).await.unwrap();
        logger.close_session().unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("Process Type: load"));
        assert!(content.contains(" - nightly load done - User: "));
    }
}
