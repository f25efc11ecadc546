//! # etl-jobs
//!
//! The jobs the `etl-hub` binary runs:
//!
//! - [`directories`]: create the managed directory tree under the root.
//! - [`rates`]: fetch the latest reference rates and store them as a
//!   timestamped JSON file for downstream watchers.

#![deny(unsafe_code)]

pub mod directories;
pub mod errors;
pub mod rates;

pub use directories::{DirectoryLayout, ensure_directory_exists, initialize_directories};
pub use errors::{JobError, Result};
pub use rates::{RatesClient, run_rates_job, save_json_data};
