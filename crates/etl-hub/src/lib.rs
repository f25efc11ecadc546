//! # etl-hub
//!
//! Library half of the `etl-hub` binary: where each job's session log goes
//! and how the durable sink is configured from settings.

#![deny(unsafe_code)]

pub mod log_paths;
