//! # etl-core
//!
//! Foundation types shared by the etl-hub crates:
//!
//! - [`ids::SessionId`]: branded session identifier (UUID v7)
//! - [`logging`]: `tracing` subscriber bootstrap and test log capture

#![deny(unsafe_code)]

pub mod ids;
pub mod logging;

pub use ids::SessionId;
