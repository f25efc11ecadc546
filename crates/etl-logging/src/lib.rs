//! # etl-logging
//!
//! Session-scoped event logging for ETL jobs.
//!
//! A [`SessionLogger`] owns one logging session at a time: a unique
//! [`SessionId`](etl_core::SessionId), a monotonic elapsed-time clock, a
//! running event counter, an append-only [`TextSink`] and an optional
//! [`SqliteSink`]. Every recorded event produces exactly one text line and,
//! when requested and configured, exactly one database row.
//!
//! ```no_run
//! use etl_logging::SessionLogger;
//!
//! let mut logger = SessionLogger::new();
//! logger.start_session("/tmp/run.log", None)?;
//! logger.log("begin");
//! logger.log_event("loaded 42 rows", "load", false);
//! logger.close_session()?;
//! # Ok::<(), etl_logging::LogError>(())
//! ```
//!
//! [`SessionLogger::record_event`] returns a typed result; the `log*`
//! wrappers report failures through `tracing` and never fail the caller.
//! [`SharedSessionLogger`] serializes access for multi-threaded callers.

#![deny(unsafe_code)]

pub mod durable;
pub mod errors;
pub mod session;
pub mod shared;
pub mod text_sink;
pub mod types;
pub mod user;

pub use durable::{DurableSinkConfig, SqliteSink};
pub use errors::{LogError, Result};
pub use session::SessionLogger;
pub use shared::SharedSessionLogger;
pub use text_sink::TextSink;
pub use types::{DEFAULT_PROCESS_TYPE, EventRecord, SessionState, TIMESTAMP_FORMAT};
pub use user::current_user;
