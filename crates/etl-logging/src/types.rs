//! Event records and session state.

use std::borrow::Cow;

use etl_core::SessionId;
use serde::{Deserialize, Serialize};

/// Process type tag used when the caller does not supply one.
pub const DEFAULT_PROCESS_TYPE: &str = "default";

/// `chrono` format for `emitted_at` and the text line prefix.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Lifecycle state of a [`SessionLogger`](crate::SessionLogger).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No session; `record_event` is rejected.
    Unstarted,
    /// A session is open and accepting events.
    Active,
}

/// One recorded event, as written to the sinks.
///
/// Produced by each successful `record_event` call and handed back to the
/// caller; the logger keeps no copy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Counter value after the increment for this event (1-based).
    pub sequence: u64,
    /// Session the event belongs to.
    pub session_id: SessionId,
    /// Caller-supplied tag.
    pub process_type: String,
    /// Seconds since the previous event (or session start).
    pub step_runtime: f64,
    /// Seconds since session start.
    pub total_runtime: f64,
    /// Free-text message.
    pub message: String,
    /// OS user resolved when the event was recorded.
    pub user: String,
    /// Local wall-clock time, second precision ([`TIMESTAMP_FORMAT`]).
    pub emitted_at: String,
}

impl EventRecord {
    /// Format the record body as written after the timestamp prefix.
    ///
    /// Line breaks in `process_type` and `message` are escaped so every
    /// event stays on one line.
    pub fn to_line(&self) -> String {
        format!(
            "Counter: {} - UUID: {} - Process Type: {} - Step Runtime: {:.2} - Total Runtime: {:.2} - {} - User: {}",
            self.sequence,
            self.session_id,
            escape_line_breaks(&self.process_type),
            self.step_runtime,
            self.total_runtime,
            escape_line_breaks(&self.message),
            self.user,
        )
    }
}

/// Replace `\r` and `\n` with their two-character escapes.
fn escape_line_breaks(s: &str) -> Cow<'_, str> {
    if s.contains(['\r', '\n']) {
        Cow::Owned(s.replace('\r', "\\r").replace('\n', "\\n"))
    } else {
        Cow::Borrowed(s)
    }
}
