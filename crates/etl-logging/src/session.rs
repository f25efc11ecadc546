//! The session logger.
//!
//! [`SessionLogger`] is a two-state machine:
//!
//! ```text
//! Unstarted --start_session--> Active --close_session--> Unstarted
//!                                 \--start_session--> Active (fresh id)
//! ```
//!
//! Elapsed times come from [`Instant`], so step and total runtimes are never
//! negative. The counter and the last-event instant are updated together
//! before the record is written.

use std::path::Path;
use std::time::{Duration, Instant};

use etl_core::SessionId;
use tracing::{debug, trace, warn};

use crate::durable::{DurableSinkConfig, SqliteSink};
use crate::errors::{LogError, Result};
use crate::text_sink::TextSink;
use crate::types::{DEFAULT_PROCESS_TYPE, EventRecord, SessionState, TIMESTAMP_FORMAT};
use crate::user::current_user;

/// State held while a session is active.
struct ActiveSession {
    id: SessionId,
    start: Instant,
    last_event: Instant,
    counter: u64,
    text: TextSink,
    durable: Option<SqliteSink>,
}

impl ActiveSession {
    fn close(self) -> Result<()> {
        let ActiveSession {
            id,
            counter,
            text,
            durable,
            ..
        } = self;
        let text_result = text.close();
        let durable_result = durable.map_or(Ok(()), SqliteSink::close);
        debug!(session_id = %id, events = counter, "logging session closed");
        text_result.and(durable_result)
    }
}

/// Owns at most one logging session.
#[derive(Default)]
pub struct SessionLogger {
    active: Option<ActiveSession>,
}

impl SessionLogger {
    /// Create a logger with no active session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session writing to `destination`.
    ///
    /// Missing parent directories are created. When `durable` is given, the
    /// `SQLite` sink is opened too; if that fails a warning is emitted and
    /// the session runs text-only.
    ///
    /// A previously active session is closed only after the new text sink
    /// opens, so a failed start leaves the old session running.
    pub fn start_session(
        &mut self,
        destination: impl AsRef<Path>,
        durable: Option<&DurableSinkConfig>,
    ) -> Result<SessionId> {
        let text = TextSink::open(destination.as_ref())?;

        let durable = durable.and_then(|config| match SqliteSink::open(config) {
            Ok(sink) => Some(sink),
            Err(e) => {
                warn!(
                    path = %config.path.display(),
                    error = %e,
                    "durable log sink unavailable, continuing with text sink only"
                );
                None
            }
        });

        if let Some(previous) = self.active.take() {
            if let Err(e) = previous.close() {
                warn!(error = %e, "failed to close superseded logging session");
            }
        }

        let now = Instant::now();
        let id = SessionId::new();
        debug!(
            session_id = %id,
            path = %text.path().display(),
            durable = durable.is_some(),
            "logging session started"
        );

        self.active = Some(ActiveSession {
            id: id.clone(),
            start: now,
            last_event: now,
            counter: 0,
            text,
            durable,
        });
        Ok(id)
    }

    /// Record `message` with the default process type, text sink only.
    pub fn record(&mut self, message: &str) -> Result<EventRecord> {
        self.record_event(message, DEFAULT_PROCESS_TYPE, false)
    }

    /// Record one event.
    ///
    /// Appends one line to the text sink and, when `persist` is set and a
    /// durable sink is open, inserts one row. Without a durable sink
    /// `persist` is ignored. The counter advances even when a write fails;
    /// the first failure is returned.
    pub fn record_event(
        &mut self,
        message: &str,
        process_type: &str,
        persist: bool,
    ) -> Result<EventRecord> {
        let session = self.active.as_mut().ok_or(LogError::NotStarted)?;

        let now = Instant::now();
        session.counter += 1;
        let step_runtime = now.duration_since(session.last_event).as_secs_f64();
        let total_runtime = now.duration_since(session.start).as_secs_f64();
        session.last_event = now;

        let record = EventRecord {
            sequence: session.counter,
            session_id: session.id.clone(),
            process_type: process_type.to_string(),
            step_runtime,
            total_runtime,
            message: message.to_string(),
            user: current_user(),
            emitted_at: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
        };

        let text_result = session.text.write_record(&record);
        let durable_result = match (&session.durable, persist) {
            (Some(sink), true) => sink.insert(&record),
            (None, true) => {
                trace!(session_id = %record.session_id, "persist requested without durable sink");
                Ok(())
            }
            (_, false) => Ok(()),
        };

        trace!(
            session_id = %record.session_id,
            sequence = record.sequence,
            process_type = %record.process_type,
            "event recorded"
        );

        text_result.and(durable_result).map(|()| record)
    }

    /// Best-effort [`record`](Self::record): failures are reported, never
    /// returned.
    pub fn log(&mut self, message: &str) {
        self.log_event(message, DEFAULT_PROCESS_TYPE, false);
    }

    /// Best-effort [`record_event`](Self::record_event).
    pub fn log_event(&mut self, message: &str, process_type: &str, persist: bool) {
        if let Err(e) = self.record_event(message, process_type, persist) {
            warn!(error = %e, process_type, "failed to record log event");
        }
    }

    /// Flush the text sink. No-op without an active session.
    pub fn flush(&mut self) -> Result<()> {
        match self.active.as_mut() {
            Some(session) => session.text.flush(),
            None => Ok(()),
        }
    }

    /// Close the active session: flush and release the text sink, close the
    /// durable connection. No-op without an active session.
    pub fn close_session(&mut self) -> Result<()> {
        self.active.take().map_or(Ok(()), ActiveSession::close)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        if self.active.is_some() {
            SessionState::Active
        } else {
            SessionState::Unstarted
        }
    }

    /// Id of the active session.
    pub fn session_id(&self) -> Option<&SessionId> {
        self.active.as_ref().map(|s| &s.id)
    }

    /// Events recorded in the active session (0 when unstarted).
    pub fn event_count(&self) -> u64 {
        self.active.as_ref().map_or(0, |s| s.counter)
    }

    /// Time since the active session started.
    pub fn elapsed(&self) -> Option<Duration> {
        self.active.as_ref().map(|s| s.start.elapsed())
    }

    /// Whether the active session has an open durable sink.
    pub fn has_durable_sink(&self) -> bool {
        self.active.as_ref().is_some_and(|s| s.durable.is_some())
    }

    /// Text sink location of the active session.
    pub fn text_path(&self) -> Option<&Path> {
        self.active.as_ref().map(|s| s.text.path())
    }
}

impl Drop for SessionLogger {
    fn drop(&mut self) {
        if let Err(e) = self.close_session() {
            warn!(error = %e, "failed to close logging session on drop");
        }
    }
}

impl std::fmt::Debug for SessionLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLogger")
            .field("state", &self.state())
            .field("session_id", &self.session_id())
            .field("event_count", &self.event_count())
            .finish()
    }
}
