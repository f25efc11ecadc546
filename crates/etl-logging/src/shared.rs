//! Cloneable, thread-safe handle to a [`SessionLogger`].
//!
//! Every call takes the lock for its whole duration, so the counter
//! increment, timer update and sink writes of one event never interleave
//! with another's.

use std::path::Path;
use std::sync::Arc;

use etl_core::SessionId;
use parking_lot::Mutex;

use crate::durable::DurableSinkConfig;
use crate::errors::Result;
use crate::session::SessionLogger;
use crate::types::{EventRecord, SessionState};

/// Shared session logger.
#[derive(Clone, Default)]
pub struct SharedSessionLogger {
    inner: Arc<Mutex<SessionLogger>>,
}

impl SharedSessionLogger {
    /// Create a handle with no active session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing logger.
    pub fn from_logger(logger: SessionLogger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(logger)),
        }
    }

    /// See [`SessionLogger::start_session`].
    pub fn start_session(
        &self,
        destination: impl AsRef<Path>,
        durable: Option<&DurableSinkConfig>,
    ) -> Result<SessionId> {
        self.inner.lock().start_session(destination, durable)
    }

    /// See [`SessionLogger::record`].
    pub fn record(&self, message: &str) -> Result<EventRecord> {
        self.inner.lock().record(message)
    }

    /// See [`SessionLogger::record_event`].
    pub fn record_event(
        &self,
        message: &str,
        process_type: &str,
        persist: bool,
    ) -> Result<EventRecord> {
        self.inner.lock().record_event(message, process_type, persist)
    }

    /// See [`SessionLogger::log`].
    pub fn log(&self, message: &str) {
        self.inner.lock().log(message);
    }

    /// See [`SessionLogger::log_event`].
    pub fn log_event(&self, message: &str, process_type: &str, persist: bool) {
        self.inner.lock().log_event(message, process_type, persist);
    }

    /// See [`SessionLogger::flush`].
    pub fn flush(&self) -> Result<()> {
        self.inner.lock().flush()
    }

    /// See [`SessionLogger::close_session`].
    pub fn close_session(&self) -> Result<()> {
        self.inner.lock().close_session()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.inner.lock().state()
    }

    /// Id of the active session.
    pub fn session_id(&self) -> Option<SessionId> {
        self.inner.lock().session_id().cloned()
    }

    /// Events recorded in the active session.
    pub fn event_count(&self) -> u64 {
        self.inner.lock().event_count()
    }

    /// Run `f` with exclusive access to the logger.
    pub fn with<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut SessionLogger) -> T,
    {
        f(&mut self.inner.lock())
    }
}

impl std::fmt::Debug for SharedSessionLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedSessionLogger")
            .field(&*self.inner.lock())
            .finish()
    }
}
