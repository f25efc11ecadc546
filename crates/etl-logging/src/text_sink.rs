//! Append-only text sink.
//!
//! One UTF-8 line per event, prefixed with the record's `emitted_at`:
//!
//! ```text
//! 2026-01-02 03:04:05 - Counter: 1 - UUID: <id> - Process Type: default - Step Runtime: 0.00 - Total Runtime: 0.00 - begin - User: etl
//! ```
//!
//! Line breaks inside the message are escaped by
//! [`EventRecord::to_line`], so an event never spans two lines.
//!
//! Each line is flushed as it is written so the file stays readable by
//! other processes while the session is open.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::errors::{LogError, Result};
use crate::types::EventRecord;

/// File-backed text sink opened in append mode.
pub struct TextSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl TextSink {
    /// Open (or create) the sink, creating any missing parent directories.
    pub fn open(path: &Path) -> Result<Self> {
        let sink_err = |source| LogError::TextSink {
            path: path.to_owned(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(sink_err)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(sink_err)?;

        Ok(Self {
            path: path.to_owned(),
            writer: BufWriter::new(file),
        })
    }

    /// Append one line for `record` and flush it.
    pub fn write_record(&mut self, record: &EventRecord) -> Result<()> {
        writeln!(self.writer, "{} - {}", record.emitted_at, record.to_line())?;
        self.writer.flush()?;
        Ok(())
    }

    /// Flush buffered output and sync it to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_data()?;
        Ok(())
    }

    /// Flush and release the file handle.
    pub fn close(mut self) -> Result<()> {
        self.flush()
    }

    /// Location of the sink.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for TextSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextSink").field("path", &self.path).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use etl_core::SessionId;

    fn record(sequence: u64, message: &str) -> EventRecord {
        EventRecord {
            sequence,
            session_id: SessionId::from("sess_t"),
            process_type: "default".to_string(),
            step_runtime: 0.0,
            total_runtime: 1.5,
            message: message.to_string(),
            user: "etl".to_string(),
            emitted_at: "2026-01-02 03:04:05".to_string(),
        }
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/c/run.log");
        let sink = TextSink::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(sink.path(), path);
    }

    #[test]
    fn writes_prefixed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        let mut sink = TextSink::open(&path).unwrap();
        sink.write_record(&record(1, "begin")).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "2026-01-02 03:04:05 - Counter: 1 - UUID: sess_t - Process Type: default - \
             Step Runtime: 0.00 - Total Runtime: 1.50 - begin - User: etl\n"
        );
    }

    #[test]
    fn multi_line_message_stays_on_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        let mut sink = TextSink::open(&path).unwrap();
        sink.write_record(&record(1, "first\nCounter: 99 - UUID: forged"))
            .unwrap();
        sink.write_record(&record(2, "crlf\r\nend")).unwrap();
        sink.close().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Counter: 1 - "));
        assert!(lines[0].ends_with(" - first\\nCounter: 99 - UUID: forged - User: etl"));
        assert!(lines[1].ends_with(" - crlf\\r\\nend - User: etl"));
    }

    #[test]
    fn appends_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        std::fs::write(&path, "earlier line\n").unwrap();

        let mut sink = TextSink::open(&path).unwrap();
        sink.write_record(&record(1, "later")).unwrap();
        sink.close().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "earlier line");
        assert!(lines[1].ends_with("later - User: etl"));
    }

    #[test]
    fn open_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let err = TextSink::open(&blocker.join("run.log")).unwrap_err();
        assert!(matches!(err, LogError::TextSink { .. }));
    }
}
