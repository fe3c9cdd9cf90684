//! Append-only audit trail of user actions.

use std::{
    fmt,
    fs::{File, OpenOptions},
    io::{self, Write},
    path::Path,
};

use chrono::Local;

/// Timestamp layout of an audit entry, e.g. `Tue Oct 14 09:05:00 2026`.
const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// An append-only log of `[<timestamp>] <event>` lines.
///
/// The log is opened once and every entry is flushed as soon as it is
/// written.
pub struct AuditLog {
    sink: Box<dyn Write + Send>,
}

impl AuditLog {
    /// Opens (or creates) the log file at `path` in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file: File = OpenOptions::new().append(true).create(true).open(path)?;
        tracing::debug!("Opened audit log at {}", path.display());
        Ok(Self::from_writer(file))
    }

    /// Writes entries to an arbitrary sink.
    pub fn from_writer(sink: impl Write + Send + 'static) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }

    /// A log that discards every entry.
    #[must_use]
    pub fn discard() -> Self {
        Self::from_writer(io::sink())
    }

    /// Appends an entry stamped with the current local time.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be written or flushed.
    pub fn record(&mut self, event: impl fmt::Display) -> io::Result<()> {
        let now = Local::now().format(TIMESTAMP_FORMAT);
        writeln!(self.sink, "[{now}] {event}")?;
        self.sink.flush()
    }
}

impl fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditLog").finish_non_exhaustive()
    }
}
