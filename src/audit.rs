// Append-only audit log file operations

use crate::task::TIMESTAMP_FORMAT;
use chrono::Local;
use eyre::{Context, Result};
use fs2::FileExt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes one `[YYYY-MM-DD HH:MM:SS] <action>` line per call.
///
/// Holds only the destination path: every append opens the file, takes an
/// exclusive lock, writes, flushes and drops the handle. No persistent
/// open handle across calls.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a single timestamped action line.
    pub fn append(&self, action: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .context("Failed to open audit log for appending")?;

        // Exclusive lock for the duration of the write; released on drop
        file.lock_exclusive().context("Failed to acquire audit log lock")?;

        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        writeln!(file, "[{}] {}", timestamp, action)?;
        file.flush()?;

        debug!(path = ?self.path, action, "Audit entry written");
        Ok(())
    }
}
