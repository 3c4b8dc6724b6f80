//! Size-rotated append-only file writer.
//!
//! When the file would grow past its size limit it is renamed to
//! `<file name>.<UTC timestamp>` and a fresh file is started. Only the newest backups
//! are kept.

use chrono::Utc;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Default size limit (5 MB).
pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Default number of rotated backups kept.
pub const DEFAULT_MAX_BACKUPS: usize = 3;

/// Timestamp format of backup suffixes; lexical order is chronological order.
const BACKUP_STAMP: &str = "%Y%m%dT%H%M%S%.6f";

/// Line writer shared by exporter threads.
pub struct RotatingWriter {
    path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    file: Mutex<Option<File>>,
}

impl RotatingWriter {
    /// Writer with the default limits. Nothing is opened until the first write.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self::with_limits(path, DEFAULT_MAX_BYTES, DEFAULT_MAX_BACKUPS)
    }

    #[must_use]
    pub fn with_limits(path: PathBuf, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            path,
            max_bytes,
            max_backups,
            file: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `line` and a newline, rotating first if the limit would be exceeded.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be rotated, opened, or written, or if a
    /// previous writer panicked while holding the lock.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|e| io::Error::other(format!("trace writer lock poisoned: {e}")))?;

        let incoming = line.len() as u64 + 1;
        let current = fs::metadata(&self.path).map_or(0, |m| m.len());
        if current > 0 && current + incoming > self.max_bytes {
            *file = None;
            self.rotate()?;
        }

        if file.is_none() {
            *file = Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)?,
            );
        }
        let Some(handle) = file.as_mut() else {
            return Err(io::Error::other("trace file unavailable"));
        };

        writeln!(handle, "{line}")?;
        handle.flush()
    }

    fn rotate(&self) -> io::Result<()> {
        let stamp = Utc::now().format(BACKUP_STAMP);
        let backup = PathBuf::from(format!("{}.{stamp}", self.path.display()));

        if self.path.exists() {
            fs::rename(&self.path, &backup)?;
        }
        self.prune_backups()
    }

    /// Backups of this file, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be listed.
    pub fn backups(&self) -> io::Result<Vec<PathBuf>> {
        let Some(name) = self.path.file_name().and_then(|n| n.to_str()) else {
            return Ok(Vec::new());
        };
        let prefix = format!("{name}.");
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut backups: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(&prefix))
            })
            .collect();

        backups.sort_unstable_by(|a, b| b.cmp(a));
        Ok(backups)
    }

    fn prune_backups(&self) -> io::Result<()> {
        for stale in self.backups()?.iter().skip(self.max_backups) {
            if let Err(e) = fs::remove_file(stale) {
                eprintln!("storefront: cannot remove old trace file {}: {e}", stale.display());
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for RotatingWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingWriter")
            .field("path", &self.path)
            .field("max_bytes", &self.max_bytes)
            .field("max_backups", &self.max_backups)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RotatingWriter::new(dir.path().join("trace.jsonl"));

        writer.write_line(r#"{"name":"a"}"#).unwrap();
        writer.write_line(r#"{"name":"b"}"#).unwrap();

        let content = fs::read_to_string(writer.path()).unwrap();
        assert_eq!(content, "{\"name\":\"a\"}\n{\"name\":\"b\"}\n");
        assert!(writer.backups().unwrap().is_empty());
    }

    #[test]
    fn rotates_when_limit_would_be_exceeded() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RotatingWriter::with_limits(dir.path().join("trace.jsonl"), 16, 3);

        writer.write_line("0123456789").unwrap();
        writer.write_line("abcdefghij").unwrap();

        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "abcdefghij\n");
        let backups = writer.backups().unwrap();
        assert_eq!(backups.len(), 1);
        assert_eq!(fs::read_to_string(&backups[0]).unwrap(), "0123456789\n");
    }

    #[test]
    fn keeps_at_most_max_backups() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RotatingWriter::with_limits(dir.path().join("trace.jsonl"), 8, 2);

        for i in 0..6 {
            writer.write_line(&format!("line-{i}")).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(2));
        }

        assert!(writer.backups().unwrap().len() <= 2);
        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "line-5\n");
    }

    #[test]
    fn oversized_first_line_is_still_written() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RotatingWriter::with_limits(dir.path().join("trace.jsonl"), 4, 1);

        writer.write_line("longer than the limit").unwrap();

        assert!(writer.backups().unwrap().is_empty());
        assert!(fs::read_to_string(writer.path()).unwrap().starts_with("longer"));
    }
}
