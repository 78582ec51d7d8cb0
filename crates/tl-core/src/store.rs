//! Read and append access to the log file.
//!
//! The store does no interpretation. Each call opens the file, reads or
//! writes it fully, and closes it before returning.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Handle to a line-oriented, append-only clock log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLog {
    path: PathBuf,
}

impl TimeLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every line in file order.
    ///
    /// Invalid UTF-8 is replaced rather than rejected so a single corrupt
    /// byte cannot hide the rest of the log.
    pub fn read_lines(&self) -> Result<Vec<String>> {
        let bytes = fs::read(&self.path).map_err(|source| Error::Read {
            path: self.path.clone(),
            source,
        })?;
        let lines: Vec<String> = String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_string)
            .collect();
        tracing::debug!(path = %self.path.display(), lines = lines.len(), "read log");
        Ok(lines)
    }

    /// Like [`read_lines`](Self::read_lines), but a missing file reads as empty.
    pub fn read_lines_if_exists(&self) -> Result<Vec<String>> {
        match self.read_lines() {
            Err(err) if err.is_missing_file() => Ok(Vec::new()),
            other => other,
        }
    }

    /// Appends one line, creating the file if needed.
    pub fn append_line(&self, line: &str) -> Result<()> {
        self.append_lines(&[line])
    }

    /// Appends several lines with a single write.
    pub fn append_lines<S: AsRef<str>>(&self, lines: &[S]) -> Result<()> {
        let mut buf = String::new();
        for line in lines {
            buf.push_str(line.as_ref());
            buf.push('\n');
        }

        let write_err = |source: std::io::Error| Error::Write {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_err)?;
        file.write_all(buf.as_bytes()).map_err(write_err)?;

        tracing::debug!(path = %self.path.display(), lines = lines.len(), "appended to log");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_a_read_error() {
        let temp = tempfile::tempdir().unwrap();
        let log = TimeLog::new(temp.path().join("nope.txt"));

        let err = log.read_lines().unwrap_err();
        assert!(err.is_missing_file());
        assert!(err.to_string().contains("nope.txt"));
    }

    #[test]
    fn missing_file_reads_empty_when_allowed() {
        let temp = tempfile::tempdir().unwrap();
        let log = TimeLog::new(temp.path().join("nope.txt"));

        assert!(log.read_lines_if_exists().unwrap().is_empty());
    }

    #[test]
    fn append_creates_file_and_preserves_order() {
        let temp = tempfile::tempdir().unwrap();
        let log = TimeLog::new(temp.path().join("timelog.txt"));

        log.append_line("i 2024-01-01 09:00:00 acme").unwrap();
        log.append_lines(&["o 2024-01-01 10:00:00", "i 2024-01-01 10:00:00 beta"])
            .unwrap();

        assert_eq!(
            log.read_lines().unwrap(),
            vec![
                "i 2024-01-01 09:00:00 acme",
                "o 2024-01-01 10:00:00",
                "i 2024-01-01 10:00:00 beta",
            ]
        );
    }

    #[test]
    fn crlf_and_invalid_utf8_are_tolerated() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("timelog.txt");
        fs::write(&path, b"i 2024-01-01 09:00:00 caf\xff\r\no 2024-01-01 10:00:00\r\n").unwrap();

        let lines = TimeLog::new(&path).read_lines().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("i 2024-01-01 09:00:00 caf"));
        assert_eq!(lines[1], "o 2024-01-01 10:00:00");
    }

    #[test]
    fn unwritable_path_is_a_write_error() {
        let temp = tempfile::tempdir().unwrap();
        let log = TimeLog::new(temp.path().join("missing-dir").join("timelog.txt"));

        let err = log.append_line("i 2024-01-01 09:00:00 acme").unwrap_err();
        assert!(matches!(err, Error::Write { .. }));
    }
}
