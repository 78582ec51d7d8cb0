//! Error types for the log engine.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by log operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The log file could not be opened or read.
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The log file could not be created or appended to.
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A clock action was attempted from the wrong state.
    #[error(transparent)]
    State(#[from] StateError),

    /// A requested record does not exist in the log.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// A line lacks the date field needed to bucket it by day.
    #[error("line {line_number} has no date field: {line:?}")]
    MissingDate { line_number: usize, line: String },

    /// A project name was blank.
    #[error("project name cannot be empty")]
    EmptyProject,

    /// Record text would spill onto a second log line.
    #[error("line breaks are not allowed in record text: {text:?}")]
    MultilineText { text: String },

    /// A date range ends before it starts.
    #[error("invalid date range: {start} is after {end}")]
    InvalidRange { start: String, end: String },
}

/// Clock actions attempted from the wrong state. Nothing is written.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("already checked in to {project}")]
    AlreadyClockedIn { project: String },

    #[error("already checked out")]
    AlreadyClockedOut,

    #[error("not checked in")]
    NotClockedIn,

    #[error("already checked in to this project: {project}")]
    SameProject { project: String },
}

/// Lookups that found nothing to return.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotFoundError {
    #[error("no current project")]
    NoCurrentProject,

    #[error("not enough closed projects: asked for #{requested}, log has {available}")]
    NotEnoughClosed { requested: usize, available: usize },

    #[error("no clock-in precedes closed project #{requested}")]
    NoOpeningRecord { requested: usize },
}

impl Error {
    /// Returns `true` if the underlying IO error is "file not found".
    pub fn is_missing_file(&self) -> bool {
        matches!(self, Self::Read { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Result alias for log operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
