//! Log health checks.

use std::fmt;

use chrono::{DateTime, Local};

use crate::entry::{ParsedLine, TIMESTAMP_FORMAT, parse_line};
use crate::error::Result;
use crate::store::TimeLog;

/// A non-fatal problem found in the log. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// An `i`/`o` line with fewer than three fields.
    Malformed { line_number: usize, line: String },
    /// A record whose timestamp does not parse.
    InvalidTimestamp { line_number: usize, line: String },
    /// A record earlier than the record before it.
    OutOfOrder {
        line_number: usize,
        at: DateTime<Local>,
        previous: DateTime<Local>,
    },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { line_number, line } => {
                write!(f, "line {line_number} malformed: {line}")
            }
            Self::InvalidTimestamp { line_number, line } => {
                write!(f, "line {line_number} invalid time: {line}")
            }
            Self::OutOfOrder {
                line_number,
                at,
                previous,
            } => write!(
                f,
                "line {line_number} time {} before previous entry ({})",
                at.format(TIMESTAMP_FORMAT),
                previous.format(TIMESTAMP_FORMAT)
            ),
        }
    }
}

/// Scans the whole log and collects warnings. Only IO failures are errors.
pub fn validate(log: &TimeLog) -> Result<Vec<ValidationWarning>> {
    let lines = log.read_lines()?;
    Ok(check_lines(&lines))
}

/// Same as [`validate`] over already-read lines.
pub fn check_lines(lines: &[String]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut previous: Option<DateTime<Local>> = None;

    for (idx, line) in lines.iter().enumerate() {
        let line_number = idx + 1;
        let warning = match parse_line(line) {
            ParsedLine::Entry(entry) => {
                let out_of_order = previous
                    .filter(|prev| entry.timestamp < *prev)
                    .map(|prev| ValidationWarning::OutOfOrder {
                        line_number,
                        at: entry.timestamp,
                        previous: prev,
                    });
                previous = Some(entry.timestamp);
                out_of_order
            }
            ParsedLine::InvalidTimestamp { .. } => Some(ValidationWarning::InvalidTimestamp {
                line_number,
                line: line.clone(),
            }),
            ParsedLine::Truncated { .. } => Some(ValidationWarning::Malformed {
                line_number,
                line: line.clone(),
            }),
            ParsedLine::Unrecognized => None,
        };

        if let Some(warning) = warning {
            tracing::warn!(%warning, "log validation");
            warnings.push(warning);
        }
    }

    warnings
}
