//! Raw log excerpts covering the most recent days.

use std::collections::HashSet;

use crate::entry::{EntryKind, parse_line};
use crate::error::{Error, Result};
use crate::store::TimeLog;

/// Which lines an excerpt considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExcerptFilter {
    /// Only `i` records.
    ClockIns,
    /// Every non-blank line.
    All,
}

/// Lines dated within the last `days` distinct dates of the log, in file order.
///
/// Dates are the first ten characters of each line's second field and are
/// ordered by first appearance, not by value.
pub fn cat_entries(log: &TimeLog, filter: ExcerptFilter, days: usize) -> Result<Vec<String>> {
    let lines = log.read_lines()?;
    excerpt(&lines, filter, days)
}

/// Same as [`cat_entries`] over already-read lines.
pub fn excerpt(lines: &[String], filter: ExcerptFilter, days: usize) -> Result<Vec<String>> {
    let mut considered: Vec<(&str, &str)> = Vec::new();
    let mut dates: Vec<&str> = Vec::new();
    let mut seen = HashSet::new();

    for (idx, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if filter == ExcerptFilter::ClockIns
            && !matches!(parse_line(line).record_kind(), Some(EntryKind::In))
        {
            continue;
        }

        let date = line
            .split_whitespace()
            .nth(1)
            .and_then(|field| field.get(..10))
            .ok_or_else(|| Error::MissingDate {
                line_number: idx + 1,
                line: line.clone(),
            })?;
        if seen.insert(date) {
            dates.push(date);
        }
        considered.push((date, line.as_str()));
    }

    let keep: HashSet<&str> = dates[dates.len().saturating_sub(days)..]
        .iter()
        .copied()
        .collect();
    Ok(considered
        .into_iter()
        .filter(|(date, _)| keep.contains(date))
        .map(|(_, line)| line.to_string())
        .collect())
}
