//! Clock state, state queries, and the interactive clock actions.
//!
//! The state is whatever the last structurally valid record implies: a
//! trailing `i` means clocked in, a trailing `o` (or an empty log) means
//! clocked out. Actions check the state before writing anything.

use std::collections::HashSet;

use chrono::{DateTime, Local};

use crate::entry::{EntryKind, ParsedLine, format_record, parse_line};
use crate::error::{Error, NotFoundError, Result, StateError};
use crate::store::TimeLog;

/// Whether the log is currently inside a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockState {
    #[default]
    Out,
    In,
}

impl ClockState {
    pub const fn from_last_kind(kind: Option<EntryKind>) -> Self {
        match kind {
            Some(EntryKind::In) => Self::In,
            Some(EntryKind::Out) | None => Self::Out,
        }
    }
}

fn parse_all(lines: &[String]) -> Vec<ParsedLine> {
    lines.iter().map(|line| parse_line(line)).collect()
}

fn last_record_kind(parsed: &[ParsedLine]) -> Option<EntryKind> {
    parsed.iter().rev().find_map(ParsedLine::record_kind)
}

/// Project of the most recent `i` record, if it named one.
fn latest_in_project(parsed: &[ParsedLine]) -> Option<&str> {
    parsed
        .iter()
        .rev()
        .find(|p| p.record_kind() == Some(EntryKind::In))
        .and_then(ParsedLine::record_project)
        .filter(|project| !project.is_empty())
}

/// Kind of the last record in the log, or `None` for a log without records.
pub fn last_kind(log: &TimeLog) -> Result<Option<EntryKind>> {
    Ok(last_record_kind(&parse_all(&log.read_lines()?)))
}

/// Current clock state. A missing log counts as clocked out.
pub fn clock_state(log: &TimeLog) -> Result<ClockState> {
    let parsed = parse_all(&log.read_lines_if_exists()?);
    Ok(ClockState::from_last_kind(last_record_kind(&parsed)))
}

/// Project of the most recent `i` record, whether or not it has been closed.
pub fn current_project(log: &TimeLog) -> Result<String> {
    let parsed = parse_all(&log.read_lines()?);
    latest_in_project(&parsed)
        .map(str::to_string)
        .ok_or_else(|| NotFoundError::NoCurrentProject.into())
}

/// Project of the `n`-th most recently closed session (1 = last).
///
/// Finds the `n`-th `o` record from the end, then walks backward to the
/// nearest `i` record before it.
pub fn last_closed_project(log: &TimeLog, n: usize) -> Result<String> {
    let parsed = parse_all(&log.read_lines()?);
    let outs: Vec<usize> = parsed
        .iter()
        .enumerate()
        .filter(|(_, p)| p.record_kind() == Some(EntryKind::Out))
        .map(|(idx, _)| idx)
        .collect();

    if n < 1 || outs.len() < n {
        return Err(NotFoundError::NotEnoughClosed {
            requested: n,
            available: outs.len(),
        }
        .into());
    }

    let out_idx = outs[outs.len() - n];
    parsed[..out_idx]
        .iter()
        .rev()
        .find(|p| p.record_kind() == Some(EntryKind::In))
        .and_then(ParsedLine::record_project)
        .filter(|project| !project.is_empty())
        .map(str::to_string)
        .ok_or_else(|| NotFoundError::NoOpeningRecord { requested: n }.into())
}

/// Distinct projects from `i` records, most recent first, at most `limit`.
pub fn recent_projects(log: &TimeLog, limit: usize) -> Result<Vec<String>> {
    let parsed = parse_all(&log.read_lines()?);
    let mut seen = HashSet::new();
    let projects = parsed
        .iter()
        .rev()
        .filter(|p| p.record_kind() == Some(EntryKind::In))
        .filter_map(ParsedLine::record_project)
        .filter(|project| !project.is_empty())
        .filter(|project| seen.insert(*project))
        .take(limit)
        .map(str::to_string)
        .collect();
    Ok(projects)
}

fn checked_project(project: &str) -> Result<&str> {
    let project = single_line(project.trim())?;
    if project.is_empty() {
        return Err(Error::EmptyProject);
    }
    Ok(project)
}

fn single_line(text: &str) -> Result<&str> {
    if text.contains(['\n', '\r']) {
        return Err(Error::MultilineText {
            text: text.to_string(),
        });
    }
    Ok(text)
}

/// Clocks in to `project` at `now`. Fails if already clocked in.
///
/// Returns the line that was written.
pub fn clock_in(log: &TimeLog, project: &str, now: DateTime<Local>) -> Result<String> {
    let project = checked_project(project)?;
    let parsed = parse_all(&log.read_lines_if_exists()?);
    if ClockState::from_last_kind(last_record_kind(&parsed)) == ClockState::In {
        let current = latest_in_project(&parsed).unwrap_or_default().to_string();
        return Err(StateError::AlreadyClockedIn { project: current }.into());
    }

    let line = format_record(EntryKind::In, &now, project);
    log.append_line(&line)?;
    tracing::info!(project, "clocked in");
    Ok(line)
}

/// Clocks out at `now`, with an optional free-text note. Fails if already out.
pub fn clock_out(log: &TimeLog, note: &str, now: DateTime<Local>) -> Result<String> {
    let note = single_line(note.trim())?;
    let parsed = parse_all(&log.read_lines_if_exists()?);
    if ClockState::from_last_kind(last_record_kind(&parsed)) == ClockState::Out {
        return Err(StateError::AlreadyClockedOut.into());
    }

    let line = format_record(EntryKind::Out, &now, note);
    log.append_line(&line)?;
    tracing::info!(project = latest_in_project(&parsed), "clocked out");
    Ok(line)
}

/// Closes the current session and opens one on `project`, both at `now`.
///
/// The two records go out in a single append.
pub fn switch_project(log: &TimeLog, project: &str, now: DateTime<Local>) -> Result<Vec<String>> {
    let project = checked_project(project)?;
    let parsed = parse_all(&log.read_lines_if_exists()?);
    if ClockState::from_last_kind(last_record_kind(&parsed)) == ClockState::Out {
        return Err(StateError::NotClockedIn.into());
    }
    let previous = latest_in_project(&parsed);
    if previous == Some(project) {
        return Err(StateError::SameProject {
            project: project.to_string(),
        }
        .into());
    }

    let lines = vec![
        format_record(EntryKind::Out, &now, ""),
        format_record(EntryKind::In, &now, project),
    ];
    log.append_lines(&lines)?;
    tracing::info!(from = previous, to = project, "switched project");
    Ok(lines)
}
