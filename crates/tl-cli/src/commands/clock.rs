//! Clock actions: `in`, `out` and `switch`, plus the project picker.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local};
use tl_core::{ClockState, StateError, TimeLog};

/// How many recent projects the picker offers.
pub const PICKER_LIMIT: usize = 10;

/// Clocks in to the project named by `words`, or one picked from history.
pub fn clock_in<R: BufRead, W: Write>(
    writer: &mut W,
    input: &mut R,
    log: &TimeLog,
    words: &[String],
    now: DateTime<Local>,
) -> Result<()> {
    if words.is_empty() && tl_core::clock_state(log)? == ClockState::In {
        let project = tl_core::current_project(log).unwrap_or_default();
        return Err(StateError::AlreadyClockedIn { project }.into());
    }
    let project = project_or_pick(writer, input, log, words)?;

    tl_core::clock_in(log, &project, now).context("cannot clock in")?;
    writeln!(writer, "Clocked in to {project}")?;
    Ok(())
}

/// Clocks out, storing `words` as the note.
pub fn clock_out<W: Write>(
    writer: &mut W,
    log: &TimeLog,
    words: &[String],
    now: DateTime<Local>,
) -> Result<()> {
    tl_core::clock_out(log, &words.join(" "), now).context("cannot clock out")?;
    match tl_core::current_project(log) {
        Ok(project) => writeln!(writer, "Clocked out of {project}")?,
        Err(_) => writeln!(writer, "Clocked out")?,
    }
    Ok(())
}

/// Switches to the project named by `words`, or one picked from history.
pub fn switch<R: BufRead, W: Write>(
    writer: &mut W,
    input: &mut R,
    log: &TimeLog,
    words: &[String],
    now: DateTime<Local>,
) -> Result<()> {
    if words.is_empty() && tl_core::clock_state(log)? == ClockState::Out {
        return Err(StateError::NotClockedIn.into());
    }
    let project = project_or_pick(writer, input, log, words)?;

    tl_core::switch_project(log, &project, now).context("cannot switch")?;
    writeln!(writer, "Switched to {project}")?;
    Ok(())
}

fn project_or_pick<R: BufRead, W: Write>(
    writer: &mut W,
    input: &mut R,
    log: &TimeLog,
    words: &[String],
) -> Result<String> {
    if words.is_empty() {
        pick_project(writer, input, log)
    } else {
        Ok(words.join(" "))
    }
}

/// Lists recent projects and reads a 1-based choice from `input`.
pub fn pick_project<R: BufRead, W: Write>(
    writer: &mut W,
    input: &mut R,
    log: &TimeLog,
) -> Result<String> {
    let projects = match tl_core::recent_projects(log, PICKER_LIMIT) {
        Err(err) if err.is_missing_file() => Vec::new(),
        other => other.context("failed to read project history")?,
    };
    if projects.is_empty() {
        bail!("no previous projects found");
    }

    writeln!(writer, "Select a project:")?;
    for (idx, project) in projects.iter().enumerate() {
        writeln!(writer, "{}: {project}", idx + 1)?;
    }
    write!(writer, "Enter number: ")?;
    writer.flush()?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("failed to read selection")?;
    let answer = answer.trim();
    let choice = answer
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=projects.len()).contains(n))
        .with_context(|| format!("invalid selection: {answer:?}"))?;

    Ok(projects[choice - 1].clone())
}
