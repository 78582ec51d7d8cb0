//! `cur` and `last`: where the clock stands.

use std::io::Write;

use anyhow::{Context, Result};
use tl_core::{EntryKind, TimeLog};

/// Prints the project of the latest clock-in, flagging it when already closed.
pub fn current<W: Write>(writer: &mut W, log: &TimeLog) -> Result<()> {
    let project = tl_core::current_project(log)
        .with_context(|| format!("cannot show current project of {}", log.path().display()))?;
    if tl_core::last_kind(log)? == Some(EntryKind::Out) {
        writeln!(writer, "Current project: {project} (clocked out)")?;
    } else {
        writeln!(writer, "Current project: {project}")?;
    }
    Ok(())
}

/// Prints the `n`-th most recently closed project.
pub fn last<W: Write>(writer: &mut W, log: &TimeLog, n: u32) -> Result<()> {
    let n = usize::try_from(n)?;
    let project = tl_core::last_closed_project(log, n)
        .with_context(|| format!("cannot find closed project #{n}"))?;
    writeln!(writer, "Last closed project: {project}")?;
    Ok(())
}
