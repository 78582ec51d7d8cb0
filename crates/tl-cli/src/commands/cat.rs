//! `cat` and `ins`: print raw log lines from the most recent days.

use std::io::Write;

use anyhow::{Context, Result};
use tl_core::{ExcerptFilter, TimeLog};

pub fn run<W: Write>(writer: &mut W, log: &TimeLog, filter: ExcerptFilter, days: u32) -> Result<()> {
    let days = usize::try_from(days)?;
    let lines = tl_core::cat_entries(log, filter, days)
        .with_context(|| format!("cannot list entries from {}", log.path().display()))?;
    for line in lines {
        writeln!(writer, "{line}")?;
    }
    Ok(())
}
