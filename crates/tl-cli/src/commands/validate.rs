//! `validate`: report malformed and out-of-order records.

use std::io::Write;

use anyhow::{Context, Result};
use tl_core::TimeLog;

/// Prints one `Warning:` line per finding. Findings do not fail the command.
pub fn run<W: Write>(writer: &mut W, log: &TimeLog) -> Result<()> {
    let warnings = tl_core::validate(log)
        .with_context(|| format!("cannot validate {}", log.path().display()))?;
    for warning in &warnings {
        writeln!(writer, "Warning: {warning}")?;
    }
    tracing::debug!(warnings = warnings.len(), "validation finished");
    Ok(())
}
