//! Command-line argument definitions.

use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Clock-in/clock-out time tracker.
///
/// Appends `i`/`o` records to a plain-text log and reports hours worked per
/// day, per week, and per project.
#[derive(Debug, Parser)]
#[command(name = "tl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log file to use instead of $TIMELOG or the configured path.
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Break report totals down by project hierarchy.
    #[arg(short, long, global = true)]
    pub group: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Clock in to a project (only when clocked out).
    In {
        /// Project path, e.g. `acme:backend`. Prompts from history when omitted.
        project: Vec<String>,
    },

    /// Clock out (only when clocked in).
    Out {
        /// Optional note stored on the clock-out record.
        note: Vec<String>,
    },

    /// Clock out and straight back in to another project.
    #[command(visible_alias = "sw")]
    Switch {
        /// Project path. Prompts from history when omitted.
        project: Vec<String>,
    },

    /// Show the current project.
    #[command(visible_alias = "st")]
    Cur(FileArg),

    /// Show the N-th most recently closed project.
    Last(CountArgs),

    /// Hours worked today.
    #[command(visible_alias = "td")]
    Hours(FileReport),

    /// Hours worked N days ago (default: yesterday).
    Yd(CountReport),

    /// Hours worked N days ago (default: today).
    Hoursago(CountReport),

    /// Hours worked this week (Monday to Sunday).
    #[command(visible_alias = "thisweek")]
    Tw(FileReport),

    /// Hours worked N weeks ago (default: last week).
    Lw(CountReport),

    /// Hours worked between two dates, inclusive.
    Range(RangeReport),

    /// Print clock-in records from the last N days with entries.
    Ins(CountArgs),

    /// Print every log line from the last N days with entries.
    Cat(CountArgs),

    /// Check the log for malformed and out-of-order records.
    Validate(FileArg),

    /// Print the resolved log file path.
    #[command(visible_alias = "timelog")]
    Path,
}

/// An optional trailing log file.
#[derive(Debug, Args)]
pub struct FileArg {
    /// Log file (same as --file).
    #[arg(id = "log_file", value_name = "FILE")]
    pub file: Option<PathBuf>,
}

/// An optional count and/or trailing log file, in either order.
#[derive(Debug, Args)]
pub struct CountArgs {
    /// How far back to look, and/or the log file.
    #[arg(value_name = "N|FILE")]
    pub rest: Vec<String>,
}

impl CountArgs {
    /// Splits the positional arguments into a count (falling back to
    /// `default`) and an optional file.
    pub fn resolve(&self, default: u32) -> Result<(u32, Option<PathBuf>)> {
        let mut count = None;
        let mut file = None;
        for arg in &self.rest {
            match arg.parse::<u32>() {
                Ok(n) if count.is_none() => count = Some(n),
                Ok(_) => bail!("count given twice: {arg}"),
                Err(_) if file.is_none() => file = Some(PathBuf::from(arg)),
                Err(_) => bail!("unexpected argument: {arg}"),
            }
        }
        Ok((count.unwrap_or(default), file))
    }
}

/// Explicit date range.
#[derive(Debug, Args)]
pub struct RangeArgs {
    /// First day (YYYY-MM-DD).
    pub from: NaiveDate,
    /// Last day (YYYY-MM-DD), inclusive.
    pub to: NaiveDate,
    /// Log file (same as --file).
    #[arg(id = "log_file", value_name = "FILE")]
    pub file: Option<PathBuf>,
}

/// Report over today or this week.
#[derive(Debug, Args)]
pub struct FileReport {
    #[command(flatten)]
    pub target: FileArg,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Report over a day or week counted back from today.
#[derive(Debug, Args)]
pub struct CountReport {
    #[command(flatten)]
    pub target: CountArgs,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Report over explicit dates.
#[derive(Debug, Args)]
pub struct RangeReport {
    #[command(flatten)]
    pub target: RangeArgs,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}
