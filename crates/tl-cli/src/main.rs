use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tl_cli::commands::hours::Period;
use tl_cli::commands::{cat, clock, hours, status, validate};
use tl_cli::{Cli, Commands, Config, shorthand};
use tl_core::{ExcerptFilter, TimeLog};

/// Default count for `last`, `yd`, `lw`, `ins` and `cat`.
const DEFAULT_COUNT: u32 = 1;

/// `hoursago` without a count means today.
const HOURSAGO_DEFAULT: u32 = 0;

/// Resolves the log once: a file named on the command line wins, then
/// whatever the configuration layers produced.
fn open_log(cli: &Cli, trailing: Option<&Path>) -> Result<TimeLog> {
    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let log = config.time_log(trailing.or(cli.file.as_deref()));
    tracing::debug!(path = %log.path().display(), "using time log");
    Ok(log)
}

fn main() -> Result<()> {
    let cli = Cli::parse_from(shorthand::expand(std::env::args_os()));

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let now = Local::now();

    match &cli.command {
        Some(Commands::In { project }) => {
            let log = open_log(&cli, None)?;
            clock::clock_in(&mut out, &mut io::stdin().lock(), &log, project, now)?;
        }
        Some(Commands::Out { note }) => {
            let log = open_log(&cli, None)?;
            clock::clock_out(&mut out, &log, note, now)?;
        }
        Some(Commands::Switch { project }) => {
            let log = open_log(&cli, None)?;
            clock::switch(&mut out, &mut io::stdin().lock(), &log, project, now)?;
        }
        Some(Commands::Cur(args)) => {
            let log = open_log(&cli, args.file.as_deref())?;
            status::current(&mut out, &log)?;
        }
        Some(Commands::Last(args)) => {
            let (n, file) = args.resolve(DEFAULT_COUNT)?;
            let log = open_log(&cli, file.as_deref())?;
            status::last(&mut out, &log, n)?;
        }
        Some(Commands::Hours(args)) => {
            let log = open_log(&cli, args.target.file.as_deref())?;
            hours::run(&mut out, &log, Period::Today, cli.group, args.json, now)?;
        }
        Some(Commands::Yd(args)) => {
            let (n, file) = args.target.resolve(DEFAULT_COUNT)?;
            let log = open_log(&cli, file.as_deref())?;
            hours::run(&mut out, &log, Period::DaysAgo(n), cli.group, args.json, now)?;
        }
        Some(Commands::Hoursago(args)) => {
            let (n, file) = args.target.resolve(HOURSAGO_DEFAULT)?;
            let log = open_log(&cli, file.as_deref())?;
            hours::run(&mut out, &log, Period::DaysAgo(n), cli.group, args.json, now)?;
        }
        Some(Commands::Tw(args)) => {
            let log = open_log(&cli, args.target.file.as_deref())?;
            hours::run(&mut out, &log, Period::ThisWeek, cli.group, args.json, now)?;
        }
        Some(Commands::Lw(args)) => {
            let (n, file) = args.target.resolve(DEFAULT_COUNT)?;
            let log = open_log(&cli, file.as_deref())?;
            hours::run(&mut out, &log, Period::WeeksAgo(n), cli.group, args.json, now)?;
        }
        Some(Commands::Range(args)) => {
            let log = open_log(&cli, args.target.file.as_deref())?;
            let period = Period::Between(args.target.from, args.target.to);
            hours::run(&mut out, &log, period, cli.group, args.json, now)?;
        }
        Some(Commands::Ins(args)) => {
            let (n, file) = args.resolve(DEFAULT_COUNT)?;
            let log = open_log(&cli, file.as_deref())?;
            cat::run(&mut out, &log, ExcerptFilter::ClockIns, n)?;
        }
        Some(Commands::Cat(args)) => {
            let (n, file) = args.resolve(DEFAULT_COUNT)?;
            let log = open_log(&cli, file.as_deref())?;
            cat::run(&mut out, &log, ExcerptFilter::All, n)?;
        }
        Some(Commands::Validate(args)) => {
            let log = open_log(&cli, args.file.as_deref())?;
            validate::run(&mut out, &log)?;
        }
        Some(Commands::Path) => {
            let log = open_log(&cli, None)?;
            writeln!(out, "{}", log.path().display())?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
