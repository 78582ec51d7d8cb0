//! Timelog CLI library.
//!
//! This crate provides the command-line interface over `tl-core`.

mod cli;
pub mod commands;
mod config;
pub mod shorthand;

pub use cli::{
    Cli, Commands, CountArgs, CountReport, FileArg, FileReport, RangeArgs, RangeReport,
};
pub use config::{Config, DEFAULT_LOG_FILE};
