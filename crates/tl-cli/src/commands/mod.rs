//! CLI subcommand implementations.

pub mod cat;
pub mod clock;
pub mod hours;
pub mod status;
pub mod validate;
