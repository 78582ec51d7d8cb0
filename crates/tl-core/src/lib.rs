//! Core log interpretation engine for the timelog tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Log storage: reading and appending the line-oriented clock log
//! - Session reconstruction: pairing `i`/`o` records into work intervals
//! - Reporting: date-range filtering and hierarchical project totals
//! - Excerpts and validation over the raw log

pub mod clock;
pub mod entry;
mod error;
pub mod excerpt;
pub mod project;
pub mod range;
pub mod report;
pub mod session;
mod store;
pub mod validate;

pub use clock::{
    ClockState, clock_in, clock_out, clock_state, current_project, last_closed_project, last_kind,
    recent_projects, switch_project,
};
pub use entry::{Entry, EntryKind, ParsedLine, TIMESTAMP_FORMAT, parse_line};
pub use error::{Error, NotFoundError, Result, StateError};
pub use excerpt::{ExcerptFilter, cat_entries};
pub use project::ProjectPath;
pub use range::DateRange;
pub use report::{HoursReport, Totals, hours_for};
pub use session::Session;
pub use store::TimeLog;
pub use validate::{ValidationWarning, validate};
