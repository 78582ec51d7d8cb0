//! Reconstruction of work sessions from clock records.
//!
//! Sessions are formed by **position**, not by matching: the n-th `i` record
//! pairs with the n-th `o` record in encounter order. A log that is out of
//! order or missing records therefore pairs silently rather than failing, and
//! may attribute time to the wrong project. Excess records on either side are
//! dropped.

use chrono::{DateTime, Duration, Local};
use serde::Serialize;

use crate::entry::{Entry, EntryKind};

/// A reconstructed work interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    pub project: String,
    /// The end was synthesized from the current time for an unterminated session.
    pub open: bool,
}

impl Session {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn hours(&self) -> f64 {
        self.duration().num_milliseconds() as f64 / 3_600_000.0
    }
}

/// Pairs `i` and `o` entries by index.
///
/// When `open_until` is given and there is exactly one more `i` than `o`, the
/// trailing `i` is closed at that instant and the session is marked open.
/// Sessions are returned in pairing order regardless of their duration.
pub fn reconstruct<'a, I>(entries: I, open_until: Option<DateTime<Local>>) -> Vec<Session>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut ins: Vec<&Entry> = Vec::new();
    let mut outs: Vec<(DateTime<Local>, bool)> = Vec::new();
    for entry in entries {
        match entry.kind {
            EntryKind::In => ins.push(entry),
            EntryKind::Out => outs.push((entry.timestamp, false)),
        }
    }

    if let Some(now) = open_until.filter(|_| ins.len() == outs.len() + 1) {
        outs.push((now, true));
    }

    if ins.len() != outs.len() {
        tracing::trace!(
            ins = ins.len(),
            outs = outs.len(),
            "unbalanced records, excess dropped"
        );
    }

    ins.into_iter()
        .zip(outs)
        .map(|(start, (end, open))| Session {
            start: start.timestamp,
            end,
            project: start.project.clone(),
            open,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{ParsedLine, parse_line};
    use chrono::TimeZone;

    fn entries(lines: &[&str]) -> Vec<Entry> {
        lines
            .iter()
            .filter_map(|l| match parse_line(l) {
                ParsedLine::Entry(e) => Some(e),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn alternating_log_pairs_every_record() {
        let log = entries(&[
            "i 2024-01-01 09:00:00 acme",
            "o 2024-01-01 12:00:00",
            "i 2024-01-01 13:00:00 beta",
            "o 2024-01-01 14:30:00",
        ]);
        let sessions = reconstruct(&log, None);

        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].project, "acme");
        assert!((sessions[0].hours() - 3.0).abs() < 1e-9);
        assert_eq!(sessions[1].project, "beta");
        assert!((sessions[1].hours() - 1.5).abs() < 1e-9);
        assert!(sessions.iter().all(|s| !s.open));
    }

    #[test]
    fn pairs_by_position_not_by_matching() {
        // Two ins in a row: the second `o` closes the second `i`, the first
        // `o` closes the first, even though that is probably not what happened.
        let log = entries(&[
            "i 2024-01-01 09:00:00 acme",
            "i 2024-01-01 10:00:00 beta",
            "o 2024-01-01 11:00:00",
            "o 2024-01-01 12:00:00",
        ]);
        let sessions = reconstruct(&log, None);

        assert_eq!(sessions.len(), 2);
        assert!((sessions[0].hours() - 2.0).abs() < 1e-9);
        assert!((sessions[1].hours() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn excess_records_are_dropped() {
        let log = entries(&[
            "o 2024-01-01 08:00:00",
            "i 2024-01-01 09:00:00 acme",
            "o 2024-01-01 10:00:00",
        ]);
        let sessions = reconstruct(&log, None);

        assert_eq!(sessions.len(), 1);
        // Positional pairing: the stray `o` closes the `i` with a negative span.
        assert!(sessions[0].hours() < 0.0);
    }

    #[test]
    fn open_session_closes_at_now() {
        let log = entries(&["i 2024-01-01 09:00:00 acme"]);
        let now = Local.with_ymd_and_hms(2024, 1, 1, 11, 30, 0).unwrap();
        let sessions = reconstruct(&log, Some(now));

        assert_eq!(sessions.len(), 1);
        assert!(sessions[0].open);
        assert_eq!(sessions[0].end, now);
        assert!((sessions[0].hours() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn open_until_ignored_when_balanced() {
        let log = entries(&["i 2024-01-01 09:00:00 acme", "o 2024-01-01 10:00:00"]);
        let now = Local.with_ymd_and_hms(2024, 1, 1, 11, 30, 0).unwrap();
        let sessions = reconstruct(&log, Some(now));

        assert_eq!(sessions.len(), 1);
        assert!(!sessions[0].open);
    }

    #[test]
    fn open_until_ignored_when_two_ins_unmatched() {
        let log = entries(&["i 2024-01-01 09:00:00 acme", "i 2024-01-01 10:00:00 beta"]);
        let now = Local.with_ymd_and_hms(2024, 1, 1, 11, 30, 0).unwrap();

        assert!(reconstruct(&log, Some(now)).is_empty());
    }
}
