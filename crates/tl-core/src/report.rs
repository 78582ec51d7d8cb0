//! Range filtering and hour aggregation.
//!
//! # Algorithm
//!
//! 1. Keep records whose written date lies inside the range
//! 2. If the log's last record is an `i` and today is inside the range, close
//!    the trailing session at "now" (see [`reconstruct`])
//! 3. Pair by position, drop non-positive durations, sum hours
//! 4. Optionally group into [`Totals`]

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::entry::{EntryKind, ParsedLine, parse_line};
use crate::error::Result;
use crate::project::ProjectPath;
use crate::range::DateRange;
use crate::session::{Session, reconstruct};
use crate::store::TimeLog;

/// Hours grouped by project hierarchy.
///
/// `remainders` is keyed by sub-project name alone, so `acme:api:x` and
/// `beta:api:y` share the `api` bucket. Callers displaying it under a
/// project will show every project's remainders for that sub-project name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Totals {
    /// project -> hours
    pub projects: BTreeMap<String, f64>,
    /// project -> sub-project -> hours
    pub subprojects: BTreeMap<String, BTreeMap<String, f64>>,
    /// sub-project -> remainder path -> hours
    pub remainders: BTreeMap<String, BTreeMap<String, f64>>,
}

impl Totals {
    pub fn from_sessions(sessions: &[Session]) -> Self {
        let mut totals = Self::default();
        for session in sessions {
            let hours = session.hours();
            let path = ProjectPath::parse(&session.project);
            let project = path.project();

            *totals.projects.entry(project.to_string()).or_default() += hours;

            let Some(sub) = path.subproject() else {
                continue;
            };
            *totals
                .subprojects
                .entry(project.to_string())
                .or_default()
                .entry(sub.to_string())
                .or_default() += hours;

            if let Some(rest) = path.remainder() {
                *totals
                    .remainders
                    .entry(sub.to_string())
                    .or_default()
                    .entry(rest)
                    .or_default() += hours;
            }
        }
        totals
    }

    pub fn total(&self) -> f64 {
        self.projects.values().fold(0.0, |acc, h| acc + h)
    }
}

/// Hours worked over a date range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoursReport {
    pub range: DateRange,
    pub total_hours: f64,
    /// Sessions with a strictly positive duration, in pairing order.
    pub sessions: Vec<Session>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<Totals>,
}

/// Reads the log and reports hours for `range` as of `now`.
pub fn hours_for(
    log: &TimeLog,
    range: DateRange,
    group: bool,
    now: DateTime<Local>,
) -> Result<HoursReport> {
    let lines = log.read_lines()?;
    Ok(summarize(&lines, range, group, now))
}

/// Builds a report from already-read lines.
pub fn summarize(lines: &[String], range: DateRange, group: bool, now: DateTime<Local>) -> HoursReport {
    let mut in_range = Vec::new();
    let mut last_kind = None;

    for (idx, line) in lines.iter().enumerate() {
        let parsed = parse_line(line);
        if let Some(kind) = parsed.record_kind() {
            last_kind = Some(kind);
        }
        match parsed {
            ParsedLine::Entry(entry) if range.contains(entry.date) => in_range.push(entry),
            ParsedLine::InvalidTimestamp { timestamp, .. } => {
                tracing::trace!(line = idx + 1, %timestamp, "skipping record with invalid timestamp");
            }
            _ => {}
        }
    }

    let open_until =
        (last_kind == Some(EntryKind::In) && range.contains(now.date_naive())).then_some(now);

    let sessions: Vec<Session> = reconstruct(&in_range, open_until)
        .into_iter()
        .filter(|s| s.duration() > chrono::Duration::zero())
        .collect();
    // An empty f64 sum is -0.0; start the fold from +0.0.
    let total_hours = sessions.iter().map(Session::hours).fold(0.0, |acc, h| acc + h);
    let totals = group.then(|| Totals::from_sessions(&sessions));

    tracing::debug!(%range, sessions = sessions.len(), total_hours, "summarized range");

    HoursReport {
        range,
        total_hours,
        sessions,
        totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{NaiveDate, TimeZone};

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|l| (*l).to_string()).collect()
    }

    fn jan(day: u32) -> DateRange {
        DateRange::day(NaiveDate::from_ymd_opt(2024, 1, day).unwrap())
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn single_session_with_hierarchy() {
        let log = lines(&["i 2024-01-01 09:00:00 acme:backend", "o 2024-01-01 17:00:00"]);
        let now = Local.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();

        let report = summarize(&log, jan(1), true, now);
        assert!(approx(report.total_hours, 8.0));

        let totals = report.totals.unwrap();
        assert_eq!(totals.projects.len(), 1);
        assert!(approx(totals.projects["acme"], 8.0));
        assert!(approx(totals.subprojects["acme"]["backend"], 8.0));
        assert!(totals.remainders.is_empty());
    }

    #[test]
    fn ungrouped_report_has_no_totals() {
        let log = lines(&["i 2024-01-01 09:00:00 acme", "o 2024-01-01 10:00:00"]);
        let now = Local.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();

        let report = summarize(&log, jan(1), false, now);
        assert!(report.totals.is_none());
        assert_eq!(report.sessions.len(), 1);
    }

    #[test]
    fn open_trailing_session_counts_until_now() {
        let log = lines(&["i 2024-01-01 09:00:00 acme"]);
        let now = Local.with_ymd_and_hms(2024, 1, 1, 11, 30, 0).unwrap();

        let report = summarize(&log, jan(1), false, now);
        assert!(approx(report.total_hours, 2.5));
        assert!(report.sessions[0].open);
    }

    #[test]
    fn open_session_ignored_when_now_outside_range() {
        let log = lines(&["i 2024-01-01 09:00:00 acme"]);
        let now = Local.with_ymd_and_hms(2024, 1, 2, 11, 30, 0).unwrap();

        let report = summarize(&log, jan(1), false, now);
        assert!(report.sessions.is_empty());
        assert!(approx(report.total_hours, 0.0));
    }

    #[test]
    fn empty_range_totals_zero() {
        let log = lines(&["i 2024-01-01 09:00:00 acme", "o 2024-01-01 10:00:00"]);
        let now = Local.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();

        let report = summarize(&log, jan(3), true, now);
        assert!(report.total_hours.is_sign_positive());
        assert_eq!(format!("{:.2}", report.total_hours), "0.00");

        let totals = report.totals.unwrap();
        assert!(totals.total().is_sign_positive());
        assert_eq!(format!("{:.2}", totals.total()), "0.00");
    }

    #[test]
    fn open_session_requires_last_record_to_be_in() {
        // The trailing `i` on the 1st is followed by an `o` on the 2nd, so
        // nothing is open even though the 1st alone looks unbalanced.
        let log = lines(&["i 2024-01-01 22:00:00 acme", "o 2024-01-02 01:00:00"]);
        let now = Local.with_ymd_and_hms(2024, 1, 1, 23, 0, 0).unwrap();

        let report = summarize(&log, jan(1), false, now);
        assert!(report.sessions.is_empty());
    }

    #[test]
    fn sessions_crossing_midnight_are_dropped_from_both_days() {
        let log = lines(&["i 2024-01-01 22:00:00 acme", "o 2024-01-02 01:00:00"]);
        let now = Local.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();

        assert!(summarize(&log, jan(1), false, now).sessions.is_empty());
        assert!(summarize(&log, jan(2), false, now).sessions.is_empty());

        let both = DateRange::between(jan(1).start, jan(2).end).unwrap();
        assert!(approx(summarize(&log, both, false, now).total_hours, 3.0));
    }

    #[test]
    fn non_positive_sessions_are_discarded() {
        let log = lines(&[
            "i 2024-01-01 10:00:00 acme",
            "o 2024-01-01 09:00:00",
            "i 2024-01-01 11:00:00 beta",
            "o 2024-01-01 11:00:00",
            "i 2024-01-01 12:00:00 gamma",
            "o 2024-01-01 13:00:00",
        ]);
        let now = Local.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();

        let report = summarize(&log, jan(1), true, now);
        assert_eq!(report.sessions.len(), 1);
        assert_eq!(report.sessions[0].project, "gamma");
        assert!(approx(report.total_hours, 1.0));
        assert_eq!(report.totals.unwrap().projects.len(), 1);
    }

    #[test]
    fn noise_and_bad_timestamps_are_skipped() {
        let log = lines(&[
            "# monday",
            "i 2024-01-01 09:00:00 acme",
            "o 2024-01-01 25:00:00",
            "o 2024-01-01 10:00:00",
            "garbage",
        ]);
        let now = Local.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();

        let report = summarize(&log, jan(1), false, now);
        assert!(approx(report.total_hours, 1.0));
    }

    #[test]
    fn remainders_key_by_subproject_name_only() {
        let log = lines(&[
            "i 2024-01-01 09:00:00 acme:api:auth",
            "o 2024-01-01 10:00:00",
            "i 2024-01-01 10:00:00 beta:api:auth",
            "o 2024-01-01 12:00:00",
            "i 2024-01-01 12:00:00 beta:api:billing:v2",
            "o 2024-01-01 12:30:00",
        ]);
        let now = Local.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();

        let totals = summarize(&log, jan(1), true, now).totals.unwrap();
        assert!(approx(totals.projects["acme"], 1.0));
        assert!(approx(totals.projects["beta"], 2.5));
        assert!(approx(totals.subprojects["beta"]["api"], 2.5));
        assert!(approx(totals.remainders["api"]["auth"], 3.0));
        assert!(approx(totals.remainders["api"]["billing:v2"], 0.5));
        assert!(approx(totals.total(), 3.5));
    }

    #[test]
    fn week_range_collects_every_day() {
        let log = lines(&[
            "i 2024-01-01 09:00:00 acme",
            "o 2024-01-01 10:00:00",
            "i 2024-01-03 09:00:00 acme",
            "o 2024-01-03 11:00:00",
            "i 2024-01-08 09:00:00 acme",
            "o 2024-01-08 13:00:00",
        ]);
        let now = Local.with_ymd_and_hms(2024, 1, 9, 12, 0, 0).unwrap();
        let today = now.date_naive();

        let this_week = summarize(&log, DateRange::this_week(today), false, now);
        assert!(approx(this_week.total_hours, 4.0));

        let last_week = summarize(&log, DateRange::weeks_ago(today, 1), false, now);
        assert!(approx(last_week.total_hours, 3.0));
    }

    #[test]
    fn hours_for_reads_the_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("timelog.txt");
        std::fs::write(&path, "i 2024-01-01 09:00:00 acme\no 2024-01-01 17:00:00\n").unwrap();
        let log = TimeLog::new(&path);
        let now = Local.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();

        let first = hours_for(&log, jan(1), true, now).unwrap();
        let second = hours_for(&log, jan(1), true, now).unwrap();
        assert_eq!(first, second);
        assert!(approx(first.total_hours, 8.0));

        let missing = TimeLog::new(temp.path().join("missing.txt"));
        assert!(hours_for(&missing, jan(1), false, now).is_err());
    }

    #[test]
    fn report_serializes_to_json() {
        let log = lines(&["i 2024-01-01 09:00:00 acme:backend", "o 2024-01-01 17:00:00"]);
        let now = Local.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();

        let value = serde_json::to_value(summarize(&log, jan(1), true, now)).unwrap();
        assert_eq!(value["total_hours"], 8.0);
        assert_eq!(value["range"]["start"], "2024-01-01");
        assert_eq!(value["totals"]["subprojects"]["acme"]["backend"], 8.0);
        assert_eq!(value["sessions"][0]["project"], "acme:backend");
        assert_eq!(value["sessions"][0]["open"], false);
    }
}
