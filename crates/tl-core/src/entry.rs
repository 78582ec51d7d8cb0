//! Parsing of raw log lines into typed clock records.
//!
//! A record line looks like `i 2024-01-01 09:00:00 acme:backend` or
//! `o 2024-01-01 17:00:00`. Anything else is kept in the file but ignored by
//! every aggregation path.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone};

/// Timestamp layout shared by every record.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Whether a record opens or closes a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    In,
    Out,
}

impl EntryKind {
    /// The single-letter marker written at the start of the line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::In => "i",
            Self::Out => "o",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = UnknownEntryKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "i" => Ok(Self::In),
            "o" => Ok(Self::Out),
            _ => Err(UnknownEntryKind(s.to_string())),
        }
    }
}

/// Error type for unknown record markers.
#[derive(Debug, Clone)]
pub struct UnknownEntryKind(String);

impl fmt::Display for UnknownEntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown entry kind: {}", self.0)
    }
}

impl std::error::Error for UnknownEntryKind {}

/// A clock record with a valid timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub kind: EntryKind,
    /// Calendar date as written in the log.
    pub date: NaiveDate,
    /// The written timestamp interpreted in the local timezone.
    pub timestamp: DateTime<Local>,
    /// Project path for `i` records; free trailing text for `o` records.
    pub project: String,
}

/// Outcome of parsing one raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// A well-formed record.
    Entry(Entry),
    /// Shaped like a record, but the timestamp does not parse.
    InvalidTimestamp {
        kind: EntryKind,
        timestamp: String,
        project: String,
    },
    /// Starts with `i` or `o` but has fewer than three fields.
    Truncated { kind: EntryKind },
    /// Not a clock record at all.
    Unrecognized,
}

impl ParsedLine {
    /// Kind of a structurally valid record (three or more fields), whether or
    /// not its timestamp parses.
    pub const fn record_kind(&self) -> Option<EntryKind> {
        match self {
            Self::Entry(entry) => Some(entry.kind),
            Self::InvalidTimestamp { kind, .. } => Some(*kind),
            Self::Truncated { .. } | Self::Unrecognized => None,
        }
    }

    /// Project text of a structurally valid record.
    pub fn record_project(&self) -> Option<&str> {
        match self {
            Self::Entry(entry) => Some(&entry.project),
            Self::InvalidTimestamp { project, .. } => Some(project),
            Self::Truncated { .. } | Self::Unrecognized => None,
        }
    }
}

/// Parses a raw line.
pub fn parse_line(line: &str) -> ParsedLine {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let Some(kind) = fields.first().and_then(|f| f.parse::<EntryKind>().ok()) else {
        return ParsedLine::Unrecognized;
    };
    if fields.len() < 3 {
        return ParsedLine::Truncated { kind };
    }

    let text = format!("{} {}", fields[1], fields[2]);
    let project = fields[3..].join(" ");
    let Ok(naive) = NaiveDateTime::parse_from_str(&text, TIMESTAMP_FORMAT) else {
        return ParsedLine::InvalidTimestamp {
            kind,
            timestamp: text,
            project,
        };
    };

    ParsedLine::Entry(Entry {
        kind,
        date: naive.date(),
        timestamp: localize(naive),
        project,
    })
}

/// Interprets a naive timestamp in the local timezone.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times inside a
/// spring-forward gap move one hour ahead.
pub fn localize(naive: NaiveDateTime) -> DateTime<Local> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => {
            let shifted = naive + Duration::hours(1);
            Local
                .from_local_datetime(&shifted)
                .earliest()
                .unwrap_or_else(|| Local.from_utc_datetime(&naive))
        }
    }
}

/// Renders a record line (without the trailing newline).
pub fn format_record(kind: EntryKind, at: &DateTime<Local>, text: &str) -> String {
    let text = text.trim();
    let stamp = at.format(TIMESTAMP_FORMAT);
    if text.is_empty() {
        format!("{kind} {stamp}")
    } else {
        format!("{kind} {stamp} {text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(line: &str) -> Entry {
        match parse_line(line) {
            ParsedLine::Entry(entry) => entry,
            other => panic!("expected entry for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn parses_in_record_with_project() {
        let e = entry("i 2024-01-01 09:00:00 acme:backend");
        assert_eq!(e.kind, EntryKind::In);
        assert_eq!(e.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(e.project, "acme:backend");
        assert_eq!(
            e.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            "2024-01-01 09:00:00"
        );
    }

    #[test]
    fn project_fields_rejoin_with_single_spaces() {
        let e = entry("i 2024-01-01 09:00:00   big   client:ops  ");
        assert_eq!(e.project, "big client:ops");
    }

    #[test]
    fn out_record_without_trailing_text() {
        let e = entry("o 2024-01-01 17:00:00");
        assert_eq!(e.kind, EntryKind::Out);
        assert!(e.project.is_empty());
    }

    #[test]
    fn short_record_is_truncated() {
        assert_eq!(
            parse_line("i 2024-01-01"),
            ParsedLine::Truncated {
                kind: EntryKind::In
            }
        );
        assert_eq!(parse_line("o").record_kind(), None);
    }

    #[test]
    fn bad_timestamp_keeps_kind() {
        let parsed = parse_line("i 2024-13-01 17:00:00 acme");
        assert_eq!(parsed.record_kind(), Some(EntryKind::In));
        assert_eq!(parsed.record_project(), Some("acme"));
        assert!(matches!(parsed, ParsedLine::InvalidTimestamp { .. }));
    }

    #[test]
    fn other_lines_are_unrecognized() {
        assert_eq!(parse_line(""), ParsedLine::Unrecognized);
        assert_eq!(parse_line("# notes"), ParsedLine::Unrecognized);
        assert_eq!(
            parse_line("in 2024-01-01 09:00:00 acme"),
            ParsedLine::Unrecognized
        );
    }

    #[test]
    fn format_record_omits_empty_text() {
        let at = localize(
            NaiveDateTime::parse_from_str("2024-01-01 17:00:00", TIMESTAMP_FORMAT).unwrap(),
        );
        assert_eq!(
            format_record(EntryKind::Out, &at, ""),
            "o 2024-01-01 17:00:00"
        );
        assert_eq!(
            format_record(EntryKind::In, &at, " acme "),
            "i 2024-01-01 17:00:00 acme"
        );
    }

    #[test]
    fn kind_roundtrip() {
        for kind in [EntryKind::In, EntryKind::Out] {
            let parsed: EntryKind = kind.to_string().parse().expect("should parse");
            assert_eq!(parsed, kind);
        }
        let err = "x".parse::<EntryKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown entry kind: x");
    }
}
