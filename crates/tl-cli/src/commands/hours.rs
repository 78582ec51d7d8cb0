//! Hour reports: `hours`, `yd`, `tw`, `lw` and `range`.
//!
//! Each report is one line (`Hours worked today: 8.00`), a hierarchical
//! breakdown with `--group`, or a JSON document with `--json`.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;
use tl_core::{DateRange, HoursReport, TIMESTAMP_FORMAT, TimeLog, Totals};

/// Which dates a report covers, relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Today,
    DaysAgo(u32),
    ThisWeek,
    WeeksAgo(u32),
    Between(NaiveDate, NaiveDate),
}

/// Period type for JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Day,
    Week,
    Range,
}

impl Period {
    pub fn range(self, today: NaiveDate) -> Result<DateRange> {
        let range = match self {
            Self::Today => DateRange::today(today),
            Self::DaysAgo(n) => DateRange::days_ago(today, n),
            Self::ThisWeek => DateRange::this_week(today),
            Self::WeeksAgo(n) => DateRange::weeks_ago(today, n),
            Self::Between(start, end) => DateRange::between(start, end)?,
        };
        Ok(range)
    }

    /// Phrase completing "Hours worked ...".
    pub fn label(self) -> String {
        match self {
            Self::Today | Self::DaysAgo(0) => "today".to_string(),
            Self::DaysAgo(1) => "yesterday".to_string(),
            Self::DaysAgo(n) => format!("{n} days ago"),
            Self::ThisWeek | Self::WeeksAgo(0) => "this week".to_string(),
            Self::WeeksAgo(1) => "last week".to_string(),
            Self::WeeksAgo(n) => format!("{n} weeks ago"),
            Self::Between(start, end) => format!("from {start} to {end}"),
        }
    }

    pub const fn period_type(self) -> PeriodType {
        match self {
            Self::Today | Self::DaysAgo(_) => PeriodType::Day,
            Self::ThisWeek | Self::WeeksAgo(_) => PeriodType::Week,
            Self::Between(..) => PeriodType::Range,
        }
    }
}

/// Computed report data.
#[derive(Debug)]
pub struct ReportData {
    pub generated_at: DateTime<Utc>,
    pub timezone: String,
    pub period: Period,
    pub report: HoursReport,
}

/// Reads the log and builds the report for `period` as of `now`.
pub fn generate_report_data(
    log: &TimeLog,
    period: Period,
    group: bool,
    now: DateTime<Local>,
) -> Result<ReportData> {
    let range = period.range(now.date_naive())?;
    let report = tl_core::hours_for(log, range, group, now)
        .with_context(|| format!("cannot report hours for {range}"))?;
    let timezone = iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string());

    Ok(ReportData {
        generated_at: now.with_timezone(&Utc),
        timezone,
        period,
        report,
    })
}

/// One-line total.
pub fn format_summary(data: &ReportData) -> String {
    format!(
        "Hours worked {}: {:.2}\n",
        data.period.label(),
        data.report.total_hours
    )
}

/// Hierarchical breakdown, sorted by name, followed by the grand total.
///
/// Remainder paths are looked up by sub-project name alone, so a
/// sub-project name shared by two projects lists both projects' paths.
pub fn format_grouped(totals: &Totals) -> String {
    let mut output = String::new();

    for (project, hours) in &totals.projects {
        writeln!(output, "{hours:>15.2}h  {project}").unwrap();
        let Some(subprojects) = totals.subprojects.get(project) else {
            continue;
        };
        for (sub, sub_hours) in subprojects {
            writeln!(output, "{sub_hours:>15.2}h    {sub}").unwrap();
            for (path, path_hours) in totals.remainders.get(sub).into_iter().flatten() {
                writeln!(output, "{path_hours:>15.2}h      {path}").unwrap();
            }
        }
    }

    writeln!(output, "--------------------").unwrap();
    writeln!(output, "{:>15.2}h", totals.total()).unwrap();
    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub generated_at: String,
    pub timezone: String,
    pub period: JsonPeriod,
    pub total_hours: f64,
    pub sessions: Vec<JsonSession>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<Totals>,
}

#[derive(Debug, Serialize)]
pub struct JsonPeriod {
    pub start: String,
    pub end: String,
    #[serde(rename = "type")]
    pub period_type: PeriodType,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct JsonSession {
    pub project: String,
    pub start: String,
    pub end: String,
    pub hours: f64,
    /// Still running; `end` is the report time.
    pub open: bool,
}

/// Formats report data as JSON.
pub fn format_report_json(data: &ReportData) -> Result<String> {
    let report = &data.report;
    let json = JsonReport {
        generated_at: data.generated_at.to_rfc3339(),
        timezone: data.timezone.clone(),
        period: JsonPeriod {
            start: report.range.start.to_string(),
            end: report.range.end.to_string(),
            period_type: data.period.period_type(),
            label: data.period.label(),
        },
        total_hours: report.total_hours,
        sessions: report
            .sessions
            .iter()
            .map(|session| JsonSession {
                project: session.project.clone(),
                start: session.start.format(TIMESTAMP_FORMAT).to_string(),
                end: session.end.format(TIMESTAMP_FORMAT).to_string(),
                hours: session.hours(),
                open: session.open,
            })
            .collect(),
        totals: report.totals.clone(),
    };

    Ok(serde_json::to_string_pretty(&json)?)
}

// ========== Public Interface ==========

/// Runs an hours report.
pub fn run<W: Write>(
    writer: &mut W,
    log: &TimeLog,
    period: Period,
    group: bool,
    json: bool,
    now: DateTime<Local>,
) -> Result<()> {
    let data = generate_report_data(log, period, group, now)?;

    if json {
        writeln!(writer, "{}", format_report_json(&data)?)?;
    } else if let Some(totals) = &data.report.totals {
        write!(writer, "{}", format_grouped(totals))?;
    } else {
        write!(writer, "{}", format_summary(&data))?;
    }

    Ok(())
}
