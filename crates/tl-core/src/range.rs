//! Inclusive calendar-date ranges for report queries.

use std::fmt;

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::error::{Error, Result};

/// An inclusive `[start, end]` range of local calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// A single-day range.
    pub const fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// An explicit range. Fails if `start` is after `end`.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub const fn today(today: NaiveDate) -> Self {
        Self::day(today)
    }

    /// The day `n` days before `today` (`n = 0` is today).
    pub fn days_ago(today: NaiveDate, n: u32) -> Self {
        Self::day(shift_back(today, u64::from(n)))
    }

    /// Monday through Sunday of the week containing `today`.
    pub fn this_week(today: NaiveDate) -> Self {
        Self::weeks_ago(today, 0)
    }

    /// Monday through Sunday, `n` weeks before the week containing `today`.
    pub fn weeks_ago(today: NaiveDate, n: u32) -> Self {
        let since_monday = u64::from(today.weekday().num_days_from_monday());
        let monday = shift_back(today, since_monday + 7 * u64::from(n));
        let sunday = monday.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
        Self {
            start: monday,
            end: sunday,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_day() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{} to {}", self.start, self.end)
        }
    }
}

fn shift_back(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days))
        .unwrap_or(NaiveDate::MIN)
}
