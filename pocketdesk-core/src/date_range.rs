//! Inclusive date-time ranges for querying events.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Error, Result};

/// Days on either side of today covered when a range bound is omitted.
pub const DEFAULT_RANGE_DAYS: i64 = 30;

/// Closed interval `[from, to]` over local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

impl DateRange {
    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> Self {
        DateRange { from, to }
    }

    /// Every instant of a single day.
    pub fn day(date: NaiveDate) -> Self {
        DateRange {
            from: start_of_day(date),
            to: end_of_day(date),
        }
    }

    /// Every instant from the first to the last day of `date`'s month.
    pub fn month(date: NaiveDate) -> Self {
        let first = crate::calendar::month::first_of_month(date);
        let last = crate::calendar::month::last_of_month(date);
        DateRange {
            from: start_of_day(first),
            to: end_of_day(last),
        }
    }

    /// Parse command-line bounds.
    /// - `from`: YYYY-MM-DD, defaults to DEFAULT_RANGE_DAYS before today
    /// - `to`: YYYY-MM-DD, defaults to DEFAULT_RANGE_DAYS after today
    pub fn from_args(from: Option<&str>, to: Option<&str>) -> Result<Self> {
        let today = Local::now().date_naive();

        let from = match from {
            Some(s) => parse_date(s)?,
            None => today - Duration::days(DEFAULT_RANGE_DAYS),
        };
        let to = match to {
            Some(s) => parse_date(s)?,
            None => today + Duration::days(DEFAULT_RANGE_DAYS),
        };

        Ok(DateRange {
            from: start_of_day(from),
            to: end_of_day(to),
        })
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.from && at <= self.to
    }
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last representable instant of `date`.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.succ_opt()
        .map(|next| start_of_day(next) - Duration::nanoseconds(1))
        .unwrap_or(NaiveDateTime::MAX)
}

/// Parse YYYY-MM-DD.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate(s.to_string(), "YYYY-MM-DD"))
}

/// Parse YYYY-MM into the first day of that month.
pub fn parse_month(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate(s.to_string(), "YYYY-MM"))
}
