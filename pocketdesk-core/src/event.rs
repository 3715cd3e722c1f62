//! Calendar event record.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single entry in the personal calendar.
///
/// `date` is local wall-clock time; day boundaries are computed on it
/// directly without any timezone conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDateTime,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub is_completed: bool,
}

impl CalendarEvent {
    /// New incomplete event with a fresh id and no notes.
    pub fn new(title: impl Into<String>, date: NaiveDateTime) -> Self {
        CalendarEvent {
            id: Uuid::new_v4(),
            title: title.into(),
            date,
            notes: String::new(),
            is_completed: false,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn completed(mut self, is_completed: bool) -> Self {
        self.is_completed = is_completed;
        self
    }

    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }
}

impl fmt::Display for CalendarEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Sort events in place by `date`, earliest first.
pub fn sort_by_date(events: &mut [CalendarEvent]) {
    events.sort_by(|a, b| a.date.cmp(&b.date));
}
