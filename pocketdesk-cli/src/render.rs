//! Terminal rendering for pocketdesk types.
//!
//! Extension traits that add colored output to pocketdesk-core types using
//! owo_colors.

use chrono::{NaiveDate, NaiveDateTime};
use owo_colors::OwoColorize;
use pocketdesk_core::CalendarEvent;
use pocketdesk_core::calculator::CalculatorViewState;
use pocketdesk_core::calendar::{CalendarSnapshot, DayCell, WeekStart};

/// Extension trait for terminal rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for CalculatorViewState {
    fn render(&self) -> String {
        let mut lines = Vec::new();
        if !self.expression_text().is_empty() {
            lines.push(format!("{:>24}", self.expression_text()).dimmed().to_string());
        }
        lines.push(format!("{:>24}", self.display_text()).bold().to_string());
        lines.join("\n")
    }
}

impl Render for CalendarEvent {
    fn render(&self) -> String {
        let time = format_time(&self.date);
        let (mark, title) = if self.is_completed {
            ("✓".green().to_string(), self.title.strikethrough().dimmed().to_string())
        } else {
            ("○".dimmed().to_string(), self.title.clone())
        };

        if self.notes.is_empty() {
            format!("{} {} {}", time, mark, title)
        } else {
            format!("{} {} {}  {}", time, mark, title, self.notes.dimmed())
        }
    }
}

/// Width of one day column in the month grid
const CELL_WIDTH: usize = 4;

/// Render a single grid cell, padded before coloring so columns stay aligned
fn render_cell(cell: &DayCell, today: NaiveDate, selected: Option<NaiveDate>) -> String {
    let Some(date) = cell.date else {
        return " ".repeat(CELL_WIDTH);
    };

    let marker = if cell.has_events() { "•" } else { " " };
    let day = format!("{:>3}", date.format("%-d"));

    let day = if Some(date) == selected {
        day.reversed().to_string()
    } else if cell.is_today(today) {
        day.cyan().bold().to_string()
    } else {
        day
    };

    format!("{}{}", day, marker.yellow())
}

/// Render the month title, weekday header and the grid rows
pub fn render_month(snapshot: &CalendarSnapshot, week_start: WeekStart, today: NaiveDate) -> String {
    let mut lines = Vec::new();

    let title = snapshot.current_month.format("%B %Y").to_string();
    lines.push(format!("{:^width$}", title, width = CELL_WIDTH * 7).bold().to_string());

    let header: String = week_start
        .columns()
        .iter()
        .map(|weekday| format!("{:>3} ", &weekday.to_string()[..2]))
        .collect();
    lines.push(header.dimmed().to_string());

    for week in snapshot.days_in_month.chunks(7) {
        let row: String = week
            .iter()
            .map(|cell| render_cell(cell, today, snapshot.selected_date))
            .collect();
        lines.push(row);
    }

    lines.join("\n")
}

/// Render the event list of the selected day
pub fn render_selected_day(snapshot: &CalendarSnapshot, today: NaiveDate) -> String {
    let Some(date) = snapshot.selected_date else {
        return "No day selected".dimmed().to_string();
    };

    let mut lines = Vec::new();
    let mut heading = format_date_label(date, today).bold().to_string();
    if snapshot.shows_only_incomplete {
        heading.push_str(&format!(" {}", "(incomplete only)".dimmed()));
    }
    lines.push(heading);

    if snapshot.events_for_selected_date.is_empty() {
        lines.push(format!("  {}", "No events".dimmed()));
    }
    for event in &snapshot.events_for_selected_date {
        lines.push(format!("  {}", event.render()));
    }

    lines.join("\n")
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25")
pub fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

/// Format the time portion of an event (e.g. "  15:00")
pub fn format_time(at: &NaiveDateTime) -> String {
    format!("{:>7}", at.format("%H:%M"))
}
