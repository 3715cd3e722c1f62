//! Cells of the month grid.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::calendar::month::{WeekStart, days_in_month, first_of_month, leading_blanks};
use crate::event::CalendarEvent;

/// One slot in the month grid. `date` is `None` for the blank fillers
/// before the 1st.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: Option<NaiveDate>,
    pub events: Vec<CalendarEvent>,
}

impl DayCell {
    pub fn blank() -> Self {
        DayCell {
            date: None,
            events: Vec::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.date.is_none()
    }

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn is_today(&self, today: NaiveDate) -> bool {
        self.date == Some(today)
    }
}

/// Lay out the month containing `month`: leading blanks, then one cell per
/// day filled by `events_for_day`.
pub fn build_month_grid<F>(month: NaiveDate, week_start: WeekStart, events_for_day: F) -> Vec<DayCell>
where
    F: Fn(NaiveDate) -> Vec<CalendarEvent>,
{
    let first = first_of_month(month);
    let blanks = leading_blanks(first, week_start) as usize;
    let days = days_in_month(first) as usize;

    let mut cells = Vec::with_capacity(blanks + days);
    cells.extend(std::iter::repeat_with(DayCell::blank).take(blanks));
    cells.extend((0..days).map(|offset| {
        let date = first + Duration::days(offset as i64);
        DayCell {
            date: Some(date),
            events: events_for_day(date),
        }
    }));
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_grid_shape() {
        let grid = build_month_grid(date(2025, 3, 18), WeekStart::Sunday, |_| Vec::new());
        assert_eq!(grid.len(), 6 + 31);
        assert!(grid[..6].iter().all(DayCell::is_blank));
        assert_eq!(grid[6].date, Some(date(2025, 3, 1)));
        assert_eq!(grid.last().unwrap().date, Some(date(2025, 3, 31)));
    }

    #[test]
    fn test_grid_places_events_on_their_day() {
        let target = date(2025, 2, 14);
        let event = CalendarEvent::new("Dinner", target.and_hms_opt(19, 0, 0).unwrap());
        let grid = build_month_grid(target, WeekStart::Monday, |d| {
            if d == target {
                vec![event.clone()]
            } else {
                Vec::new()
            }
        });

        let with_events: Vec<_> = grid.iter().filter(|c| c.has_events()).collect();
        assert_eq!(with_events.len(), 1);
        assert_eq!(with_events[0].date, Some(target));
        assert!(with_events[0].is_today(target));
    }

    #[test]
    fn test_blank_cell_is_never_today() {
        assert!(!DayCell::blank().is_today(date(2025, 1, 1)));
    }
}
