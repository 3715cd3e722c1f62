//! The calendar tab: month grid, per-day event list, completion toggles.

mod day_cell;
pub mod month;
mod view_state;

pub use day_cell::{DayCell, build_month_grid};
pub use month::WeekStart;
pub use view_state::{CalendarSnapshot, CalendarViewState};
