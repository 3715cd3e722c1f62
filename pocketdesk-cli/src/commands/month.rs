use std::sync::Arc;

use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use owo_colors::OwoColorize;
use pocketdesk_core::cache::EventCache;
use pocketdesk_core::calendar::CalendarViewState;
use pocketdesk_core::config::DeskConfig;
use pocketdesk_core::store::EventStore;
use tracing::debug;

use crate::render::{render_month, render_selected_day};
use crate::utils::tui;

pub async fn run(
    config: DeskConfig,
    month: Option<NaiveDate>,
    select: Option<NaiveDate>,
    only_incomplete: bool,
    json: bool,
) -> Result<()> {
    let today = Local::now().date_naive();
    let month = month.or(select).unwrap_or(today);

    if let Some(date) = select
        && !same_month(date, month)
    {
        anyhow::bail!(
            "{} is not in {}",
            date.format("%Y-%m-%d"),
            month.format("%Y-%m")
        );
    }

    debug!(month = %month.format("%Y-%m"), ?select, only_incomplete, "showing month");

    let store = EventStore::from_config(&config);
    let cache = Arc::new(EventCache::new(Arc::new(store)));
    let view = CalendarViewState::with_month(cache, config.week_start, month);

    let spinner = tui::create_spinner(format!("Loading {}", month.format("%B %Y")));
    view.load_current_month().await;
    spinner.finish_and_clear();

    if let Some(error) = view.last_error() {
        anyhow::bail!("Could not load events: {error}");
    }

    view.set_shows_only_incomplete(only_incomplete);
    view.select_date(select.or_else(|| same_month(today, month).then_some(today)));

    let snapshot = view.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("{}", render_month(&snapshot, view.week_start(), today));
    println!();
    if snapshot.selected_date.is_some() {
        println!("{}", render_selected_day(&snapshot, today));
    } else {
        println!("{}", "Pass --select YYYY-MM-DD to list a day's events".dimmed());
    }

    Ok(())
}

fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}
