use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use owo_colors::OwoColorize;
use pocketdesk_core::cache::EventCache;
use pocketdesk_core::config::DeskConfig;
use pocketdesk_core::date_range::DateRange;
use pocketdesk_core::store::EventStore;
use tracing::debug;

use crate::render::{Render, format_date_label};
use crate::utils::tui;

pub async fn run(config: DeskConfig, range: DateRange, json: bool) -> Result<()> {
    let store = EventStore::from_config(&config);
    let cache = EventCache::new(Arc::new(store));

    let spinner = tui::create_spinner("Loading events");
    let loaded = cache.load_events(range).await;
    spinner.finish_and_clear();
    loaded?;

    let events = cache.events_in(&range);
    debug!(count = events.len(), cached = cache.len(), from = %range.from, to = %range.to, "listing events");

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    let today = Local::now().date_naive();
    let mut current_date = None;

    for event in &events {
        let day = event.day();

        if current_date != Some(day) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", format_date_label(day, today).bold());
            current_date = Some(day);
        }

        println!("  {}", event.render());
    }

    Ok(())
}
