use anyhow::Result;
use owo_colors::OwoColorize;
use pocketdesk_core::config::DeskConfig;

pub fn run() -> Result<()> {
    let config_path = DeskConfig::config_path()?;
    let config = DeskConfig::load()?;

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    println!();
    println!("{}", "Settings".bold());
    println!("  week_start:          {:?}", config.week_start);
    println!("  seed_sample_events:  {}", config.seed_sample_events);
    println!("  fetch latency:       {} ms", config.latency.fetch_range_ms);
    println!("  single latency:      {} ms", config.latency.single_ms);

    Ok(())
}
