mod commands;
mod render;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pocketdesk_core::config::DeskConfig;
use pocketdesk_core::date_range::{DateRange, parse_date, parse_month};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pocketdesk")]
#[command(about = "A pocket calculator and a personal calendar in your terminal")]
struct Cli {
    /// Show debug logging on stderr (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Press calculator keys in order and show the result
    Calc {
        /// Keys such as 1 2 . 5 + × = AC ± %  (ASCII -, *, x, / and +/- work too)
        #[arg(required = true, allow_hyphen_values = true)]
        keys: Vec<String>,

        /// Print the display after every key press
        #[arg(long)]
        steps: bool,
    },
    /// Show a month grid and the events of one day
    Month {
        /// Month to show (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,

        /// Day to list events for (YYYY-MM-DD), defaults to today if visible
        #[arg(short, long)]
        select: Option<String>,

        /// Hide completed events in the day list
        #[arg(long)]
        incomplete: bool,

        /// Print the view as JSON instead of a grid
        #[arg(long)]
        json: bool,
    },
    /// List events in a date range, grouped by day
    Events {
        /// Show events from this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Show events until this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Print events as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show where configuration is read from and the values in effect
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Calc { keys, steps } => commands::calc::run(&keys, steps),
        Commands::Month {
            month,
            select,
            incomplete,
            json,
        } => {
            let config = DeskConfig::load()?;
            let month = month.as_deref().map(parse_month).transpose()?;
            let select = select.as_deref().map(parse_date).transpose()?;
            commands::month::run(config, month, select, incomplete, json).await
        }
        Commands::Events { from, to, json } => {
            let config = DeskConfig::load()?;
            let range = DateRange::from_args(from.as_deref(), to.as_deref())?;
            commands::events::run(config, range, json).await
        }
        Commands::Config => commands::config::run(),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
