//! Global pocketdesk configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::calendar::month::WeekStart;
use crate::constants::{DEFAULT_FETCH_RANGE_LATENCY, DEFAULT_SINGLE_LATENCY};
use crate::error::{Error, Result};

const ENV_PREFIX: &str = "POCKETDESK";

fn default_true() -> bool {
    true
}

/// Simulated backend round trips, in milliseconds.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct LatencyConfig {
    pub fetch_range_ms: u64,
    pub single_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        LatencyConfig {
            fetch_range_ms: DEFAULT_FETCH_RANGE_LATENCY.as_millis() as u64,
            single_ms: DEFAULT_SINGLE_LATENCY.as_millis() as u64,
        }
    }
}

impl LatencyConfig {
    /// No simulated delay at all.
    pub fn none() -> Self {
        LatencyConfig {
            fetch_range_ms: 0,
            single_ms: 0,
        }
    }

    pub fn fetch_range(&self) -> Duration {
        Duration::from_millis(self.fetch_range_ms)
    }

    pub fn single(&self) -> Duration {
        Duration::from_millis(self.single_ms)
    }
}

/// Configuration at ~/.config/pocketdesk/config.toml, overridable with
/// `POCKETDESK_*` environment variables (`POCKETDESK_LATENCY__SINGLE_MS=0`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DeskConfig {
    #[serde(default)]
    pub week_start: WeekStart,

    #[serde(default = "default_true")]
    pub seed_sample_events: bool,

    #[serde(default)]
    pub latency: LatencyConfig,
}

impl Default for DeskConfig {
    fn default() -> Self {
        DeskConfig {
            week_start: WeekStart::default(),
            seed_sample_events: true,
            latency: LatencyConfig::default(),
        }
    }
}

impl DeskConfig {
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not determine config directory".into()))?
            .join("pocketdesk");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented template on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path` (which may be missing), then apply environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| Error::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| Error::Config(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| Error::Config(format!("Could not write config file: {e}")))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> Result<()> {
        let defaults = LatencyConfig::default();
        let contents = format!(
            "\
# pocketdesk configuration

# First column of the month grid (\"sunday\" or \"monday\"):
# week_start = \"sunday\"

# Start with a few example events:
# seed_sample_events = true

# Simulated backend latency:
# [latency]
# fetch_range_ms = {}
# single_ms = {}
",
            defaults.fetch_range_ms, defaults.single_ms
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| Error::Config(format!("Could not write config file: {e}")))
    }
}
