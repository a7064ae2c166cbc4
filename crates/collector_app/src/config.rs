//! RON configuration file for the collector binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use collector_engine::{CollectorConfig, SearchQuery};
use collector_logging::collector_info;
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_FILE: &str = "collector.ron";

/// On-disk settings. Omitted fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search_endpoint: String,
    pub keywords: String,
    pub location: String,
    pub results_per_page: usize,
    pub max_results: usize,
    pub request_timeout_secs: u64,
    pub request_delay_ms: u64,
    pub pause_every: usize,
    pub user_agent: String,
    pub store_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from(&CollectorConfig::default())
    }
}

impl From<&CollectorConfig> for AppConfig {
    fn from(config: &CollectorConfig) -> Self {
        Self {
            search_endpoint: config.search.endpoint.clone(),
            keywords: config.search.keywords.clone(),
            location: config.search.location.clone(),
            results_per_page: config.search.page_size,
            max_results: config.max_results,
            request_timeout_secs: config.fetch.request_timeout.as_secs(),
            request_delay_ms: config.pace_delay.as_millis() as u64,
            pause_every: config.pace_every,
            user_agent: config.fetch.user_agent.clone(),
            store_path: config.store_path.clone(),
        }
    }
}

impl From<AppConfig> for CollectorConfig {
    fn from(app: AppConfig) -> Self {
        let defaults = CollectorConfig::default();
        let mut fetch = defaults.fetch;
        fetch.request_timeout = Duration::from_secs(app.request_timeout_secs);
        fetch.user_agent = app.user_agent;
        Self {
            search: SearchQuery {
                endpoint: app.search_endpoint,
                keywords: app.keywords,
                location: app.location,
                page_size: app.results_per_page,
            },
            max_results: app.max_results,
            fetch,
            pace_every: app.pause_every,
            pace_delay: Duration::from_millis(app.request_delay_ms),
            store_path: app.store_path,
        }
    }
}

/// Loads `explicit`, or `./collector.ron` when present, or the defaults.
///
/// Only an explicitly named file is required to exist.
pub fn load(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        return read(path);
    }
    let fallback = Path::new(DEFAULT_CONFIG_FILE);
    if fallback.exists() {
        read(fallback)
    } else {
        collector_info!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
        Ok(AppConfig::default())
    }
}

fn read(path: &Path) -> Result<AppConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let config = ron::from_str(&text)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    collector_info!("Loaded configuration from {:?}", path);
    Ok(config)
}
