use crate::domain::table::DEFAULT_TABLE_ROWS;
use crate::domain::window::{DEFAULT_BUCKET, DEFAULT_MINUTES};
use serde::Deserialize;
use std::time::Duration;

/// Service configuration. Every key has a default, so the file is optional.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DashboardConfig {
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout; unset leaves the transport default.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_listen")]
    pub listen: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_minutes")]
    pub default_minutes: i64,
    #[serde(default = "default_bucket")]
    pub default_bucket: String,
    #[serde(default = "default_series_limit")]
    pub series_limit: usize,
    #[serde(default = "default_table_rows")]
    pub table_rows: usize,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: None,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            default_minutes: default_minutes(),
            default_bucket: default_bucket(),
            series_limit: default_series_limit(),
            table_rows: default_table_rows(),
        }
    }
}

impl BackendSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl DashboardSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_listen() -> String {
    "0.0.0.0:8090".to_string()
}

fn default_poll_interval_ms() -> u64 {
    5000
}

fn default_minutes() -> i64 {
    DEFAULT_MINUTES
}

fn default_bucket() -> String {
    DEFAULT_BUCKET.to_string()
}

fn default_series_limit() -> usize {
    5000
}

fn default_table_rows() -> usize {
    DEFAULT_TABLE_ROWS
}

/// Load `config/dashboard.*` (if present), then `DASHBOARD__SECTION__KEY`
/// environment overrides.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
