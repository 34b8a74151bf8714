use crate::application::view_model::{Clock, Thresholds};
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub clock: ClockSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Fixture,
    Http,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StoreSettings {
    pub kind: StoreKind,
    /// Required when `kind = "http"`.
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            kind: StoreKind::Fixture,
            base_url: None,
            timeout_secs: 10,
        }
    }
}

impl StoreSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ClockSettings {
    /// Fixed "today" for day-count derivations; the system date when unset.
    pub evaluation_date: Option<NaiveDate>,
}

impl ClockSettings {
    pub fn clock(&self) -> Clock {
        match self.evaluation_date {
            Some(date) => Clock::Fixed(date),
            None => Clock::System,
        }
    }
}

/// `config/dashboard.toml` (optional) overlaid with `DASHBOARD_*` variables,
/// e.g. `DASHBOARD_STORE__KIND=http`.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
