//! Configuration structures.

use mlprep_core::types::{Fractal, Group, ModelSpec};
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub model: ModelSpec,
    #[serde(default)]
    pub sampling: SamplingSettings,
    #[serde(default)]
    pub group: GroupSettings,
    #[serde(default)]
    pub feeds: FeedSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Class rebalancing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingSettings {
    /// Rebalance the training set
    pub option: bool,
    /// Method name, checked when sampling runs
    pub method: String,
    /// Over-sampling ratio; zero or negative estimates it from the labels
    pub ratio: f64,
    /// Label of the class to over-sample
    pub target_value: f64,
}

impl SamplingSettings {
    pub fn is_auto_ratio(&self) -> bool {
        self.ratio <= 0.0
    }
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            option: false,
            method: "under_random".to_string(),
            ratio: 0.0,
            target_value: 1.0,
        }
    }
}

/// Symbol group to fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupSettings {
    pub name: String,
    pub fractal: Fractal,
    pub members: Vec<String>,
    /// Days of history to request
    pub lookback_days: u32,
}

impl GroupSettings {
    pub fn group(&self) -> Group {
        Group::new(self.name.clone(), self.fractal, self.members.clone())
    }
}

impl Default for GroupSettings {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            fractal: Fractal::Daily,
            members: Vec::new(),
            lookback_days: 365,
        }
    }
}

/// Quote backend endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    pub intraday_url: String,
    pub daily_url: String,
    pub timeout_secs: u64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            intraday_url: "https://www.google.com/finance/getprices".to_string(),
            daily_url: "https://query1.finance.yahoo.com/v7/finance/download".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
