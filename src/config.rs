// src/config.rs

//! Application configuration.
//!
//! Loaded from an optional TOML file with per-field defaults, then
//! overridden by environment variables (`JOBPRESS_API_URL`,
//! `JOBPRESS_API_TOKEN`). Dry-run is a CLI flag, never a config setting.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Region;
use crate::rules::Ruleset;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Feed endpoint settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Classification rule selection
    #[serde(default)]
    pub rules: RulesConfig,

    /// Output target layout
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("JOBPRESS_API_URL") {
            if !url.trim().is_empty() {
                self.api.base_url = url;
            }
        }
        if let Ok(token) = std::env::var("JOBPRESS_API_TOKEN") {
            if !token.trim().is_empty() {
                self.api.token = token;
            }
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(AppError::config("api.base_url is empty"));
        }
        url::Url::parse(&self.api.base_url)?;
        if self.api.token.trim().is_empty() {
            return Err(AppError::config("api.token is empty"));
        }
        if self.api.lookback_hours == 0 {
            return Err(AppError::config("api.lookback_hours must be > 0"));
        }
        if self.output.root_dir.trim().is_empty() {
            return Err(AppError::config("output.root_dir is empty"));
        }
        if self.output.primary_dir.trim().is_empty() {
            return Err(AppError::config("output.primary_dir is empty"));
        }
        let mut seen = Vec::new();
        for target in &self.output.secondary {
            let region = target.parsed_region()?;
            if region == Region::Ww {
                return Err(AppError::config(
                    "WW is the primary target and cannot be a secondary target",
                ));
            }
            if seen.contains(&region) {
                return Err(AppError::config(format!(
                    "duplicate secondary target for region {}",
                    region.code()
                )));
            }
            if target.dir.trim().is_empty() {
                return Err(AppError::config(format!(
                    "secondary target {} has an empty dir",
                    region.code()
                )));
            }
            seen.push(region);
        }
        Ok(())
    }
}

/// Feed endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the feed API
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Caller identity token, sent as a static header
    #[serde(default = "defaults::token")]
    pub token: String,

    /// Lookback window requested from the feed, in hours
    #[serde(default = "defaults::lookback_hours")]
    pub lookback_hours: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            token: defaults::token(),
            lookback_hours: defaults::lookback_hours(),
        }
    }
}

/// Classification rule selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Which rule generation to apply
    #[serde(default)]
    pub ruleset: Ruleset,
}

/// Output target layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root directory all targets are published under
    #[serde(default = "defaults::root_dir")]
    pub root_dir: String,

    /// Directory of the primary (overview) target
    #[serde(default = "defaults::primary_dir")]
    pub primary_dir: String,

    /// Secondary single-region targets, published in listed order
    #[serde(default = "defaults::secondary_targets")]
    pub secondary: Vec<SecondaryTarget>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root_dir: defaults::root_dir(),
            primary_dir: defaults::primary_dir(),
            secondary: defaults::secondary_targets(),
        }
    }
}

/// One secondary output target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecondaryTarget {
    /// Region code (EMEA, APAC, NA, LATAM)
    pub region: String,

    /// Directory name under the output root
    pub dir: String,
}

impl SecondaryTarget {
    /// Parse the configured region code.
    pub fn parsed_region(&self) -> Result<Region> {
        Region::parse(&self.region).ok_or_else(|| {
            AppError::config(format!("unknown secondary target region '{}'", self.region))
        })
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (error, warn, info, debug, trace)
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use super::SecondaryTarget;

    pub fn base_url() -> String {
        "https://feeds.jobpress.dev".into()
    }
    pub fn token() -> String {
        "jobpress-publisher".into()
    }
    pub fn lookback_hours() -> u32 {
        72
    }
    pub fn root_dir() -> String {
        "dist".into()
    }
    pub fn primary_dir() -> String {
        "worldwide".into()
    }
    pub fn secondary_targets() -> Vec<SecondaryTarget> {
        vec![
            SecondaryTarget {
                region: "EMEA".into(),
                dir: "emea".into(),
            },
            SecondaryTarget {
                region: "APAC".into(),
                dir: "apac".into(),
            },
        ]
    }
    pub fn log_level() -> String {
        "info".into()
    }
}
