//! Layered settings: an optional TOML file, then `TRAILWATCH_*` variables.
//!
//! ```toml
//! refresh = "500ms"
//! theme = "dark"
//! config_output = "thresholds.txt"
//! export_path = "export.json"
//! ```
//!
//! Command-line flags override whatever is loaded here.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::ValueEnum;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::data::duration::parse_duration;

/// Settings file read from the working directory when none is given.
pub const DEFAULT_SETTINGS_FILE: &str = "trailwatch.toml";

/// Prefix for environment overrides, e.g. `TRAILWATCH_REFRESH=2s`.
pub const ENV_PREFIX: &str = "TRAILWATCH";

/// Color theme selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Pick light or dark from the terminal background.
    #[default]
    Auto,
    Dark,
    Light,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How often watched files are polled, e.g. "1s".
    pub refresh: String,
    pub theme: ThemeMode,
    /// Where the config editor writes the threshold file.
    pub config_output: PathBuf,
    /// Where the export action writes the dashboard JSON.
    pub export_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh: "1s".to_string(),
            theme: ThemeMode::Auto,
            config_output: PathBuf::from("config.txt"),
            export_path: PathBuf::from("trailwatch_export.json"),
        }
    }
}

impl Settings {
    /// Load settings from `path` (or [`DEFAULT_SETTINGS_FILE`]) and the
    /// process environment.
    ///
    /// An explicitly given file must exist; the default one is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`Settings::load`], but reads environment overrides from `env`
    /// instead of the process environment when it is given.
    pub fn load_with_env(path: Option<&Path>, env: Option<config::Map<String, String>>) -> Result<Self> {
        let required = path.is_some();
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_SETTINGS_FILE));

        let config = Config::builder()
            .add_source(File::from(path).required(required))
            .add_source(Environment::with_prefix(ENV_PREFIX).source(env))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// The poll interval, falling back to one second if it does not parse.
    pub fn refresh_interval(&self) -> Duration {
        parse_duration(&self.refresh).unwrap_or(Duration::from_secs(1))
    }
}
