//! Application settings and constants.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::view::{page, CHART_PLAN};


/// Backend used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000";

/// Path of the dashboard-data endpoint on the backend.
pub const DASHBOARD_DATA_PATH: &str = "/dashboard-data/";

/// How long the input thread waits for a key before checking for shutdown.
pub const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(250);

const APP_DIR: &str = "fraudboard";


/// Which page targets exist. Anything left out is skipped on refresh.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub lists: Vec<String>,
    pub canvases: Vec<String>,
    pub triggers: Vec<String>,
    pub summary: bool,
}


impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            lists: page::LIST_IDS.iter().map(|id| id.to_string()).collect(),
            canvases: CHART_PLAN.iter().map(|plan| plan.canvas_id.to_string()).collect(),
            triggers: page::Trigger::ALL.iter().map(|t| t.element_id().to_string()).collect(),
            summary: true,
        }
    }
}


/// Settings read from the optional TOML file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub endpoint: String,
    pub log_file: Option<PathBuf>,
    pub layout: LayoutSettings,
}


impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            log_file: None,
            layout: LayoutSettings::default(),
        }
    }
}


impl Settings {
    /// Load settings from `path`, or from the default location if it exists.
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = get_config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse a settings file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Log file used by the interactive dashboard.
    pub fn log_file_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(get_log_path)
    }
}


/// Get the default settings file path.
pub fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}


/// Get the default log file path.
pub fn get_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("fraudboard.log")
}
