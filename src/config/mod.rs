use crate::global;
use crate::report::ReportOptions;
use crate::zoom::{Credentials, DEFAULT_API_BASE_URL, DEFAULT_OAUTH_URL};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub zoom: ZoomConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Server-to-server OAuth app credentials
    pub account_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub api_base_url: String,
    pub oauth_url: String,
    /// Per-request deadline; unset keeps the HTTP client's defaults
    pub request_timeout_seconds: Option<u64>,
    /// Fetch participants and polls concurrently
    pub parallel_fetches: bool,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub pretty: bool,
    pub include_breakdown: bool,
    /// Mapping file used when `report` is not given `--mappings`
    pub email_mappings_path: Option<String>,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            oauth_url: DEFAULT_OAUTH_URL.to_string(),
            request_timeout_seconds: Some(30),
            parallel_fetches: false,
        }
    }
}

impl ZoomConfig {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.account_id, &self.client_id, &self.client_secret)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path`, writing a default file there first if none exists.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Config file not found, creating default at {:?}", path);
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        global::config_file()
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            include_breakdown: self.output.include_breakdown,
            parallel_fetches: self.zoom.parallel_fetches,
        }
    }

    /// Same config with the client secret blanked, for display.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if !config.zoom.client_secret.is_empty() {
            config.zoom.client_secret = "<redacted>".to_string();
        }
        config
    }
}
