use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::error::ProviderError;

const DEFAULT_ENDPOINT: &str = "http://api.openweathermap.org";
const DEFAULT_WEATHER_PATH: &str = "/data/2.5/weather";
const DEFAULT_FORECAST_PATH: &str = "/data/2.5/forecast";
const DEFAULT_CITY_QUERY_PARAM: &str = "q";
const DEFAULT_TIMEOUT_SECS: u64 = 4;

/// Settings needed to reach the weather provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL, e.g. "http://api.openweathermap.org".
    pub endpoint: String,
    pub weather_path: String,
    /// Not used by the skill; kept so existing config files stay valid.
    pub forecast_path: String,
    pub city_query_param: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            weather_path: DEFAULT_WEATHER_PATH.to_string(),
            forecast_path: DEFAULT_FORECAST_PATH.to_string(),
            city_query_param: DEFAULT_CITY_QUERY_PARAM.to_string(),
            api_key: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full URL of the current-weather resource, without query string.
    pub fn weather_url(&self) -> Result<Url, ProviderError> {
        let raw = format!("{}{}", self.endpoint, self.weather_path);
        Url::parse(&raw).map_err(|e| ProviderError::InvalidEndpoint(format!("{raw}: {e}")))
    }

    /// Check that the settings are usable before handing them to a provider.
    pub fn validate(&self) -> Result<()> {
        self.weather_url()?;

        if self.api_key.trim().is_empty() {
            bail!(
                "No API key configured.\n\
                 Hint: run `weather-watcher configure` and enter your OpenWeatherMap API key."
            );
        }
        if self.city_query_param.trim().is_empty() {
            bail!("City query parameter name must not be empty");
        }
        if self.timeout_secs == 0 {
            bail!("Timeout must be at least one second");
        }

        Ok(())
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [provider]
/// endpoint = "http://api.openweathermap.org"
/// weather_path = "/data/2.5/weather"
/// city_query_param = "q"
/// api_key = "..."
/// timeout_secs = 4
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
}

impl Config {
    /// Load config from the platform config dir, or defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-watcher", "weather-watcher")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.provider.api_key = api_key.into();
    }

    pub fn is_configured(&self) -> bool {
        !self.provider.api_key.trim().is_empty()
    }
}
