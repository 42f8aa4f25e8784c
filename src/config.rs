//! Runtime configuration.
//!
//! Values come from `CITY_WEATHER_*` environment variables layered over the
//! defaults below, e.g. `CITY_WEATHER_API_KEY` and `CITY_WEATHER_UNITS=metric`.

use anyhow::{bail, Context, Result};
use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::constants::{FORECAST_API_URL, GEOCODE_API_URL, ICON_BASE_URL, WEATHER_API_URL};
use crate::models::UnitMode;

const ENV_PREFIX: &str = "CITY_WEATHER";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_geocode_url")]
    pub geocode_url: String,

    #[serde(default = "default_weather_url")]
    pub weather_url: String,

    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,

    #[serde(default = "default_icon_url")]
    pub icon_url: String,

    #[serde(default)]
    pub units: UnitMode,

    /// Directory holding the persisted search history
    #[serde(default = "default_history_dir")]
    pub history_dir: PathBuf,
}

fn default_geocode_url() -> String {
    GEOCODE_API_URL.to_string()
}

fn default_weather_url() -> String {
    WEATHER_API_URL.to_string()
}

fn default_forecast_url() -> String {
    FORECAST_API_URL.to_string()
}

fn default_icon_url() -> String {
    ICON_BASE_URL.to_string()
}

fn default_history_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("city-weather"))
        .unwrap_or_else(|| PathBuf::from(".city-weather"))
}

impl WeatherConfig {
    /// Defaults with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            geocode_url: default_geocode_url(),
            weather_url: default_weather_url(),
            forecast_url: default_forecast_url(),
            icon_url: default_icon_url(),
            units: UnitMode::default(),
            history_dir: default_history_dir(),
        }
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_environment(Environment::with_prefix(ENV_PREFIX))
    }

    /// Load configuration from an explicit variable map instead of the process environment
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        Self::from_environment(Environment::with_prefix(ENV_PREFIX).source(Some(vars)))
    }

    fn from_environment(env: Environment) -> Result<Self> {
        let settings = Config::builder()
            .add_source(env)
            .build()
            .context("Failed to build configuration")?;

        let config: WeatherConfig = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            bail!("Missing API key. Set {}_API_KEY.", ENV_PREFIX);
        }

        for (name, url) in [
            ("geocode_url", &self.geocode_url),
            ("weather_url", &self.weather_url),
            ("forecast_url", &self.forecast_url),
            ("icon_url", &self.icon_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                bail!("{} must be an HTTP or HTTPS URL, got '{}'", name, url);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = WeatherConfig::new("key");
        assert_eq!(config.geocode_url, GEOCODE_API_URL);
        assert_eq!(config.units, UnitMode::Imperial);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let config = WeatherConfig::from_vars(vars(&[
            ("CITY_WEATHER_API_KEY", "abc123"),
            ("CITY_WEATHER_UNITS", "metric"),
            ("CITY_WEATHER_HISTORY_DIR", "/tmp/cw"),
        ]))
        .unwrap();

        assert_eq!(config.api_key, "abc123");
        assert_eq!(config.units, UnitMode::Metric);
        assert_eq!(config.history_dir, PathBuf::from("/tmp/cw"));
        assert_eq!(config.forecast_url, FORECAST_API_URL);
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let result = WeatherConfig::from_vars(HashMap::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_non_http_url_rejected() {
        let mut config = WeatherConfig::new("key");
        config.weather_url = "ftp://example.com".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("weather_url"));
    }
}
