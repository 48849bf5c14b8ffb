//! Application configuration
//!
//! Split into focused sub-modules:
//! - `database`: SQLite connection and destination table
//! - `integrations`: Open-Meteo endpoint and the location to fetch
//!
//! Telemetry settings live next to the subscriber setup in [`crate::telemetry`].

mod database;
mod integrations;

use std::path::Path;

use config::ConfigError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{persistence::TableName, telemetry::TelemetryConfig};

pub use database::DatabaseConfig;
pub use integrations::{GeoLocationConfig, WeatherAppConfig};

/// Prefix for environment overrides, e.g. `WEATHER_ETL_DATABASE__URL`
pub const ENV_PREFIX: &str = "WEATHER_ETL";

/// Separator between nested keys in environment overrides
pub const ENV_SEPARATOR: &str = "__";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Weather API configuration
    #[serde(default)]
    pub weather: WeatherAppConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from the process environment and a config file
    ///
    /// With `path` set the file must exist; otherwise `config.toml` in the
    /// working directory is read if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, Self::environment())
    }

    /// Load configuration with an explicit environment source
    pub fn load_with_env(
        path: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let config = config::Config::builder()
            // Load from file if exists
            .add_source(file)
            // Override with environment variables (e.g., WEATHER_ETL_WEATHER__TIMEOUT_SECS)
            .add_source(environment)
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        debug!(config = ?loaded, "Configuration loaded");
        Ok(loaded)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
    }

    /// Check values the type system cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weather
            .location
            .to_geo_location()
            .map_err(|e| ConfigError::Message(format!("weather.location: {e}")))?;

        if self.weather.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "weather.timeout_secs must be greater than 0".into(),
            ));
        }

        if self.weather.base_url.trim().is_empty() {
            return Err(ConfigError::Message("weather.base_url must be set".into()));
        }

        TableName::new(self.database.table.as_str())
            .map_err(|e| ConfigError::Message(format!("database.table: {e}")))?;

        if self.database.max_connections == 0 {
            return Err(ConfigError::Message(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::environment().source(Some(map))
    }

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_sources() {
        let config = AppConfig::load_with_env(None, env(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn file_overrides_defaults() {
        let file = config_file(
            r#"
            [weather]
            timeout_secs = 10
            location = { latitude = 48.8566, longitude = 2.3522 }

            [database]
            url = "sqlite:/var/lib/weather/etl.db"
            table = "paris_weather"
            "#,
        );

        let config = AppConfig::load_with_env(Some(file.path()), env(&[])).unwrap();

        assert_eq!(config.weather.timeout_secs, 10);
        assert!((config.weather.location.latitude - 48.8566).abs() < f64::EPSILON);
        assert_eq!(config.database.url, "sqlite:/var/lib/weather/etl.db");
        assert_eq!(config.database.table, "paris_weather");
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn environment_overrides_file() {
        let file = config_file("[database]\nurl = \"sqlite:from-file.db\"\n");

        let config = AppConfig::load_with_env(
            Some(file.path()),
            env(&[
                ("WEATHER_ETL_DATABASE__URL", "sqlite:from-env.db"),
                ("WEATHER_ETL_WEATHER__LOCATION__LATITUDE", "40.7128"),
                ("WEATHER_ETL_WEATHER__LOCATION__LONGITUDE", "-74.006"),
                ("WEATHER_ETL_TELEMETRY__JSON", "true"),
            ]),
        )
        .unwrap();

        assert_eq!(config.database.url, "sqlite:from-env.db");
        assert!((config.weather.location.longitude + 74.006).abs() < 1e-9);
        assert!(config.telemetry.json);
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load_with_env(Some(&dir.path().join("absent.toml")), env(&[]));
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_bad_location() {
        let mut config = AppConfig::default();
        config.weather.location.latitude = 95.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_table_name() {
        let mut config = AppConfig::default();
        config.database.table = "weather; DROP TABLE users".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("database.table"));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = AppConfig::default();
        config.weather.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn serializes_to_toml_and_back() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("[database]"));
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
