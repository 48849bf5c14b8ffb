//! Weather API configuration.

use domain::{DomainError, GeoLocation};
use serde::{Deserialize, Serialize};

/// Weather service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherAppConfig {
    /// Open-Meteo API base URL
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_secs: u64,

    /// Location fetched on each run
    ///
    /// Configured as inline table: `{ latitude = 52.52, longitude = 13.405 }`
    #[serde(default)]
    pub location: GeoLocationConfig,
}

/// Geographic location configuration (latitude/longitude pair)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocationConfig {
    /// Latitude (-90.0 to 90.0)
    pub latitude: f64,
    /// Longitude (-180.0 to 180.0)
    pub longitude: f64,
}

impl Default for GeoLocationConfig {
    fn default() -> Self {
        let london = GeoLocation::london();
        Self {
            latitude: london.latitude(),
            longitude: london.longitude(),
        }
    }
}

impl GeoLocationConfig {
    /// Convert to domain `GeoLocation` value object
    pub fn to_geo_location(&self) -> Result<GeoLocation, DomainError> {
        Ok(GeoLocation::new(self.latitude, self.longitude)?)
    }
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

const fn default_weather_timeout() -> u64 {
    30
}

impl Default for WeatherAppConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            timeout_secs: default_weather_timeout(),
            location: GeoLocationConfig::default(),
        }
    }
}

impl WeatherAppConfig {
    /// Client settings for [`integration_weather::OpenMeteoClient`]
    #[must_use]
    pub fn to_client_config(&self) -> integration_weather::WeatherConfig {
        integration_weather::WeatherConfig {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}
