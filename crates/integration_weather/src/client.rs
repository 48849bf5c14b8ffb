//! Open-Meteo weather client
//!
//! HTTP client for the Open-Meteo Weather API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::ApiErrorBody;

/// Weather client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection to the weather service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the weather service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from weather service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid coordinates provided
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            Self::ConnectionFailed(e.to_string())
        } else if e.is_timeout() {
            Self::RequestFailed(format!("timed out: {e}"))
        } else {
            Self::RequestFailed(e.to_string())
        }
    }
}

/// Weather service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Open-Meteo API base URL (default: <https://api.open-meteo.com/v1>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    30
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Weather client trait for fetching weather data
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Fetch current conditions for a location as the untouched JSON body
    async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<serde_json::Value, WeatherError>;
}

/// Open-Meteo HTTP client implementation
#[derive(Debug)]
pub struct OpenMeteoClient {
    client: Client,
    config: WeatherConfig,
}

impl OpenMeteoClient {
    /// Create a new Open-Meteo client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("weather-etl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, WeatherError> {
        Self::new(WeatherConfig::default())
    }

    /// The configuration this client was built with
    #[must_use]
    pub const fn config(&self) -> &WeatherConfig {
        &self.config
    }

    /// Validate coordinates
    fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), WeatherError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherError::InvalidCoordinates);
        }
        Ok(())
    }

    /// Endpoint for current-conditions requests
    fn forecast_url(&self) -> String {
        format!("{}/forecast", self.config.base_url.trim_end_matches('/'))
    }

    /// Map a non-success status to an error, keeping the API's reason if present
    fn status_error(status: StatusCode, body: &str) -> WeatherError {
        if status == StatusCode::TOO_MANY_REQUESTS {
            return WeatherError::RateLimitExceeded;
        }

        let detail = ApiErrorBody::reason_from(body)
            .map_or_else(|| format!("HTTP {status}"), |r| format!("HTTP {status}: {r}"));

        if status.is_server_error() {
            WeatherError::ServiceUnavailable(detail)
        } else {
            WeatherError::RequestFailed(detail)
        }
    }
}

#[async_trait]
impl WeatherClient for OpenMeteoClient {
    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude))]
    async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<serde_json::Value, WeatherError> {
        Self::validate_coordinates(latitude, longitude)?;

        let url = self.forecast_url();
        debug!(url = %url, "Fetching current weather");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current_weather", "true".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Self::status_error(status, &body));
        }

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| WeatherError::ParseError(e.to_string()))?;

        debug!(bytes = body.len(), "Received weather response");
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = WeatherConfig::default();
        assert_eq!(config.base_url, "https://api.open-meteo.com/v1");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_config_deserialize_fills_defaults() {
        let config: WeatherConfig = serde_json::from_str(r#"{"timeout_secs": 5}"#).unwrap();
        assert_eq!(config.base_url, "https://api.open-meteo.com/v1");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_validate_coordinates_valid() {
        assert!(OpenMeteoClient::validate_coordinates(0.0, 0.0).is_ok());
        assert!(OpenMeteoClient::validate_coordinates(90.0, 180.0).is_ok());
        assert!(OpenMeteoClient::validate_coordinates(-90.0, -180.0).is_ok());
        assert!(OpenMeteoClient::validate_coordinates(51.5074, -0.1278).is_ok());
    }

    #[test]
    fn test_validate_coordinates_invalid() {
        assert!(OpenMeteoClient::validate_coordinates(91.0, 0.0).is_err());
        assert!(OpenMeteoClient::validate_coordinates(-91.0, 0.0).is_err());
        assert!(OpenMeteoClient::validate_coordinates(0.0, 181.0).is_err());
        assert!(OpenMeteoClient::validate_coordinates(0.0, -181.0).is_err());
    }

    #[test]
    fn test_forecast_url_trims_trailing_slash() {
        let config = WeatherConfig {
            base_url: "http://localhost:8080/v1/".to_string(),
            ..Default::default()
        };
        let client = OpenMeteoClient::new(config).expect("client creation should succeed");
        assert_eq!(client.forecast_url(), "http://localhost:8080/v1/forecast");
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            OpenMeteoClient::status_error(StatusCode::TOO_MANY_REQUESTS, ""),
            WeatherError::RateLimitExceeded
        ));
        assert!(matches!(
            OpenMeteoClient::status_error(StatusCode::BAD_GATEWAY, ""),
            WeatherError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            OpenMeteoClient::status_error(StatusCode::NOT_FOUND, ""),
            WeatherError::RequestFailed(_)
        ));
    }

    #[test]
    fn test_status_error_keeps_api_reason() {
        let err = OpenMeteoClient::status_error(
            StatusCode::BAD_REQUEST,
            r#"{"error": true, "reason": "Latitude must be in range of -90 to 90°."}"#,
        );
        assert_eq!(
            err.to_string(),
            "Request failed: HTTP 400 Bad Request: Latitude must be in range of -90 to 90°."
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            WeatherError::RateLimitExceeded.to_string(),
            "Rate limit exceeded"
        );
        assert_eq!(
            WeatherError::ParseError("eof".into()).to_string(),
            "Parse error: eof"
        );
    }
}
