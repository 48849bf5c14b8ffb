//! Weather source port
//!
//! Defines the interface for extracting raw current-weather data.

use async_trait::async_trait;
use domain::GeoLocation;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Untouched response body from a weather source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawWeatherPayload(serde_json::Value);

impl RawWeatherPayload {
    #[must_use]
    pub const fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }
}

impl From<serde_json::Value> for RawWeatherPayload {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Port for fetching current weather
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherSourcePort: Send + Sync {
    /// Fetch current conditions for a location, one request, no retry
    async fn fetch_current(
        &self,
        location: &GeoLocation,
    ) -> Result<RawWeatherPayload, ApplicationError>;
}
