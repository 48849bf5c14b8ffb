//! Weather adapter - Implements WeatherSourcePort using integration_weather

use application::{
    error::ApplicationError,
    ports::{RawWeatherPayload, WeatherSourcePort},
};
use async_trait::async_trait;
use domain::GeoLocation;
use integration_weather::{OpenMeteoClient, WeatherClient, WeatherConfig, WeatherError};
use tracing::{debug, instrument};

/// Adapter for the Open-Meteo current-weather endpoint
pub struct WeatherAdapter {
    client: OpenMeteoClient,
}

impl std::fmt::Debug for WeatherAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherAdapter")
            .field("base_url", &self.client.config().base_url)
            .finish_non_exhaustive()
    }
}

impl WeatherAdapter {
    /// Create a new adapter with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new() -> Result<Self, ApplicationError> {
        let client = OpenMeteoClient::with_defaults()
            .map_err(|e| ApplicationError::Internal(e.to_string()))?;
        Ok(Self { client })
    }

    /// Create with custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn with_config(config: WeatherConfig) -> Result<Self, ApplicationError> {
        let client =
            OpenMeteoClient::new(config).map_err(|e| ApplicationError::Internal(e.to_string()))?;
        Ok(Self { client })
    }

    /// Map integration weather error to application error
    fn map_error(err: WeatherError) -> ApplicationError {
        match err {
            WeatherError::ConnectionFailed(e)
            | WeatherError::RequestFailed(e)
            | WeatherError::ServiceUnavailable(e) => ApplicationError::ExternalService(e),
            WeatherError::ParseError(e) => {
                ApplicationError::ExternalService(format!("Response is not JSON: {e}"))
            },
            WeatherError::InvalidCoordinates => {
                ApplicationError::InvalidInput("Invalid coordinates".into())
            },
            WeatherError::RateLimitExceeded => ApplicationError::RateLimited,
        }
    }
}

#[async_trait]
impl WeatherSourcePort for WeatherAdapter {
    #[instrument(skip(self), fields(location = %location))]
    async fn fetch_current(
        &self,
        location: &GeoLocation,
    ) -> Result<RawWeatherPayload, ApplicationError> {
        let value = self
            .client
            .fetch_current(location.latitude(), location.longitude())
            .await
            .map_err(Self::map_error)?;

        debug!("Current weather fetched");
        Ok(RawWeatherPayload::new(value))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    use super::*;

    fn adapter_for(server: &MockServer) -> WeatherAdapter {
        WeatherAdapter::with_config(WeatherConfig {
            base_url: server.uri(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn adapter_creation() {
        assert!(WeatherAdapter::new().is_ok());
    }

    #[test]
    fn debug_shows_base_url() {
        let adapter = WeatherAdapter::new().unwrap();
        let debug = format!("{adapter:?}");
        assert!(debug.contains("WeatherAdapter"));
        assert!(debug.contains("api.open-meteo.com"));
    }

    #[test]
    fn map_error_network_failures_are_external() {
        for err in [
            WeatherError::ConnectionFailed("refused".into()),
            WeatherError::RequestFailed("HTTP 404".into()),
            WeatherError::ServiceUnavailable("HTTP 503".into()),
            WeatherError::ParseError("expected value".into()),
        ] {
            assert!(matches!(
                WeatherAdapter::map_error(err),
                ApplicationError::ExternalService(_)
            ));
        }
    }

    #[test]
    fn map_error_invalid_coordinates() {
        assert!(matches!(
            WeatherAdapter::map_error(WeatherError::InvalidCoordinates),
            ApplicationError::InvalidInput(_)
        ));
    }

    #[test]
    fn map_error_rate_limited() {
        assert!(matches!(
            WeatherAdapter::map_error(WeatherError::RateLimitExceeded),
            ApplicationError::RateLimited
        ));
    }

    #[tokio::test]
    async fn fetch_current_wraps_raw_body() {
        let server = MockServer::start().await;
        let body = json!({
            "latitude": 51.5,
            "longitude": -0.120000124,
            "current_weather": {
                "temperature": 15.2,
                "windspeed": 10.1,
                "winddirection": 200,
                "weathercode": 3
            }
        });
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("current_weather", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .expect(1)
            .mount(&server)
            .await;

        let raw = adapter_for(&server)
            .fetch_current(&GeoLocation::london())
            .await
            .unwrap();

        assert_eq!(raw.as_value(), &body);
    }

    #[tokio::test]
    async fn fetch_current_maps_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = adapter_for(&server)
            .fetch_current(&GeoLocation::london())
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ExternalService(_)));
        assert!(err.is_retryable());
    }
}
