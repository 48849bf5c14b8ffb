//! Weather record entity
//!
//! The flat observation produced once per pipeline run and persisted once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DomainError, GeoLocation};

/// Flat weather observation for a single location
///
/// Serializes to exactly six fields. Fields are private so a record cannot
/// change after construction; the storage timestamp is not part of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RecordFields")]
pub struct WeatherRecord {
    latitude: f64,
    longitude: f64,
    temperature: f64,
    windspeed: f64,
    winddirection: f64,
    weathercode: i64,
}

/// Unvalidated wire shape used when deserializing a record
#[derive(Deserialize)]
struct RecordFields {
    latitude: f64,
    longitude: f64,
    temperature: f64,
    windspeed: f64,
    winddirection: f64,
    weathercode: i64,
}

impl TryFrom<RecordFields> for WeatherRecord {
    type Error = DomainError;

    fn try_from(fields: RecordFields) -> Result<Self, Self::Error> {
        let location = GeoLocation::new(fields.latitude, fields.longitude)
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;
        Self::new(
            location,
            fields.temperature,
            fields.windspeed,
            fields.winddirection,
            fields.weathercode,
        )
    }
}

impl WeatherRecord {
    /// Build a record for `location` from current conditions
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if a measurement is NaN or
    /// infinite, since such values cannot be stored as non-null numbers.
    pub fn new(
        location: GeoLocation,
        temperature: f64,
        windspeed: f64,
        winddirection: f64,
        weathercode: i64,
    ) -> Result<Self, DomainError> {
        for (name, value) in [
            ("temperature", temperature),
            ("windspeed", windspeed),
            ("winddirection", winddirection),
        ] {
            if !value.is_finite() {
                return Err(DomainError::ValidationError(format!(
                    "{name} must be a finite number, got {value}"
                )));
            }
        }

        Ok(Self {
            latitude: location.latitude(),
            longitude: location.longitude(),
            temperature,
            windspeed,
            winddirection,
            weathercode,
        })
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Air temperature in °C
    #[must_use]
    pub const fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Wind speed in km/h
    #[must_use]
    pub const fn windspeed(&self) -> f64 {
        self.windspeed
    }

    /// Wind direction in degrees
    #[must_use]
    pub const fn winddirection(&self) -> f64 {
        self.winddirection
    }

    /// WMO weather interpretation code
    #[must_use]
    pub const fn weathercode(&self) -> i64 {
        self.weathercode
    }

    /// Location the record was taken for
    #[must_use]
    pub const fn location(&self) -> GeoLocation {
        GeoLocation::new_unchecked(self.latitude, self.longitude)
    }
}

/// A persisted record together with the values assigned by storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredWeatherRecord {
    /// Row identifier
    pub id: i64,
    /// The record as inserted
    #[serde(flatten)]
    pub record: WeatherRecord,
    /// Insertion time assigned by the store
    pub timestamp: DateTime<Utc>,
}
