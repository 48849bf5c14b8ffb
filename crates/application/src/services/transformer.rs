//! Raw response to flat record transformation
//!
//! Pure: no I/O and no side effects.

use domain::{GeoLocation, WeatherRecord};
use serde_json::{Map, Value};

use crate::{error::ApplicationError, ports::RawWeatherPayload};

/// Key of the nested object holding current conditions
pub const CURRENT_WEATHER_KEY: &str = "current_weather";

/// Map a raw current-weather response into a flat [`WeatherRecord`]
///
/// Coordinates come from `location` (the configured pair), not from the
/// response, which reports grid-snapped values.
///
/// # Errors
///
/// Returns `ApplicationError::MalformedInput` if `current_weather` or any of
/// its `temperature`, `windspeed`, `winddirection`, `weathercode` fields is
/// absent, null, or of the wrong type.
pub fn transform(
    raw: &RawWeatherPayload,
    location: GeoLocation,
) -> Result<WeatherRecord, ApplicationError> {
    let current = raw
        .as_value()
        .get(CURRENT_WEATHER_KEY)
        .ok_or_else(|| malformed(format!("missing '{CURRENT_WEATHER_KEY}' object")))?
        .as_object()
        .ok_or_else(|| malformed(format!("'{CURRENT_WEATHER_KEY}' is not an object")))?;

    let temperature = number_field(current, "temperature")?;
    let windspeed = number_field(current, "windspeed")?;
    let winddirection = number_field(current, "winddirection")?;
    let weathercode = integer_field(current, "weathercode")?;

    WeatherRecord::new(location, temperature, windspeed, winddirection, weathercode)
        .map_err(|e| malformed(e.to_string()))
}

fn malformed(reason: String) -> ApplicationError {
    ApplicationError::MalformedInput(reason)
}

fn present<'a>(object: &'a Map<String, Value>, name: &str) -> Result<&'a Value, ApplicationError> {
    match object.get(name) {
        None => Err(malformed(format!(
            "missing field '{CURRENT_WEATHER_KEY}.{name}'"
        ))),
        Some(Value::Null) => Err(malformed(format!(
            "field '{CURRENT_WEATHER_KEY}.{name}' is null"
        ))),
        Some(value) => Ok(value),
    }
}

fn number_field(object: &Map<String, Value>, name: &str) -> Result<f64, ApplicationError> {
    present(object, name)?.as_f64().ok_or_else(|| {
        malformed(format!(
            "field '{CURRENT_WEATHER_KEY}.{name}' must be a number"
        ))
    })
}

fn integer_field(object: &Map<String, Value>, name: &str) -> Result<i64, ApplicationError> {
    present(object, name)?.as_i64().ok_or_else(|| {
        malformed(format!(
            "field '{CURRENT_WEATHER_KEY}.{name}' must be an integer"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> RawWeatherPayload {
        RawWeatherPayload::new(value)
    }

    fn london() -> GeoLocation {
        GeoLocation::new(51.5074, -0.1278).unwrap()
    }

    fn assert_malformed(result: Result<WeatherRecord, ApplicationError>, needle: &str) {
        match result {
            Err(ApplicationError::MalformedInput(msg)) => {
                assert!(msg.contains(needle), "'{msg}' should mention '{needle}'");
            },
            other => unreachable!("Expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn transforms_reference_payload() {
        let raw = payload(json!({
            "current_weather": {
                "temperature": 15.2,
                "windspeed": 10.1,
                "winddirection": 200,
                "weathercode": 3
            }
        }));

        let record = transform(&raw, london()).unwrap();

        assert_eq!(
            serde_json::to_value(record).unwrap(),
            json!({
                "latitude": 51.5074,
                "longitude": -0.1278,
                "temperature": 15.2,
                "windspeed": 10.1,
                "winddirection": 200.0,
                "weathercode": 3
            })
        );
    }

    #[test]
    fn uses_configured_coordinates_not_response_ones() {
        let raw = payload(json!({
            "latitude": 51.5,
            "longitude": -0.120000124,
            "current_weather": {
                "temperature": 1.0,
                "windspeed": 2.0,
                "winddirection": 3.0,
                "weathercode": 0,
                "is_day": 1,
                "time": "2024-06-01T12:00"
            }
        }));

        let record = transform(&raw, london()).unwrap();
        assert_eq!(record.location(), london());
    }

    #[test]
    fn missing_current_weather_fails() {
        let raw = payload(json!({"latitude": 51.5, "longitude": -0.12}));
        assert_malformed(transform(&raw, london()), "current_weather");
    }

    #[test]
    fn current_weather_not_an_object_fails() {
        let raw = payload(json!({"current_weather": [1, 2, 3]}));
        assert_malformed(transform(&raw, london()), "not an object");
    }

    #[test]
    fn each_missing_field_is_named() {
        for field in ["temperature", "windspeed", "winddirection", "weathercode"] {
            let mut current = json!({
                "temperature": 15.2,
                "windspeed": 10.1,
                "winddirection": 200,
                "weathercode": 3
            });
            current.as_object_mut().unwrap().remove(field);
            let raw = payload(json!({ "current_weather": current }));

            assert_malformed(transform(&raw, london()), field);
        }
    }

    #[test]
    fn null_field_fails() {
        let raw = payload(json!({
            "current_weather": {
                "temperature": null,
                "windspeed": 10.1,
                "winddirection": 200,
                "weathercode": 3
            }
        }));
        assert_malformed(transform(&raw, london()), "is null");
    }

    #[test]
    fn string_number_fails() {
        let raw = payload(json!({
            "current_weather": {
                "temperature": "15.2",
                "windspeed": 10.1,
                "winddirection": 200,
                "weathercode": 3
            }
        }));
        assert_malformed(transform(&raw, london()), "must be a number");
    }

    #[test]
    fn fractional_weathercode_fails() {
        let raw = payload(json!({
            "current_weather": {
                "temperature": 15.2,
                "windspeed": 10.1,
                "winddirection": 200,
                "weathercode": 3.5
            }
        }));
        assert_malformed(transform(&raw, london()), "must be an integer");
    }

    #[test]
    fn non_object_root_fails() {
        let raw = payload(json!("oops"));
        assert_malformed(transform(&raw, london()), "current_weather");
    }
}
