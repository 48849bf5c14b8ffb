//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod weather_record_store;
mod weather_source_port;

#[cfg(test)]
pub use weather_record_store::MockWeatherRecordStore;
pub use weather_record_store::WeatherRecordStore;
#[cfg(test)]
pub use weather_source_port::MockWeatherSourcePort;
pub use weather_source_port::{RawWeatherPayload, WeatherSourcePort};
