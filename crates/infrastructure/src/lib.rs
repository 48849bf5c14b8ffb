//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer.
//! Contains the Open-Meteo adapter, SQLite persistence, configuration loading
//! and logging setup.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, DatabaseConfig, GeoLocationConfig, WeatherAppConfig};
pub use persistence::{
    AsyncDatabase, AsyncDatabaseConfig, AsyncDatabaseError, SqliteWeatherRecordStore, TableName,
};
pub use telemetry::{TelemetryConfig, TelemetryError, init_telemetry};
