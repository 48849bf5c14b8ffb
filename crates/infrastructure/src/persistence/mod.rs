//! Persistence module
//!
//! SQLite-based storage for weather records.

pub mod async_connection;
mod error;
pub mod weather_record_store;

pub use async_connection::{AsyncDatabase, AsyncDatabaseConfig, AsyncDatabaseError};
pub use error::map_sqlx_error;
pub use weather_record_store::{SqliteWeatherRecordStore, TableName};
