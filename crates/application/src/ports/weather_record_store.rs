//! Weather record store port
//!
//! Defines the interface for persisting flat weather records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{StoredWeatherRecord, WeatherRecord};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for weather record persistence
///
/// Records are append-only: there is no update or delete.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherRecordStore: Send + Sync {
    /// Create the destination table if it does not exist
    ///
    /// Calling this repeatedly leaves the schema unchanged.
    async fn ensure_table(&self) -> Result<(), ApplicationError>;

    /// Append one row; the store assigns the id and timestamp
    async fn insert(&self, record: &WeatherRecord)
    -> Result<StoredWeatherRecord, ApplicationError>;

    /// Rows whose storage timestamp equals `timestamp`
    async fn find_by_timestamp(
        &self,
        timestamp: DateTime<Utc>,
    ) -> Result<Vec<StoredWeatherRecord>, ApplicationError>;

    /// Most recent rows, newest first
    async fn recent(&self, limit: u32) -> Result<Vec<StoredWeatherRecord>, ApplicationError>;

    /// Total number of stored rows
    async fn count(&self) -> Result<u64, ApplicationError>;
}
