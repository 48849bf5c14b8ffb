//! Weather record store using sqlx
//!
//! Append-only SQLite table holding one row per pipeline run. The table is
//! created on demand and the insertion timestamp comes from the column
//! default, never from the caller.

use std::fmt;

use application::{error::ApplicationError, ports::WeatherRecordStore};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use domain::{GeoLocation, StoredWeatherRecord, WeatherRecord};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::error::map_sqlx_error;

/// Format SQLite's `CURRENT_TIMESTAMP` produces
const SQLITE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Validated SQL table name
///
/// Only `[A-Za-z_][A-Za-z0-9_]*` is accepted and statements always use the
/// double-quoted form, so keywords such as `order` are valid names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName(String);

impl TableName {
    /// Maximum accepted length
    pub const MAX_LEN: usize = 63;

    /// Validate a table name
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if `name` is empty, too long,
    /// contains characters outside `[A-Za-z0-9_]`, starts with a digit or uses
    /// SQLite's reserved `sqlite_` prefix.
    pub fn new(name: impl Into<String>) -> Result<Self, ApplicationError> {
        let name = name.into();
        let mut chars = name.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

        if !valid_start || !valid_rest || name.len() > Self::MAX_LEN {
            return Err(ApplicationError::Configuration(format!(
                "invalid table name '{name}': use letters, digits and underscores"
            )));
        }
        if name.to_ascii_lowercase().starts_with("sqlite_") {
            return Err(ApplicationError::Configuration(format!(
                "invalid table name '{name}': the sqlite_ prefix is reserved"
            )));
        }
        Ok(Self(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier form for SQL statements
    #[must_use]
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }

    fn index_name(&self) -> String {
        format!("\"idx_{}_timestamp\"", self.0)
    }
}

impl Default for TableName {
    fn default() -> Self {
        Self("weather_data".to_string())
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Weather record store backed by a SQLite table
#[derive(Debug, Clone)]
pub struct SqliteWeatherRecordStore {
    pool: SqlitePool,
    table: TableName,
}

impl SqliteWeatherRecordStore {
    /// Create a store writing to the default `weather_data` table
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_table(pool, TableName::default())
    }

    /// Create a store writing to `table`
    #[must_use]
    pub const fn with_table(pool: SqlitePool, table: TableName) -> Self {
        Self { pool, table }
    }

    /// The table this store writes to
    #[must_use]
    pub const fn table(&self) -> &TableName {
        &self.table
    }

    const SELECT_COLUMNS: &'static str = "id, latitude, longitude, temperature, windspeed, \
         winddirection, weathercode, CAST(timestamp AS TEXT) AS timestamp";

    fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, ApplicationError> {
        NaiveDateTime::parse_from_str(s, SQLITE_TIMESTAMP_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(|e| ApplicationError::Storage(format!("Invalid timestamp '{s}': {e}")))
    }

    fn format_timestamp(ts: DateTime<Utc>) -> String {
        ts.format(SQLITE_TIMESTAMP_FORMAT).to_string()
    }
}

#[async_trait]
impl WeatherRecordStore for SqliteWeatherRecordStore {
    #[instrument(skip(self), fields(table = %self.table))]
    async fn ensure_table(&self) -> Result<(), ApplicationError> {
        let table = self.table.quoted();
        let index = self.table.index_name();

        sqlx::query(&format!(
            r"
            CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                latitude REAL NOT NULL,
                longitude REAL NOT NULL,
                temperature REAL NOT NULL,
                windspeed REAL NOT NULL,
                winddirection REAL NOT NULL,
                weathercode INTEGER NOT NULL,
                timestamp TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "
        ))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS {index} ON {table} (timestamp)"
        ))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!("Weather table ensured");
        Ok(())
    }

    #[instrument(skip(self, record), fields(table = %self.table))]
    async fn insert(
        &self,
        record: &WeatherRecord,
    ) -> Result<StoredWeatherRecord, ApplicationError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let (id, raw_timestamp): (i64, String) = sqlx::query_as(&format!(
            r"
            INSERT INTO {} (latitude, longitude, temperature, windspeed, winddirection, weathercode)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, CAST(timestamp AS TEXT)
            ",
            self.table.quoted()
        ))
        .bind(record.latitude())
        .bind(record.longitude())
        .bind(record.temperature())
        .bind(record.windspeed())
        .bind(record.winddirection())
        .bind(record.weathercode())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        // Dropping the transaction rolls the row back
        let timestamp = Self::parse_timestamp(&raw_timestamp).map_err(|e| {
            ApplicationError::Configuration(format!(
                "table {} has an incompatible timestamp column: {e}",
                self.table
            ))
        })?;

        tx.commit().await.map_err(map_sqlx_error)?;
        debug!(id, timestamp = %raw_timestamp, "Weather record inserted");

        Ok(StoredWeatherRecord {
            id,
            record: *record,
            timestamp,
        })
    }

    #[instrument(skip(self), fields(table = %self.table))]
    async fn find_by_timestamp(
        &self,
        timestamp: DateTime<Utc>,
    ) -> Result<Vec<StoredWeatherRecord>, ApplicationError> {
        let rows: Vec<WeatherRow> = sqlx::query_as(&format!(
            "SELECT {} FROM {} WHERE timestamp = $1 ORDER BY id",
            Self::SELECT_COLUMNS,
            self.table.quoted()
        ))
        .bind(Self::format_timestamp(timestamp))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(WeatherRow::into_stored).collect()
    }

    #[instrument(skip(self), fields(table = %self.table))]
    async fn recent(&self, limit: u32) -> Result<Vec<StoredWeatherRecord>, ApplicationError> {
        let rows: Vec<WeatherRow> = sqlx::query_as(&format!(
            "SELECT {} FROM {} ORDER BY id DESC LIMIT $1",
            Self::SELECT_COLUMNS,
            self.table.quoted()
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(WeatherRow::into_stored).collect()
    }

    #[instrument(skip(self), fields(table = %self.table))]
    async fn count(&self) -> Result<u64, ApplicationError> {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", self.table.quoted()))
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        u64::try_from(count)
            .map_err(|_| ApplicationError::Storage(format!("Negative row count: {count}")))
    }
}

/// Row type for weather record queries
#[derive(sqlx::FromRow)]
struct WeatherRow {
    id: i64,
    latitude: f64,
    longitude: f64,
    temperature: f64,
    windspeed: f64,
    winddirection: f64,
    weathercode: i64,
    timestamp: String,
}

impl WeatherRow {
    fn into_stored(self) -> Result<StoredWeatherRecord, ApplicationError> {
        let id = self.id;
        let corrupt = |reason: String| {
            ApplicationError::Storage(format!("Corrupt weather row {id}: {reason}"))
        };

        let location = GeoLocation::new(self.latitude, self.longitude)
            .map_err(|e| corrupt(e.to_string()))?;
        let record = WeatherRecord::new(
            location,
            self.temperature,
            self.windspeed,
            self.winddirection,
            self.weathercode,
        )
        .map_err(|e| corrupt(e.to_string()))?;

        Ok(StoredWeatherRecord {
            id,
            record,
            timestamp: SqliteWeatherRecordStore::parse_timestamp(&self.timestamp)?,
        })
    }
}
