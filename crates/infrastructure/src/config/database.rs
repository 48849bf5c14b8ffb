//! Database (SQLite) configuration.

use std::time::Duration;

use application::error::ApplicationError;
use serde::{Deserialize, Serialize};

use super::default_true;
use crate::persistence::{AsyncDatabaseConfig, TableName};

/// SQLite database configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection URL (e.g. "sqlite:weather.db")
    #[serde(default = "default_db_url")]
    pub url: String,

    /// Table the loader appends to
    #[serde(default = "default_table")]
    pub table: String,

    /// Maximum number of concurrent database connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Seconds to wait for a connection before the load step fails
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    /// Use write-ahead logging for file databases (default: true)
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

fn default_db_url() -> String {
    "sqlite:weather.db".to_string()
}

fn default_table() -> String {
    "weather_data".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

const fn default_acquire_timeout() -> u64 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
            table: default_table(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            wal_mode: true,
        }
    }
}

impl DatabaseConfig {
    /// Pool settings for [`crate::persistence::AsyncDatabase`]
    #[must_use]
    pub fn to_async_config(&self) -> AsyncDatabaseConfig {
        AsyncDatabaseConfig {
            url: self.url.clone(),
            max_connections: self.max_connections,
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
            wal_mode: self.wal_mode,
        }
    }

    /// Validated destination table
    pub fn table_name(&self) -> Result<TableName, ApplicationError> {
        TableName::new(self.table.as_str())
    }
}
