//! Async database connection using sqlx
//!
//! Provides the SQLite connection pool shared by all stores. Connection
//! settings (WAL, busy timeout) are applied per connection through
//! `SqliteConnectOptions` so they also hold for lazily opened pools.

use std::{path::Path, str::FromStr, time::Duration};

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
};
use tracing::{debug, info, instrument};

/// Error type for async database operations
#[derive(Debug, thiserror::Error)]
pub enum AsyncDatabaseError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Configuration for async database connection
#[derive(Debug, Clone)]
pub struct AsyncDatabaseConfig {
    /// Database URL (e.g., "sqlite:data.db" or "sqlite::memory:")
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// How long to wait for a connection before failing
    pub acquire_timeout: Duration,
    /// Enable WAL mode for better concurrency
    pub wal_mode: bool,
}

impl Default for AsyncDatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:weather.db".to_string(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
            wal_mode: true,
        }
    }
}

impl AsyncDatabaseConfig {
    /// Create an in-memory database configuration for testing
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1, // every in-memory connection is a separate database
            wal_mode: false,    // Not supported for in-memory
            ..Default::default()
        }
    }

    /// Create a file-based database configuration
    #[must_use]
    pub fn file(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().display().to_string();
        Self {
            url: format!("sqlite:{path_str}"),
            ..Default::default()
        }
    }

    fn is_memory(&self) -> bool {
        self.url.contains(":memory:")
    }

    fn connect_options(&self) -> Result<SqliteConnectOptions, AsyncDatabaseError> {
        if !self.url.starts_with("sqlite:") {
            return Err(AsyncDatabaseError::Config(format!(
                "unsupported database url {}: expected a sqlite: url",
                self.url
            )));
        }

        let mut options = SqliteConnectOptions::from_str(&self.url)
            .map_err(|e| AsyncDatabaseError::Config(format!("invalid url {}: {e}", self.url)))?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));

        if self.wal_mode && !self.is_memory() {
            options = options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);
        }

        Ok(options)
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout);

        if self.is_memory() {
            // Dropping the only connection would drop the database with it
            options.idle_timeout(None).max_lifetime(None)
        } else {
            options
        }
    }
}

/// Async database connection pool
#[derive(Debug, Clone)]
pub struct AsyncDatabase {
    pool: SqlitePool,
}

impl AsyncDatabase {
    /// Create a pool and open a first connection immediately
    #[instrument(skip_all, fields(url = %config.url))]
    pub async fn new(config: &AsyncDatabaseConfig) -> Result<Self, AsyncDatabaseError> {
        let pool = config
            .pool_options()
            .connect_with(config.connect_options()?)
            .await?;

        info!(
            max_connections = config.max_connections,
            "Async database pool created"
        );

        Ok(Self { pool })
    }

    /// Create a pool without connecting
    ///
    /// The first query opens the connection, so an unreachable database is
    /// reported by that query rather than here.
    #[instrument(skip_all, fields(url = %config.url))]
    pub fn connect_lazy(config: &AsyncDatabaseConfig) -> Result<Self, AsyncDatabaseError> {
        let pool = config
            .pool_options()
            .connect_lazy_with(config.connect_options()?);

        debug!("Lazy database pool created");
        Ok(Self { pool })
    }

    /// Create an in-memory database for testing
    pub async fn in_memory() -> Result<Self, AsyncDatabaseError> {
        Self::new(&AsyncDatabaseConfig::in_memory()).await
    }

    /// Get the underlying pool for raw queries
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close all connections in the pool
    pub async fn close(&self) {
        self.pool.close().await;
        debug!("Database pool closed");
    }
}
