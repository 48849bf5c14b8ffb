//! Subcommand execution
//!
//! Every command prints JSON (or TOML for `config`) on stdout; logs go to
//! stderr.

use std::{path::Path, sync::Arc};

use anyhow::{Context as _, Result};
use application::{
    ApplicationError, PipelineError, PipelineService, RawWeatherPayload, WeatherRecordStore,
    WeatherSourcePort, transform,
};
use domain::{GeoLocation, WeatherRecord};
use infrastructure::{AppConfig, AsyncDatabase, SqliteWeatherRecordStore, WeatherAdapter};
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use crate::cli::Commands;

/// `EX_TEMPFAIL` from sysexits.h: the orchestrator may retry
pub const EXIT_RETRYABLE: u8 = 75;

/// Exit status for any other failure
pub const EXIT_FAILURE: u8 = 1;

/// Exit status for a failed command
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    let retryable = err.chain().any(|cause| {
        cause
            .downcast_ref::<PipelineError>()
            .map(PipelineError::is_retryable)
            .or_else(|| {
                cause
                    .downcast_ref::<ApplicationError>()
                    .map(ApplicationError::is_retryable)
            })
            .unwrap_or(false)
    });

    if retryable { EXIT_RETRYABLE } else { EXIT_FAILURE }
}

/// Wiring from configuration to adapters
struct Context {
    config: AppConfig,
}

impl Context {
    fn location(&self) -> Result<GeoLocation> {
        self.config
            .weather
            .location
            .to_geo_location()
            .context("invalid weather.location")
    }

    fn database(&self) -> Result<AsyncDatabase> {
        AsyncDatabase::connect_lazy(&self.config.database.to_async_config())
            .context("invalid database configuration")
    }

    fn store(&self, db: &AsyncDatabase) -> Result<Arc<SqliteWeatherRecordStore>> {
        let table = self.config.database.table_name()?;
        Ok(Arc::new(SqliteWeatherRecordStore::with_table(
            db.pool().clone(),
            table,
        )))
    }

    fn source(&self) -> Result<WeatherAdapter> {
        Ok(WeatherAdapter::with_config(
            self.config.weather.to_client_config(),
        )?)
    }

    fn pipeline(&self, db: &AsyncDatabase) -> Result<PipelineService> {
        Ok(PipelineService::new(
            Arc::new(self.source()?),
            self.store(db)?,
        ))
    }
}

/// Execute `command` against `config`
pub async fn execute(command: Commands, config: AppConfig) -> Result<()> {
    let ctx = Context { config };

    match command {
        Commands::Extract => {
            let raw = ctx.source()?.fetch_current(&ctx.location()?).await?;
            print_json(&raw)?;
        },

        Commands::Transform { input } => {
            let text = read_input(input.as_deref()).await?;
            let raw: RawWeatherPayload =
                serde_json::from_str(&text).context("input is not valid JSON")?;
            let record = transform(&raw, ctx.location()?)?;
            print_json(&record)?;
        },

        Commands::Load { input } => {
            let text = read_input(input.as_deref()).await?;
            let record: WeatherRecord =
                serde_json::from_str(&text).context("input is not a valid weather record")?;
            let db = ctx.database()?;
            let stored = ctx.pipeline(&db)?.load(&record).await?;
            db.close().await;
            print_json(&stored)?;
        },

        Commands::Run => {
            let db = ctx.database()?;
            let report = ctx.pipeline(&db)?.run(ctx.location()?).await?;
            db.close().await;
            print_json(&report)?;
        },

        Commands::InitDb => {
            let db = ctx.database()?;
            let store = ctx.store(&db)?;
            store.ensure_table().await?;
            db.close().await;
            info!(table = %store.table(), "Database initialized");
            print_json(&serde_json::json!({ "table": store.table().as_str() }))?;
        },

        Commands::History { limit } => {
            let db = ctx.database()?;
            let store = ctx.store(&db)?;
            store.ensure_table().await?;
            let rows = store.recent(limit).await?;
            db.close().await;
            print_json(&rows)?;
        },

        Commands::Config => {
            let text = toml::to_string_pretty(&ctx.config)?;
            print!("{text}");
        },
    }

    Ok(())
}

/// Read a whole document from `path`, or stdin without one
async fn read_input(path: Option<&Path>) -> Result<String> {
    let text = match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("failed to read stdin")?;
            buf
        },
    };
    debug!(bytes = text.len(), "Input read");
    Ok(text)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
