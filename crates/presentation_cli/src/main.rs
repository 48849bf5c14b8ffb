//! Weather ETL CLI
//!
//! Runs the extract → transform → load pipeline, or any single step of it.
//! Exit status 0 on success, 75 when a retry may succeed, 1 otherwise.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;
mod commands;

use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;
use infrastructure::{AppConfig, init_telemetry};
use tracing::debug;

use crate::cli::{Cli, log_filter_from_verbosity};

/// Load configuration and apply command-line overrides
fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    if let Some(latitude) = cli.latitude {
        config.weather.location.latitude = latitude;
    }
    if let Some(longitude) = cli.longitude {
        config.weather.location.longitude = longitude;
    }
    if let Some(url) = &cli.database_url {
        config.database.url.clone_from(url);
    }
    if let Some(filter) = log_filter_from_verbosity(cli.verbose) {
        config.telemetry.log_filter = filter.to_string();
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    init_telemetry(&config.telemetry)?;
    debug!(command = ?cli.command, "Starting");

    commands::execute(cli.command, config).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(commands::exit_code_for(&e))
        },
    }
}
