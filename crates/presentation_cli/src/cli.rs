//! Command-line definition

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Weather ETL
#[derive(Debug, Parser)]
#[command(name = "weather-etl")]
#[command(author, version, about = "Fetch current weather, flatten it and store it", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (default: ./config.toml if present)
    #[arg(short, long, env = "WEATHER_ETL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Latitude to fetch, overrides weather.location
    #[arg(long, allow_negative_numbers = true, global = true)]
    pub latitude: Option<f64>,

    /// Longitude to fetch, overrides weather.location
    #[arg(long, allow_negative_numbers = true, global = true)]
    pub longitude: Option<f64>,

    /// sqlx database URL, overrides database.url
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch the raw current-weather response and print it
    Extract,

    /// Flatten a raw response into a weather record
    ///
    /// Example: weather-etl extract | weather-etl transform
    Transform {
        /// Raw response JSON file (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Append a weather record to the database
    ///
    /// Example: weather-etl extract | weather-etl transform | weather-etl load
    Load {
        /// Weather record JSON file (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Run extract, transform and load once
    Run,

    /// Create the weather table if it does not exist
    InitDb,

    /// Print the most recently stored records
    History {
        /// Number of records to print
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },

    /// Print the effective configuration as TOML
    Config,
}

/// Determine log filter level from verbosity count
///
/// Without `-v` the configured filter applies.
pub const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}
