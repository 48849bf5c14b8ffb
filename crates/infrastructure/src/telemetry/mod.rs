//! Logging setup
//!
//! Installs a `tracing-subscriber` registry writing to stderr, so stdout stays
//! reserved for the JSON the CLI prints.

mod subscriber;

pub use subscriber::{TelemetryConfig, TelemetryError, init_telemetry};
