//! Extract → transform → load pipeline
//!
//! Runs the three steps strictly in sequence. Each step runs only if the
//! previous one succeeded; the first failure ends the run.

use std::{fmt, sync::Arc, time::Instant};

use domain::{GeoLocation, StoredWeatherRecord, WeatherRecord};
use serde::Serialize;
use thiserror::Error;
use tracing::{Instrument, debug, info, info_span, instrument, warn};
use uuid::Uuid;

use crate::{
    error::ApplicationError,
    ports::{RawWeatherPayload, WeatherRecordStore, WeatherSourcePort},
    services::transformer,
};

/// Pipeline step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Extract,
    Transform,
    Load,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extract => write!(f, "extract"),
            Self::Transform => write!(f, "transform"),
            Self::Load => write!(f, "load"),
        }
    }
}

/// A failed run, tagged with the step that failed
#[derive(Debug, Error)]
#[error("{stage} step failed: {source}")]
pub struct PipelineError {
    pub stage: PipelineStage,
    #[source]
    pub source: ApplicationError,
}

impl PipelineError {
    fn at(stage: PipelineStage) -> impl FnOnce(ApplicationError) -> Self {
        move |source| Self { stage, source }
    }

    /// Whether re-running the pipeline may succeed
    pub const fn is_retryable(&self) -> bool {
        self.source.is_retryable()
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub location: GeoLocation,
    pub stored: StoredWeatherRecord,
    pub duration_ms: u64,
}

/// Service exposing extract, transform and load individually and as a run
#[derive(Clone)]
pub struct PipelineService {
    source: Arc<dyn WeatherSourcePort>,
    store: Arc<dyn WeatherRecordStore>,
}

impl fmt::Debug for PipelineService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineService").finish_non_exhaustive()
    }
}

impl PipelineService {
    /// Create a new pipeline service
    #[must_use]
    pub fn new(source: Arc<dyn WeatherSourcePort>, store: Arc<dyn WeatherRecordStore>) -> Self {
        Self { source, store }
    }

    /// Fetch the raw current-weather response for `location`
    #[instrument(skip(self), fields(location = %location))]
    pub async fn extract(
        &self,
        location: &GeoLocation,
    ) -> Result<RawWeatherPayload, ApplicationError> {
        let raw = self.source.fetch_current(location).await?;
        debug!("Extracted raw weather payload");
        Ok(raw)
    }

    /// Flatten a raw response into a record for `location`
    pub fn transform(
        &self,
        raw: &RawWeatherPayload,
        location: GeoLocation,
    ) -> Result<WeatherRecord, ApplicationError> {
        transformer::transform(raw, location)
    }

    /// Ensure the destination table exists, then append `record`
    #[instrument(skip_all)]
    pub async fn load(
        &self,
        record: &WeatherRecord,
    ) -> Result<StoredWeatherRecord, ApplicationError> {
        self.store.ensure_table().await?;
        let stored = self.store.insert(record).await?;
        debug!(id = stored.id, timestamp = %stored.timestamp, "Loaded weather record");
        Ok(stored)
    }

    /// Run extract → transform → load once for `location`
    ///
    /// # Errors
    ///
    /// Returns the first failing step together with its cause. Later steps
    /// are not attempted.
    pub async fn run(&self, location: GeoLocation) -> Result<PipelineReport, PipelineError> {
        let run_id = Uuid::now_v7();
        let span = info_span!("pipeline_run", %run_id, location = %location);

        async move {
            let started = Instant::now();
            info!("Pipeline run started");

            let result = self.run_steps(location).await;

            match result {
                Ok(stored) => {
                    let duration_ms =
                        u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                    info!(id = stored.id, duration_ms, "Pipeline run succeeded");
                    Ok(PipelineReport {
                        run_id,
                        location,
                        stored,
                        duration_ms,
                    })
                },
                Err(e) => {
                    warn!(stage = %e.stage, error = %e.source, "Pipeline run failed");
                    Err(e)
                },
            }
        }
        .instrument(span)
        .await
    }

    async fn run_steps(&self, location: GeoLocation) -> Result<StoredWeatherRecord, PipelineError> {
        let raw = self
            .extract(&location)
            .await
            .map_err(PipelineError::at(PipelineStage::Extract))?;

        let record = self
            .transform(&raw, location)
            .map_err(PipelineError::at(PipelineStage::Transform))?;

        self.load(&record)
            .await
            .map_err(PipelineError::at(PipelineStage::Load))
    }
}
