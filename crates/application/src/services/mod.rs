//! Application services - Use case implementations

mod pipeline_service;
pub mod transformer;

pub use pipeline_service::{PipelineError, PipelineReport, PipelineService, PipelineStage};
pub use transformer::transform;
