//! Domain layer for the weather pipeline
//!
//! Contains the weather record entity, the location value object and domain errors.
//! This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
