//! Crate error type.

use thiserror::Error;

use crate::models::{CallId, VehicleId};
use crate::validation::ValidationError;

/// Errors raised by simulation, decoding, and search.
#[derive(Debug, Error)]
pub enum EmsError {
    /// Genotype length does not match the codec's chromosome length.
    #[error("genotype has {actual} genes, expected {expected}")]
    GenotypeLength { expected: usize, actual: usize },

    /// A gene is non-finite or outside [0, 1].
    #[error("gene {index} = {value} is outside [0, 1]")]
    GeneOutOfRange { index: usize, value: f64 },

    /// Bookkeeping referenced a call that is not part of the run.
    #[error("unknown call id {0}")]
    UnknownCall(CallId),

    /// Bookkeeping referenced a vehicle that is not part of the run.
    #[error("unknown vehicle id {0}")]
    UnknownVehicle(VehicleId),

    /// A dispatch policy committed an empty vehicle set to a call.
    #[error("dispatch policy assigned no vehicles to call {0}")]
    EmptyAssignment(CallId),

    /// Simulation window with `start >= end` or a negative warm-up buffer.
    #[error("invalid simulation window: start={start}, end={end}, warmup={warmup}")]
    InvalidWindow { start: f64, end: f64, warmup: f64 },

    /// Configuration rejected before use.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Structural input checks failed.
    #[error("input validation failed with {} error(s)", .0.len())]
    Validation(Vec<ValidationError>),
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, EmsError>;
