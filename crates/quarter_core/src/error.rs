//! Error types for integration and simulation.

use thiserror::Error;

/// Errors raised while configuring or running a simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Rejected before any stepping takes place.
    #[error("Invalid configuration: {what}")]
    Configuration { what: String },

    #[error("Dimension mismatch: state has {expected} components but {actual} derivatives were supplied")]
    DimensionMismatch { expected: usize, actual: usize },

    /// `step` is the zero-based index of the step that produced the non-finite value.
    #[error("Numerical divergence at step {step}: state slot {slot} became {value}")]
    NumericalDivergence { step: usize, slot: usize, value: f64 },
}

impl SimulationError {
    pub(crate) fn configuration(what: impl Into<String>) -> Self {
        Self::Configuration { what: what.into() }
    }
}

pub type SimulationResult<T> = Result<T, SimulationError>;
