//! Equation-of-state errors.

use px_core::PxError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur during equation-of-state evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical input (zero/negative specific volume, non-finite value, ...).
    #[error("Non-physical value for {what}: {value}")]
    NonPhysical { what: &'static str, value: f64 },

    /// Table lookup below the first tabulated key.
    #[error("Exceeded lower bound of tabulated data: {column} = {value} < {min}")]
    BelowTableRange {
        column: &'static str,
        value: f64,
        min: f64,
    },

    /// Table lookup above the last tabulated key.
    #[error("Exceeded upper bound of tabulated data: {column} = {value} > {max}")]
    AboveTableRange {
        column: &'static str,
        value: f64,
        max: f64,
    },

    /// Malformed table or model parameters.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    /// Operation the model deliberately does not provide.
    #[error("{model}: {what}() not implemented")]
    NotImplemented {
        model: &'static str,
        what: &'static str,
    },
}

impl FluidError {
    /// True for either table-range violation.
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            FluidError::BelowTableRange { .. } | FluidError::AboveTableRange { .. }
        )
    }
}

impl From<FluidError> for PxError {
    fn from(err: FluidError) -> Self {
        match err {
            FluidError::NonPhysical { what, value } => PxError::Invariant {
                what: format!("Non-physical fluid value: {what} = {value}"),
            },
            e @ (FluidError::BelowTableRange { .. } | FluidError::AboveTableRange { .. }) => {
                PxError::InvalidArg {
                    what: format!("Fluid value out of range: {e}"),
                }
            }
            FluidError::InvalidArg { what } => PxError::InvalidArg {
                what: format!("Invalid fluid argument: {what}"),
            },
            FluidError::NotImplemented { model, what } => PxError::NotImplemented {
                what: format!("{model}::{what}"),
            },
        }
    }
}
