//! Error types for flux and ghost-state evaluation.

use px_core::PxError;
use px_core::ids::FaceKey;
use px_fluids::FluidError;
use thiserror::Error;

/// Errors that can occur while evaluating a face flux.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluxError {
    #[error("Non-physical conserved state: {what} = {value}")]
    NonPhysicalState { what: &'static str, value: f64 },

    #[error("No coupled nodal temperatures on boundary face")]
    MissingBoundaryTemperature,

    #[error("Non-physical ghost temperature {t_ghost} K (fluid {t_fluid} K, wall {t_wall} K)")]
    NonPhysicalGhost {
        t_ghost: f64,
        t_fluid: f64,
        t_wall: f64,
    },

    #[error("Non-finite {what} on face")]
    NonFinite { what: &'static str },

    #[error("Flux cache has {slots} slots, thread index {thread} is out of range")]
    ThreadOutOfRange { thread: usize, slots: usize },

    #[error("Flux cache lock poisoned while evaluating {key}")]
    CachePoisoned { key: FaceKey },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),
}

pub type RiemannResult<T> = Result<T, FluxError>;

impl From<FluxError> for PxError {
    fn from(e: FluxError) -> Self {
        match e {
            FluxError::Fluid(inner) => inner.into(),
            FluxError::ThreadOutOfRange { thread, slots } => PxError::IndexOob {
                what: "flux cache slot",
                index: thread,
                len: slots,
            },
            FluxError::InvalidArg { what } => PxError::InvalidArg { what },
            other => PxError::Invariant {
                what: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fluid_errors_keep_their_message() {
        let err: FluxError = FluidError::NotImplemented {
            model: "TabulatedAir",
            what: "entropy",
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Fluid error: TabulatedAir: entropy() not implemented"
        );
    }

    #[test]
    fn converts_into_shared_error() {
        let err: PxError = FluxError::ThreadOutOfRange {
            thread: 9,
            slots: 4,
        }
        .into();
        assert!(matches!(err, PxError::IndexOob { index: 9, len: 4, .. }));
    }
}
