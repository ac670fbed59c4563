//! Error types for thermal coupling.

use px_core::PxError;
use px_core::ids::SubdomainId;
use px_fluids::FluidError;
use px_flux::FluxError;
use thiserror::Error;

/// Result type for thermal coupling operations.
pub type ThermalResult<T> = Result<T, ThermalError>;

/// Errors that can occur while evaluating thermal interface terms.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ThermalError {
    /// Element belongs to neither side of the interface.
    #[error("Subdomain {subdomain} is on neither side of interface '{interface}'")]
    UnknownSubdomain {
        interface: String,
        subdomain: SubdomainId,
    },

    /// Subdomain listed on both sides.
    #[error("Subdomain {subdomain} is listed as both fluid and solid on interface '{interface}'")]
    OverlappingSubdomains {
        interface: String,
        subdomain: SubdomainId,
    },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Flux error: {0}")]
    Flux(#[from] FluxError),

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),
}

impl From<ThermalError> for PxError {
    fn from(e: ThermalError) -> Self {
        match e {
            ThermalError::Flux(inner) => inner.into(),
            ThermalError::Fluid(inner) => inner.into(),
            ThermalError::InvalidArg { what } => PxError::InvalidArg { what },
            other => PxError::Invariant {
                what: other.to_string(),
            },
        }
    }
}
