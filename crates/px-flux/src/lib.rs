//! px-flux: numerical fluxes for the compressible Navier–Stokes system.
//!
//! Provides:
//! - `ConservedState`, `FaceGeometry`, `FluxResult`
//! - ghost states for mirror and thermally coupled walls
//! - the HLLC Riemann solver with analytic Jacobians
//! - wall boundary fluxes
//! - a per-thread flux cache and a parallel face sweep

pub mod assembly;
pub mod boundary;
pub mod cache;
pub mod error;
pub mod ghost;
pub mod hllc;
pub mod jacobian;
pub mod state;

pub use assembly::{FaceContribution, FaceStates, accumulate_residuals, sweep_faces};
pub use boundary::BoundaryFlux;
pub use cache::FluxCache;
pub use error::{FluxError, RiemannResult};
pub use ghost::{
    BoundaryInputs, BoundaryKind, GhostDensity, GhostStateBuilder, ResistiveLayer, WallMotion,
    ghost_jacobian, ghost_state, ghost_wall_temperature_derivative,
};
pub use hllc::{HllcFlux, RiemannSolver, WaveSpeeds, physical_flux};
pub use state::{
    ConservedState, FaceGeometry, FaceNeighbor, FluxJacobian, FluxRegion, FluxResult, FluxVector,
    NVARS,
};
