//! Wall boundary fluxes: ghost construction folded into one Riemann solve.

use std::sync::Arc;

use px_core::numeric::Vec3;
use px_fluids::EquationOfState;

use crate::error::RiemannResult;
use crate::ghost::{BoundaryInputs, BoundaryKind, GhostStateBuilder};
use crate::hllc::HllcFlux;
use crate::state::{ConservedState, FluxResult};

/// HLLC flux between an interior state and the ghost state of a wall.
#[derive(Clone, Debug)]
pub struct BoundaryFlux {
    ghost: GhostStateBuilder,
    riemann: HllcFlux,
}

impl BoundaryFlux {
    pub fn new(kind: BoundaryKind, eos: Arc<dyn EquationOfState>) -> Self {
        Self {
            riemann: HllcFlux::new(Arc::clone(&eos)),
            ghost: GhostStateBuilder::new(kind, eos),
        }
    }

    pub fn kind(&self) -> &BoundaryKind {
        self.ghost.kind()
    }

    pub fn ghost(&self) -> &GhostStateBuilder {
        &self.ghost
    }

    /// Flux through the wall face.
    ///
    /// `jac_left` is the total derivative with respect to the interior state,
    /// J_L + J_R ∂G/∂U; `jac_right` stays the derivative with respect to the
    /// ghost state.
    pub fn boundary_flux(
        &self,
        interior: &ConservedState,
        normal: &Vec3,
        inputs: &BoundaryInputs<'_>,
    ) -> RiemannResult<FluxResult> {
        let ghost = self.ghost.build(interior, normal, inputs)?;
        let mut result = self.riemann.flux(interior, &ghost, normal)?;
        let d_ghost = self.ghost.jacobian(interior, normal, inputs)?;
        result.jac_left += result.jac_right * d_ghost;
        tracing::trace!(
            kind = %self.kind(),
            region = ?result.region,
            mass_flux = result.flux[0],
            "boundary flux"
        );
        result.ensure_finite()
    }
}
