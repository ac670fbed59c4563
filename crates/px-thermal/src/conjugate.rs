//! Conjugate heat transfer through a Riemann solve against the solid wall.
//!
//! The fluid element sees the full HLLC boundary flux against a thermally
//! coupled ghost state driven by the solid's nodal temperatures. The solid
//! element receives the same energy flux with the opposite sign.

use std::sync::Arc;

use px_core::numeric::Vec3;
use px_fluids::EquationOfState;
use px_flux::{
    BoundaryFlux, BoundaryInputs, BoundaryKind, ConservedState, FaceGeometry, FluxCache,
    FluxJacobian, FluxResult, FluxVector,
};

use crate::error::{ThermalError, ThermalResult};

/// Contributions of one conjugate face to both sides.
#[derive(Clone, Debug, PartialEq)]
pub struct ConjugateResidual {
    pub fluid: FluxVector,
    /// ∂fluid/∂U_fluid
    pub fluid_jacobian: FluxJacobian,
    /// -energy flux
    pub solid: f64,
    /// ∂solid/∂U_fluid
    pub solid_d_fluid: FluxVector,
    /// ∂fluid/∂T_wall for a uniform shift of all nodal wall temperatures;
    /// divide by the node count for one node.
    pub fluid_d_wall_temperature: FluxVector,
    /// ∂solid/∂T_wall, same convention
    pub solid_d_wall_temperature: f64,
}

/// Fluid/solid interface closed by a thermal wall Riemann problem.
#[derive(Clone, Debug)]
pub struct ConjugateInterface {
    flux: BoundaryFlux,
}

impl ConjugateInterface {
    pub fn new(kind: BoundaryKind, eos: Arc<dyn EquationOfState>) -> ThermalResult<Self> {
        if !kind.is_thermal() {
            return Err(ThermalError::InvalidArg {
                what: format!("conjugate interface needs a thermal wall, got '{kind}'"),
            });
        }
        Ok(Self {
            flux: BoundaryFlux::new(kind, eos),
        })
    }

    pub fn boundary_flux(&self) -> &BoundaryFlux {
        &self.flux
    }

    /// Evaluate the face owned by the fluid element `face.elem`.
    ///
    /// The face normal points out of the fluid.
    pub fn evaluate(
        &self,
        thread: usize,
        face: &FaceGeometry,
        fluid: &ConservedState,
        inputs: &BoundaryInputs<'_>,
        cache: &FluxCache,
    ) -> ThermalResult<ConjugateResidual> {
        let mut key_inputs: Vec<f64> = fluid.to_vector().iter().copied().collect();
        key_inputs.extend(face.normal.iter().copied());
        key_inputs.extend_from_slice(inputs.nodal_temperatures);
        key_inputs.push(inputs.solid_heat_flux);
        let result = cache.get_or_compute(thread, face.key(), &key_inputs, || {
            self.flux.boundary_flux(fluid, &face.normal, inputs)
        })?;
        let d_ghost = self
            .flux
            .ghost()
            .wall_temperature_derivative(fluid, &face.normal, inputs)?;
        Ok(split(result, &d_ghost))
    }

    /// Uncached evaluation.
    pub fn evaluate_at(
        &self,
        fluid: &ConservedState,
        normal: &Vec3,
        inputs: &BoundaryInputs<'_>,
    ) -> ThermalResult<ConjugateResidual> {
        let result = self.flux.boundary_flux(fluid, normal, inputs)?;
        let d_ghost = self
            .flux
            .ghost()
            .wall_temperature_derivative(fluid, normal, inputs)?;
        Ok(split(result, &d_ghost))
    }
}

/// `d_ghost` is ∂G/∂T_wall; the wall temperature reaches the flux only
/// through the ghost state.
fn split(result: FluxResult, d_ghost: &FluxVector) -> ConjugateResidual {
    let energy_row: FluxVector = result.jac_left.row(4).transpose();
    let fluid_d_wall_temperature = result.jac_right * d_ghost;
    ConjugateResidual {
        solid: -result.flux[4],
        solid_d_fluid: -energy_row,
        solid_d_wall_temperature: -fluid_d_wall_temperature[4],
        fluid_d_wall_temperature,
        fluid: result.flux,
        fluid_jacobian: result.jac_left,
    }
}
