//! Essential energy condition tying the fluid energy to a wall temperature.

use std::sync::Arc;

use px_fluids::EquationOfState;
use px_flux::{ConservedState, FluxVector};

use crate::error::ThermalResult;

/// Residual of ρE = ρ c_v T_wall + ½|m|²/ρ and its derivatives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchResidual {
    pub value: f64,
    /// ∂value/∂(ρ, ρu, ρv, ρw, ρE)
    pub d_state: FluxVector,
    pub d_wall_temperature: f64,
}

/// Thermal match condition for the total-energy variable at a wall.
#[derive(Clone)]
pub struct ThermalMatchCondition {
    eos: Arc<dyn EquationOfState>,
}

impl std::fmt::Debug for ThermalMatchCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThermalMatchCondition")
            .field("eos", &self.eos.name())
            .finish()
    }
}

impl ThermalMatchCondition {
    pub fn new(eos: Arc<dyn EquationOfState>) -> Self {
        Self { eos }
    }

    /// c_v is evaluated at the current state and held fixed in the derivatives.
    pub fn residual(&self, state: &ConservedState, wall_temperature: f64) -> ThermalResult<MatchResidual> {
        state.validate()?;
        let cv = self
            .eos
            .cv(state.specific_volume(), state.specific_internal_energy())?;
        let rho = state.rho;
        let m = state.momentum;
        let kinetic = state.kinetic_energy_density();
        let u = m / rho;
        Ok(MatchResidual {
            value: state.total_energy - rho * cv * wall_temperature - kinetic,
            d_state: FluxVector::new(
                -cv * wall_temperature + kinetic / rho,
                -u.x,
                -u.y,
                -u.z,
                1.0,
            ),
            d_wall_temperature: -rho * cv,
        })
    }
}
