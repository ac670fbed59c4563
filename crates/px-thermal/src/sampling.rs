//! Temperature of the fluid as an auxiliary output.

use px_fluids::EquationOfState;
use px_flux::ConservedState;
use rayon::prelude::*;

use crate::error::ThermalResult;

/// Temperature of one conserved state.
pub fn fluid_temperature(eos: &dyn EquationOfState, state: &ConservedState) -> ThermalResult<f64> {
    state.validate()?;
    Ok(state.temperature(eos)?)
}

/// Temperatures of many states, evaluated in parallel.
pub fn fluid_temperatures(
    eos: &dyn EquationOfState,
    states: &[ConservedState],
) -> ThermalResult<Vec<f64>> {
    states
        .par_iter()
        .map(|s| fluid_temperature(eos, s))
        .collect()
}
