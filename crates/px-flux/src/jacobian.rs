//! Finite difference Jacobians of maps between conserved states.

use crate::error::RiemannResult;
use crate::state::{FluxJacobian, FluxVector, NVARS};

/// Relative step used when the ghost map has no closed-form derivative.
pub const DEFAULT_RELATIVE_STEP: f64 = 1e-6;

/// Central difference Jacobian of `f` at `x`.
///
/// Column j uses the step `epsilon * max(|x[j]|, 1)`.
pub fn central_difference_jacobian<F>(
    x: &FluxVector,
    f: F,
    epsilon: f64,
) -> RiemannResult<FluxJacobian>
where
    F: Fn(&FluxVector) -> RiemannResult<FluxVector>,
{
    let mut jac = FluxJacobian::zeros();

    for j in 0..NVARS {
        let dx = epsilon * x[j].abs().max(1.0);

        let mut x_plus = *x;
        x_plus[j] += dx;
        let f_plus = f(&x_plus)?;

        let mut x_minus = *x;
        x_minus[j] -= dx;
        let f_minus = f(&x_minus)?;

        jac.set_column(j, &((f_plus - f_minus) / (2.0 * dx)));
    }

    Ok(jac)
}
