//! Gray-body radiative exchange with a uniform environment.

use std::sync::Arc;

use px_core::constants::STEFAN_BOLTZMANN;
use px_core::numeric::Vec3;

use crate::error::{ThermalError, ThermalResult};
use crate::function::ScalarFunction;

/// Ambient temperature used when none is configured [K].
pub const DEFAULT_AMBIENT_TEMPERATURE: f64 = 300.0;

/// Temperature of the radiation environment.
#[derive(Clone, Debug)]
pub enum RadiationTemperature {
    Constant(f64),
    Varying(Arc<dyn ScalarFunction>),
}

impl Default for RadiationTemperature {
    fn default() -> Self {
        Self::Constant(DEFAULT_AMBIENT_TEMPERATURE)
    }
}

impl RadiationTemperature {
    pub fn at(&self, time: f64, position: &Vec3) -> f64 {
        match self {
            Self::Constant(t) => *t,
            Self::Varying(f) => f.value(time, position),
        }
    }
}

/// Net radiative heat flux leaving a surface and its derivative with respect
/// to the surface temperature.
///
/// ```text
/// q = ε σ (T⁴ - T_env⁴),  dq/dT = 4 ε σ T³
/// ```
pub fn radiative_loss(emissivity: f64, temperature: f64, environment: f64) -> (f64, f64) {
    let es = emissivity * STEFAN_BOLTZMANN;
    (
        es * (temperature.powi(4) - environment.powi(4)),
        4.0 * es * temperature.powi(3),
    )
}

pub fn validate_emissivity(emissivity: f64) -> ThermalResult<()> {
    if !(0.0..=1.0).contains(&emissivity) {
        return Err(ThermalError::InvalidArg {
            what: format!("emissivity must lie in [0, 1] (got {emissivity})"),
        });
    }
    Ok(())
}

/// Radiating boundary of a solid temperature field.
#[derive(Clone, Debug)]
pub struct RadiationBoundary {
    emissivity: f64,
    environment: RadiationTemperature,
}

impl RadiationBoundary {
    pub fn new(emissivity: f64, environment: RadiationTemperature) -> ThermalResult<Self> {
        validate_emissivity(emissivity)?;
        Ok(Self {
            emissivity,
            environment,
        })
    }

    /// Residual contribution and its derivative with respect to `temperature`.
    pub fn residual(&self, temperature: f64, time: f64, position: &Vec3) -> (f64, f64) {
        radiative_loss(
            self.emissivity,
            temperature,
            self.environment.at(time, position),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::PiecewiseLinear;

    #[test]
    fn equilibrium_has_no_loss() {
        let (q, dq) = radiative_loss(0.8, 300.0, 300.0);
        assert_eq!(q, 0.0);
        assert!((dq - 4.0 * 0.8 * STEFAN_BOLTZMANN * 2.7e7).abs() < 1e-9);
    }

    #[test]
    fn black_body_at_1000k() {
        let (q, _) = radiative_loss(1.0, 1000.0, 0.0);
        assert!((q - 56703.67).abs() < 1e-6);
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let h = 1e-3;
        let (qp, _) = radiative_loss(0.6, 500.0 + h, 290.0);
        let (qm, _) = radiative_loss(0.6, 500.0 - h, 290.0);
        let (_, dq) = radiative_loss(0.6, 500.0, 290.0);
        assert!(((qp - qm) / (2.0 * h) - dq).abs() < 1e-6);
    }

    #[test]
    fn boundary_uses_time_varying_environment() {
        let env = PiecewiseLinear::new(vec![0.0, 100.0], vec![300.0, 400.0]).unwrap();
        let bc = RadiationBoundary::new(1.0, RadiationTemperature::Varying(Arc::new(env))).unwrap();
        let (q, _) = bc.residual(400.0, 100.0, &Vec3::zeros());
        assert_eq!(q, 0.0);
        let (q, _) = bc.residual(400.0, 0.0, &Vec3::zeros());
        assert!(q > 0.0);
    }

    #[test]
    fn emissivity_bounds() {
        assert!(RadiationBoundary::new(1.2, RadiationTemperature::default()).is_err());
        assert!(RadiationBoundary::new(-0.1, RadiationTemperature::default()).is_err());
        assert!(RadiationBoundary::new(0.0, RadiationTemperature::default()).is_ok());
    }
}
