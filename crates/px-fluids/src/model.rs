//! Equation-of-state trait and validation helpers.

use crate::error::{FluidError, FluidResult};
use px_core::units::{
    Density, DynVisc, Pressure, SpecHeat, Temperature, ThermalCond, Velocity, j_per_kgk, k,
    kgpm3, mps, pa, pa_s, w_per_mk,
};

/// Lower bound applied to every pressure evaluated from (v, u).
///
/// Keeps strongly nonlinear transients from producing negative pressure. The
/// floor is applied unconditionally so results stay reproducible.
pub const PRESSURE_FLOOR: f64 = 1e-8;

/// Lower bound applied to the sound-speed radicand γ·R·T.
pub const SOUND_SPEED_SQ_FLOOR: f64 = 1e-8;

/// Partial derivatives of pressure and temperature with respect to specific
/// volume and specific internal energy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PressureDerivatives {
    pub dp_dv: f64,
    pub dp_du: f64,
    pub dt_dv: f64,
    pub dt_du: f64,
}

/// Properties of a single (v, u) state, batched into one call.
///
/// Used at the typed edge of the workspace (CLI, reports); the flux hot path
/// stays on raw `f64` through the trait methods.
#[derive(Clone, Debug)]
pub struct PropertyPack {
    pub p: Pressure,
    pub t: Temperature,
    pub rho: Density,
    pub c: Velocity,
    pub cp: SpecHeat,
    pub cv: SpecHeat,
    /// Heat capacity ratio γ = cp/cv (dimensionless)
    pub gamma: f64,
    pub mu: DynVisc,
    pub k: ThermalCond,
}

impl PropertyPack {
    /// Return a summary string of all contained properties (for debugging).
    pub fn summary(&self) -> String {
        format!(
            "Pack(P={:.1}Pa,T={:.2}K,ρ={:.4}kg/m³,c={:.2}m/s,cp={:.1}J/kg·K,cv={:.1}J/kg·K,γ={:.4},μ={:.3e}Pa·s,k={:.4}W/m·K)",
            self.p.value,
            self.t.value,
            self.rho.value,
            self.c.value,
            self.cp.value,
            self.cv.value,
            self.gamma,
            self.mu.value,
            self.k.value
        )
    }
}

fn not_implemented<T>(model: &'static str, what: &'static str) -> FluidResult<T> {
    Err(FluidError::NotImplemented { model, what })
}

/// Single-phase equation of state.
///
/// The primary inputs are specific volume `v` [m³/kg] and specific internal
/// energy `u` [J/kg]; the secondary family takes pressure and temperature.
/// Implementations must be thread-safe (Send + Sync): one instance is shared
/// by every worker of an assembly pass.
///
/// Methods a model cannot answer keep the default body, which fails with
/// [`FluidError::NotImplemented`] rather than returning a made-up number.
pub trait EquationOfState: Send + Sync {
    /// Model name (for errors and logging).
    fn name(&self) -> &'static str;

    /// Pressure [Pa], floored at [`PRESSURE_FLOOR`].
    fn pressure(&self, v: f64, u: f64) -> FluidResult<f64>;

    /// Temperature [K].
    fn temperature(&self, v: f64, u: f64) -> FluidResult<f64>;

    /// Speed of sound [m/s], radicand floored at [`SOUND_SPEED_SQ_FLOOR`].
    fn sound_speed(&self, v: f64, u: f64) -> FluidResult<f64>;

    /// Isobaric specific heat [J/(kg·K)].
    fn cp(&self, v: f64, u: f64) -> FluidResult<f64>;

    /// Isochoric specific heat [J/(kg·K)].
    fn cv(&self, v: f64, u: f64) -> FluidResult<f64>;

    /// Heat capacity ratio.
    fn gamma(&self, v: f64, u: f64) -> FluidResult<f64>;

    /// Dynamic viscosity [Pa·s].
    fn mu(&self, v: f64, u: f64) -> FluidResult<f64>;

    /// Thermal conductivity [W/(m·K)].
    fn k(&self, v: f64, u: f64) -> FluidResult<f64>;

    /// Coefficient of thermal expansion [1/K].
    fn beta(&self, p: f64, t: f64) -> FluidResult<f64>;

    /// Specific entropy [J/(kg·K)].
    fn entropy(&self, _v: f64, _u: f64) -> FluidResult<f64> {
        not_implemented(self.name(), "entropy")
    }

    /// Specific Gibbs free energy [J/kg].
    fn gibbs(&self, _v: f64, _u: f64) -> FluidResult<f64> {
        not_implemented(self.name(), "gibbs")
    }

    /// Derivatives of p and T with respect to v and u.
    fn dp_duv(&self, _v: f64, _u: f64) -> FluidResult<PressureDerivatives> {
        not_implemented(self.name(), "dp_duv")
    }

    /// Density and specific internal energy from pressure and entropy.
    fn rho_e_from_ps(&self, _p: f64, _s: f64) -> FluidResult<(f64, f64)> {
        not_implemented(self.name(), "rho_e_from_ps")
    }

    /// Density [kg/m³] from pressure and temperature.
    fn rho_from_pt(&self, _p: f64, _t: f64) -> FluidResult<f64> {
        not_implemented(self.name(), "rho_from_pt")
    }

    /// Density and specific internal energy from pressure and temperature.
    fn rho_e_from_pt(&self, _p: f64, _t: f64) -> FluidResult<(f64, f64)> {
        not_implemented(self.name(), "rho_e_from_pt")
    }

    /// Specific internal energy [J/kg] from pressure and density.
    fn e_from_p_rho(&self, _p: f64, _rho: f64) -> FluidResult<f64> {
        not_implemented(self.name(), "e_from_p_rho")
    }

    /// Specific enthalpy [J/kg] from pressure and temperature.
    fn h_from_pt(&self, _p: f64, _t: f64) -> FluidResult<f64> {
        not_implemented(self.name(), "h_from_pt")
    }

    /// Pressure from specific enthalpy and entropy.
    fn p_from_h_s(&self, _h: f64, _s: f64) -> FluidResult<f64> {
        not_implemented(self.name(), "p_from_h_s")
    }

    /// ∂p/∂h at constant entropy.
    fn dpdh_from_h_s(&self, _h: f64, _s: f64) -> FluidResult<f64> {
        not_implemented(self.name(), "dpdh_from_h_s")
    }

    /// Pressure [Pa] from density and temperature.
    fn p_from_rho_t(&self, _rho: f64, _t: f64) -> FluidResult<f64> {
        not_implemented(self.name(), "p_from_rho_t")
    }

    /// Compute every transport and thermodynamic property of (v, u) in one call.
    fn property_pack(&self, v: f64, u: f64) -> FluidResult<PropertyPack> {
        validation::validate_specific_volume(v)?;
        Ok(PropertyPack {
            p: pa(self.pressure(v, u)?),
            t: k(self.temperature(v, u)?),
            rho: kgpm3(1.0 / v),
            c: mps(self.sound_speed(v, u)?),
            cp: j_per_kgk(self.cp(v, u)?),
            cv: j_per_kgk(self.cv(v, u)?),
            gamma: self.gamma(v, u)?,
            mu: pa_s(self.mu(v, u)?),
            k: w_per_mk(self.k(v, u)?),
        })
    }
}

/// Validation helpers for equation-of-state inputs.
pub(crate) mod validation {
    use super::*;

    /// Specific volume must be strictly positive and finite.
    pub fn validate_specific_volume(v: f64) -> FluidResult<()> {
        if !v.is_finite() || v <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "specific volume",
                value: v,
            });
        }
        Ok(())
    }

    /// Generic positive-and-finite check.
    pub fn validate_positive(value: f64, what: &'static str) -> FluidResult<()> {
        if !value.is_finite() || value <= 0.0 {
            return Err(FluidError::NonPhysical { what, value });
        }
        Ok(())
    }

    /// Value may take any sign but must be finite.
    pub fn validate_finite(value: f64, what: &'static str) -> FluidResult<()> {
        if !value.is_finite() {
            return Err(FluidError::NonPhysical { what, value });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;

    #[test]
    fn validate_specific_volume_rejects_zero_and_negative() {
        assert!(validate_specific_volume(0.8).is_ok());
        assert!(validate_specific_volume(0.0).is_err());
        assert!(validate_specific_volume(-1.0).is_err());
        assert!(validate_specific_volume(f64::NAN).is_err());
        assert!(validate_specific_volume(f64::INFINITY).is_err());
    }

    #[test]
    fn validate_positive_and_finite() {
        assert!(validate_positive(300.0, "temperature").is_ok());
        assert!(validate_positive(-10.0, "temperature").is_err());
        assert!(validate_finite(-10.0, "internal energy").is_ok());
        assert!(validate_finite(f64::NAN, "internal energy").is_err());
    }
}
