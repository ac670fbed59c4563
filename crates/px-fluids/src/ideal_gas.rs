//! Calorically perfect ideal gas.

use crate::error::{FluidError, FluidResult};
use crate::model::validation::{validate_finite, validate_positive, validate_specific_volume};
use crate::model::{EquationOfState, PRESSURE_FLOOR, PressureDerivatives, SOUND_SPEED_SQ_FLOOR};
use px_core::constants::R_DRY_AIR;

/// Ideal gas with constant γ, R and transport properties.
///
/// ```text
/// p = max(1e-8, (γ - 1) u / v)
/// T = p v / R
/// c = sqrt(max(1e-8, γ R T))
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IdealGas {
    gamma: f64,
    r: f64,
    cv: f64,
    cp: f64,
    mu: f64,
    k: f64,
    beta: f64,
}

impl IdealGas {
    /// Create an ideal gas from the heat capacity ratio and specific gas constant.
    pub fn new(gamma: f64, r: f64) -> FluidResult<Self> {
        if !gamma.is_finite() || gamma <= 1.0 {
            return Err(FluidError::InvalidArg {
                what: format!("gamma must be > 1 and finite (got {gamma})"),
            });
        }
        validate_positive(r, "gas constant")?;
        let cv = r / (gamma - 1.0);
        Ok(Self {
            gamma,
            r,
            cv,
            cp: gamma * cv,
            mu: 0.0,
            k: 0.0,
            beta: 0.0,
        })
    }

    /// Dry air at 300 K: γ = 1.4, R = 287.058 J/(kg·K).
    pub fn air() -> Self {
        let gamma = 1.4;
        let cv = R_DRY_AIR / (gamma - 1.0);
        Self {
            gamma,
            r: R_DRY_AIR,
            cv,
            cp: gamma * cv,
            mu: 1.846e-5,
            k: 0.02624,
            beta: 0.0,
        }
    }

    /// Set dynamic viscosity [Pa·s] and thermal conductivity [W/(m·K)].
    pub fn with_transport(mut self, mu: f64, k: f64) -> FluidResult<Self> {
        if !mu.is_finite() || mu < 0.0 {
            return Err(FluidError::InvalidArg {
                what: format!("viscosity must be >= 0 (got {mu})"),
            });
        }
        if !k.is_finite() || k < 0.0 {
            return Err(FluidError::InvalidArg {
                what: format!("conductivity must be >= 0 (got {k})"),
            });
        }
        self.mu = mu;
        self.k = k;
        Ok(self)
    }

    /// Set the coefficient of thermal expansion.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn gas_constant(&self) -> f64 {
        self.r
    }

    fn raw_pressure(&self, v: f64, u: f64) -> FluidResult<f64> {
        validate_specific_volume(v)?;
        validate_finite(u, "specific internal energy")?;
        Ok((self.gamma - 1.0) * u / v)
    }
}

impl EquationOfState for IdealGas {
    fn name(&self) -> &'static str {
        "IdealGas"
    }

    fn pressure(&self, v: f64, u: f64) -> FluidResult<f64> {
        Ok(PRESSURE_FLOOR.max(self.raw_pressure(v, u)?))
    }

    fn temperature(&self, v: f64, u: f64) -> FluidResult<f64> {
        Ok(self.pressure(v, u)? * v / self.r)
    }

    fn sound_speed(&self, v: f64, u: f64) -> FluidResult<f64> {
        let t = self.temperature(v, u)?;
        Ok(SOUND_SPEED_SQ_FLOOR.max(self.gamma * self.r * t).sqrt())
    }

    fn cp(&self, _v: f64, _u: f64) -> FluidResult<f64> {
        Ok(self.cp)
    }

    fn cv(&self, _v: f64, _u: f64) -> FluidResult<f64> {
        Ok(self.cv)
    }

    fn gamma(&self, _v: f64, _u: f64) -> FluidResult<f64> {
        Ok(self.gamma)
    }

    fn mu(&self, _v: f64, _u: f64) -> FluidResult<f64> {
        Ok(self.mu)
    }

    fn k(&self, _v: f64, _u: f64) -> FluidResult<f64> {
        Ok(self.k)
    }

    fn beta(&self, _p: f64, _t: f64) -> FluidResult<f64> {
        Ok(self.beta)
    }

    /// Entropy relative to the reference state T = 1 K, v = 1 m³/kg.
    fn entropy(&self, v: f64, u: f64) -> FluidResult<f64> {
        let t = self.temperature(v, u)?;
        Ok(self.cv * t.ln() + self.r * v.ln())
    }

    fn gibbs(&self, v: f64, u: f64) -> FluidResult<f64> {
        let p = self.pressure(v, u)?;
        let t = self.temperature(v, u)?;
        let h = u + p * v;
        Ok(h - t * self.entropy(v, u)?)
    }

    fn dp_duv(&self, v: f64, u: f64) -> FluidResult<PressureDerivatives> {
        let raw = self.raw_pressure(v, u)?;
        let (p, dp_dv, dp_du) = if raw > PRESSURE_FLOOR {
            (raw, -raw / v, (self.gamma - 1.0) / v)
        } else {
            (PRESSURE_FLOOR, 0.0, 0.0)
        };
        Ok(PressureDerivatives {
            dp_dv,
            dp_du,
            dt_dv: (dp_dv * v + p) / self.r,
            dt_du: dp_du * v / self.r,
        })
    }

    fn rho_e_from_ps(&self, p: f64, s: f64) -> FluidResult<(f64, f64)> {
        validate_positive(p, "pressure")?;
        validate_finite(s, "entropy")?;
        let v = ((s - self.cv * (p / self.r).ln()) / self.cp).exp();
        Ok((1.0 / v, p * v / (self.gamma - 1.0)))
    }

    fn rho_from_pt(&self, p: f64, t: f64) -> FluidResult<f64> {
        validate_positive(p, "pressure")?;
        validate_positive(t, "temperature")?;
        Ok(p / (self.r * t))
    }

    fn rho_e_from_pt(&self, p: f64, t: f64) -> FluidResult<(f64, f64)> {
        Ok((self.rho_from_pt(p, t)?, self.cv * t))
    }

    fn e_from_p_rho(&self, p: f64, rho: f64) -> FluidResult<f64> {
        validate_positive(rho, "density")?;
        validate_finite(p, "pressure")?;
        Ok(p / ((self.gamma - 1.0) * rho))
    }

    fn h_from_pt(&self, _p: f64, t: f64) -> FluidResult<f64> {
        validate_positive(t, "temperature")?;
        Ok(self.cp * t)
    }

    fn p_from_h_s(&self, h: f64, s: f64) -> FluidResult<f64> {
        validate_positive(h, "enthalpy")?;
        validate_finite(s, "entropy")?;
        let t = h / self.cp;
        let v = ((s - self.cv * t.ln()) / self.r).exp();
        Ok(self.r * t / v)
    }

    /// Along an isentrope dp/dh = ρ.
    fn dpdh_from_h_s(&self, h: f64, s: f64) -> FluidResult<f64> {
        let p = self.p_from_h_s(h, s)?;
        Ok(p / (self.r * h / self.cp))
    }

    fn p_from_rho_t(&self, rho: f64, t: f64) -> FluidResult<f64> {
        validate_positive(rho, "density")?;
        validate_finite(t, "temperature")?;
        Ok(rho * self.r * t)
    }
}
