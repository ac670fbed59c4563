//! Dry air with tabulated, pressure-independent properties.

use crate::error::{FluidError, FluidResult};
use crate::model::validation::{validate_positive, validate_specific_volume};
use crate::model::{EquationOfState, PRESSURE_FLOOR, SOUND_SPEED_SQ_FLOOR};
use crate::table::{Column, PropertyTable};
use px_core::constants::R_DRY_AIR;

// Dry air at atmospheric pressure, 175 K to 1900 K, with u = cv·T.
// Source: engineeringtoolbox.com "Dry Air Properties" (accessed 2017-07-06).
const U: [f64; 35] = [
    125160.0, 143080.0, 161010.0, 179000.0, 197092.5, 215340.0, 233740.0, 252385.0, 271312.5,
    290560.0, 330075.0, 371200.0, 413985.0, 458400.0, 504270.0, 551530.0, 599925.0, 649280.0,
    699550.0, 750420.0, 801990.0, 854000.0, 906255.0, 958980.0, 1011885.0, 1065000.0, 1118250.0,
    1171690.0, 1225125.0, 1278760.0, 1386150.0, 1493760.0, 1601740.0, 1709820.0, 1818110.0,
];
const T: [f64; 35] = [
    175.0, 200.0, 225.0, 250.0, 275.0, 300.0, 325.0, 350.0, 375.0, 400.0, 450.0, 500.0, 550.0,
    600.0, 650.0, 700.0, 750.0, 800.0, 850.0, 900.0, 950.0, 1000.0, 1050.0, 1100.0, 1150.0, 1200.0,
    1250.0, 1300.0, 1350.0, 1400.0, 1500.0, 1600.0, 1700.0, 1800.0, 1900.0,
];
const CP: [f64; 35] = [
    1002.3, 1002.5, 1002.7, 1003.1, 1003.8, 1004.9, 1006.3, 1008.2, 1010.6, 1013.5, 1020.6, 1029.5,
    1039.8, 1051.1, 1062.9, 1075.0, 1087.0, 1098.7, 1110.1, 1120.9, 1131.3, 1141.1, 1150.2, 1158.9,
    1167.0, 1174.6, 1181.7, 1188.4, 1194.6, 1200.5, 1211.2, 1220.7, 1229.3, 1237.0, 1244.0,
];
const CV: [f64; 35] = [
    715.2, 715.4, 715.6, 716.0, 716.7, 717.8, 719.2, 721.1, 723.5, 726.4, 733.5, 742.4, 752.7,
    764.0, 775.8, 787.9, 799.9, 811.6, 823.0, 833.8, 844.2, 854.0, 863.1, 871.8, 879.9, 887.5,
    894.6, 901.3, 907.5, 913.4, 924.1, 933.6, 942.2, 949.9, 956.9,
];
const GAMMA: [f64; 35] = [
    1.401, 1.401, 1.401, 1.401, 1.401, 1.4, 1.4, 1.398, 1.397, 1.395, 1.391, 1.387, 1.381, 1.376,
    1.37, 1.364, 1.359, 1.354, 1.349, 1.344, 1.34, 1.336, 1.333, 1.329, 1.326, 1.323, 1.321, 1.319,
    1.316, 1.314, 1.311, 1.308, 1.305, 1.302, 1.3,
];
const MU: [f64; 35] = [
    1.182e-5, 1.329e-5, 1.467e-5, 1.599e-5, 1.725e-5, 1.846e-5, 1.962e-5, 2.075e-5, 2.181e-5,
    2.286e-5, 2.485e-5, 2.670e-5, 2.849e-5, 3.017e-5, 3.178e-5, 3.332e-5, 3.482e-5, 3.624e-5,
    3.763e-5, 3.897e-5, 4.026e-5, 4.153e-5, 4.276e-5, 4.396e-5, 4.511e-5, 4.626e-5, 4.736e-5,
    4.846e-5, 4.952e-5, 5.057e-5, 5.264e-5, 5.457e-5, 5.646e-5, 5.829e-5, 6.008e-5,
];
const K: [f64; 35] = [
    0.01593, 0.01809, 0.0202, 0.02227, 0.02428, 0.02624, 0.02816, 0.03003, 0.03186, 0.03365,
    0.0371, 0.04041, 0.04357, 0.04661, 0.04954, 0.05236, 0.05509, 0.05774, 0.0603, 0.06276,
    0.0652, 0.06754, 0.06985, 0.07209, 0.07427, 0.0764, 0.07849, 0.08054, 0.08253, 0.0845,
    0.08831, 0.09199, 0.09554, 0.09899, 0.10233,
];
const P_OVER_RHO: [f64; 35] = [
    50189.16, 57375.08, 64565.01, 71779.0, 79034.0925, 86136.0, 93496.0, 100449.23, 107711.0625,
    114771.2, 129059.325, 143654.4, 157728.285, 172358.4, 186579.9, 200756.92, 215373.075,
    229845.12, 244142.95, 258144.48, 272676.6, 286944.0, 301782.915, 315504.42, 329874.51,
    343995.0, 358958.25, 373769.11, 387139.5, 401530.64, 431092.65, 460078.08, 488530.7,
    516365.64, 545433.0,
];

/// The built-in dry-air table.
pub fn dry_air_table() -> FluidResult<PropertyTable> {
    PropertyTable::new([
        U.to_vec(),
        T.to_vec(),
        CP.to_vec(),
        CV.to_vec(),
        GAMMA.to_vec(),
        MU.to_vec(),
        K.to_vec(),
        P_OVER_RHO.to_vec(),
    ])
}

/// Air whose T, cp, cv, γ, μ and k are tabulated against internal energy.
///
/// Pressure, sound speed, density and energy follow the ideal-gas law with
/// the tabulated γ. Entropy-based relations and derivatives are not
/// available and fail with [`FluidError::NotImplemented`].
#[derive(Debug, Clone)]
pub struct TabulatedAir {
    table: PropertyTable,
    r: f64,
    beta: f64,
}

impl TabulatedAir {
    /// Dry air with R = 287.058 J/(kg·K) and no thermal expansion.
    pub fn new() -> FluidResult<Self> {
        Self::with_table(dry_air_table()?)
    }

    /// Use a caller-supplied table.
    pub fn with_table(table: PropertyTable) -> FluidResult<Self> {
        tracing::warn!(
            rows = table.len(),
            "tabulated air: T, cp, cv, gamma, mu and k are pressure independent; \
             pressure, sound speed, density and energy follow the ideal gas law"
        );
        Ok(Self {
            table,
            r: R_DRY_AIR,
            beta: 0.0,
        })
    }

    pub fn with_gas_constant(mut self, r: f64) -> FluidResult<Self> {
        validate_positive(r, "gas constant")?;
        self.r = r;
        Ok(self)
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn table(&self) -> &PropertyTable {
        &self.table
    }

    fn by_energy(&self, u: f64, target: Column) -> FluidResult<f64> {
        self.table.interpolate(Column::InternalEnergy, u, target)
    }

    fn by_temperature(&self, t: f64, target: Column) -> FluidResult<f64> {
        self.table.interpolate(Column::Temperature, t, target)
    }
}

impl EquationOfState for TabulatedAir {
    fn name(&self) -> &'static str {
        "TabulatedAir"
    }

    fn pressure(&self, v: f64, u: f64) -> FluidResult<f64> {
        validate_specific_volume(v)?;
        let gamma = self.gamma(v, u)?;
        Ok(PRESSURE_FLOOR.max((gamma - 1.0) * u / v))
    }

    fn temperature(&self, _v: f64, u: f64) -> FluidResult<f64> {
        self.by_energy(u, Column::Temperature)
    }

    fn sound_speed(&self, v: f64, u: f64) -> FluidResult<f64> {
        let t = self.temperature(v, u)?;
        let gamma = self.gamma(v, u)?;
        Ok(SOUND_SPEED_SQ_FLOOR.max(gamma * self.r * t).sqrt())
    }

    fn cp(&self, _v: f64, u: f64) -> FluidResult<f64> {
        self.by_energy(u, Column::Cp)
    }

    fn cv(&self, _v: f64, u: f64) -> FluidResult<f64> {
        self.by_energy(u, Column::Cv)
    }

    fn gamma(&self, _v: f64, u: f64) -> FluidResult<f64> {
        self.by_energy(u, Column::Gamma)
    }

    fn mu(&self, _v: f64, u: f64) -> FluidResult<f64> {
        self.by_energy(u, Column::Viscosity)
    }

    fn k(&self, _v: f64, u: f64) -> FluidResult<f64> {
        self.by_energy(u, Column::Conductivity)
    }

    fn beta(&self, _p: f64, _t: f64) -> FluidResult<f64> {
        Ok(self.beta)
    }

    fn rho_from_pt(&self, p: f64, t: f64) -> FluidResult<f64> {
        let gamma = self.by_temperature(t, Column::Gamma)?;
        let cv = self.by_temperature(t, Column::Cv)?;
        if (gamma - 1.0) * p == 0.0 {
            return Err(FluidError::NonPhysical {
                what: "pressure or gamma in rho_from_pt",
                value: p,
            });
        }
        Ok(p / (gamma - 1.0) / cv / t)
    }

    fn e_from_p_rho(&self, p: f64, rho: f64) -> FluidResult<f64> {
        validate_positive(rho, "density")?;
        let gamma = self
            .table
            .interpolate(Column::PressureOverDensity, p / rho, Column::Gamma)?;
        Ok(p / (gamma - 1.0) / rho)
    }

    fn p_from_rho_t(&self, rho: f64, t: f64) -> FluidResult<f64> {
        validate_positive(rho, "density")?;
        Ok(rho * self.by_temperature(t, Column::PressureOverDensity)?)
    }
}
