//! Monotone piecewise-linear property table.

use crate::error::{FluidError, FluidResult};

/// Columns of a tabulated single-phase property set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// Specific internal energy [J/kg]
    InternalEnergy,
    /// Temperature [K]
    Temperature,
    /// Isobaric specific heat [J/(kg·K)]
    Cp,
    /// Isochoric specific heat [J/(kg·K)]
    Cv,
    /// Heat capacity ratio
    Gamma,
    /// Dynamic viscosity [Pa·s]
    Viscosity,
    /// Thermal conductivity [W/(m·K)]
    Conductivity,
    /// cv·T·(γ - 1), i.e. p/ρ for the ideal-gas closure [J/kg]
    PressureOverDensity,
}

impl Column {
    pub const ALL: [Column; 8] = [
        Column::InternalEnergy,
        Column::Temperature,
        Column::Cp,
        Column::Cv,
        Column::Gamma,
        Column::Viscosity,
        Column::Conductivity,
        Column::PressureOverDensity,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Short label used in errors.
    pub fn label(self) -> &'static str {
        match self {
            Column::InternalEnergy => "U",
            Column::Temperature => "T",
            Column::Cp => "Cp",
            Column::Cv => "Cv",
            Column::Gamma => "gamma",
            Column::Viscosity => "mu",
            Column::Conductivity => "k",
            Column::PressureOverDensity => "p/rho",
        }
    }

    /// Columns that lookups may be keyed on; these must be strictly increasing.
    pub fn is_key(self) -> bool {
        matches!(
            self,
            Column::InternalEnergy | Column::Temperature | Column::PressureOverDensity
        )
    }
}

/// Property table: eight equally long columns sorted by increasing internal
/// energy.
///
/// Lookups never extrapolate. A query below the first key or above the last
/// key fails with [`FluidError::BelowTableRange`] /
/// [`FluidError::AboveTableRange`].
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyTable {
    columns: [Vec<f64>; 8],
}

impl PropertyTable {
    /// Build a table, checking lengths, finiteness and key monotonicity.
    pub fn new(columns: [Vec<f64>; 8]) -> FluidResult<Self> {
        let len = columns[0].len();
        if len < 2 {
            return Err(FluidError::InvalidArg {
                what: format!("property table needs at least 2 rows (got {len})"),
            });
        }
        for col in Column::ALL {
            let data = &columns[col.index()];
            if data.len() != len {
                return Err(FluidError::InvalidArg {
                    what: format!(
                        "column {} has {} rows, expected {len}",
                        col.label(),
                        data.len()
                    ),
                });
            }
            if let Some(bad) = data.iter().find(|x| !x.is_finite()) {
                return Err(FluidError::InvalidArg {
                    what: format!("column {} contains non-finite value {bad}", col.label()),
                });
            }
            if col.is_key() && data.windows(2).any(|w| w[1] <= w[0]) {
                return Err(FluidError::InvalidArg {
                    what: format!("key column {} must be strictly increasing", col.label()),
                });
            }
        }
        Ok(Self { columns })
    }

    pub fn len(&self) -> usize {
        self.columns[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column(&self, col: Column) -> &[f64] {
        &self.columns[col.index()]
    }

    /// Interpolate `target` at the point where column `key` equals `value`.
    ///
    /// The bracket is the first row whose key is >= `value` and the row
    /// before it. Exact knot hits return the tabulated value unchanged; the
    /// first knot is inside the table.
    pub fn interpolate(&self, key: Column, value: f64, target: Column) -> FluidResult<f64> {
        debug_assert!(key.is_key(), "lookup keyed on non-monotone column");
        if !value.is_finite() {
            return Err(FluidError::NonPhysical {
                what: key.label(),
                value,
            });
        }

        let keys = self.column(key);
        let vals = self.column(target);
        let (min, max) = (keys[0], keys[keys.len() - 1]);
        if value < min {
            return Err(FluidError::BelowTableRange {
                column: key.label(),
                value,
                min,
            });
        }
        if value > max {
            return Err(FluidError::AboveTableRange {
                column: key.label(),
                value,
                max,
            });
        }

        let idx = keys.partition_point(|&x| x < value).max(1);
        if keys[idx] == value {
            return Ok(vals[idx]);
        }
        let (k0, k1) = (keys[idx - 1], keys[idx]);
        let (v0, v1) = (vals[idx - 1], vals[idx]);
        Ok(v0 + (v1 - v0) * (value - k0) / (k1 - k0))
    }
}
