//! Case file schema.

use serde::{Deserialize, Serialize};

pub const DEFAULT_GAS_CONSTANT: f64 = 287.058;

fn default_gas_constant() -> f64 {
    DEFAULT_GAS_CONSTANT
}

fn is_zero(x: &f64) -> bool {
    *x == 0.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseFile {
    pub version: u32,
    pub name: String,
    pub fluid: FluidDef,
    #[serde(default)]
    pub boundaries: Vec<BoundaryDef>,
    #[serde(default)]
    pub interfaces: Vec<InterfaceDef>,
    /// Flux cache slots; defaults to the rayon pool size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FluidDef {
    IdealGas {
        gamma: f64,
        #[serde(default = "default_gas_constant")]
        gas_constant: f64,
        #[serde(default)]
        viscosity: f64,
        #[serde(default)]
        conductivity: f64,
        #[serde(default, skip_serializing_if = "is_zero")]
        beta: f64,
    },
    TabulatedAir {
        #[serde(default = "default_gas_constant")]
        gas_constant: f64,
        #[serde(default, skip_serializing_if = "is_zero")]
        beta: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundaryDef {
    pub id: String,
    pub kind: BoundaryKindDef,
    #[serde(default)]
    pub density_policy: DensityPolicyDef,
    #[serde(default)]
    pub motion: MotionDef,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub resistivity: f64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub thickness: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_field: Option<TemperatureFieldDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryKindDef {
    NoSlip,
    Slip,
    ThermalNoSlip,
    ThermalSlip,
    ThermalResistive,
}

impl BoundaryKindDef {
    pub fn is_thermal(self) -> bool {
        matches!(
            self,
            Self::ThermalNoSlip | Self::ThermalSlip | Self::ThermalResistive
        )
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DensityPolicyDef {
    #[default]
    Isochoric,
    Isentropic,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MotionDef {
    #[default]
    NoSlip,
    Slip,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemperatureFieldDef {
    pub name: String,
    pub family: FieldFamilyDef,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldFamilyDef {
    Nodal,
    Elemental,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterfaceDef {
    pub id: String,
    pub fluid_subdomains: Vec<u32>,
    pub solid_subdomains: Vec<u32>,
    pub condition: ConditionDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fluid_conductivity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emissivity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radiation_temperature: Option<FunctionDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fluid_heat_flux: Option<FunctionDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solid_heat_flux: Option<FunctionDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConditionDef {
    TemperatureContinuity,
    FluxContinuity,
    Radiative,
}

/// Scalar function of time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FunctionDef {
    Constant { value: f64 },
    PiecewiseLinear { times: Vec<f64>, values: Vec<f64> },
}
