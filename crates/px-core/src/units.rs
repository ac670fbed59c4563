// px-core/src/units.rs

use uom::si::f64::{
    DynamicViscosity as UomDynamicViscosity, MassDensity as UomMassDensity,
    Pressure as UomPressure, SpecificHeatCapacity as UomSpecificHeatCapacity,
    ThermalConductivity as UomThermalConductivity,
    ThermodynamicTemperature as UomThermodynamicTemperature, Velocity as UomVelocity,
};

// Public canonical unit types (SI, f64)
pub type Density = UomMassDensity;
pub type DynVisc = UomDynamicViscosity;
pub type Pressure = UomPressure;
pub type SpecHeat = UomSpecificHeatCapacity;
pub type Temperature = UomThermodynamicTemperature;
pub type ThermalCond = UomThermalConductivity;
pub type Velocity = UomVelocity;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn kgpm3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn pa_s(v: f64) -> DynVisc {
    use uom::si::dynamic_viscosity::pascal_second;
    DynVisc::new::<pascal_second>(v)
}

#[inline]
pub fn j_per_kgk(v: f64) -> SpecHeat {
    use uom::si::specific_heat_capacity::joule_per_kilogram_kelvin;
    SpecHeat::new::<joule_per_kilogram_kelvin>(v)
}

#[inline]
pub fn w_per_mk(v: f64) -> ThermalCond {
    use uom::si::thermal_conductivity::watt_per_meter_kelvin;
    ThermalCond::new::<watt_per_meter_kelvin>(v)
}

pub mod constants {
    /// Stefan-Boltzmann constant [W/(m²·K⁴)].
    pub const STEFAN_BOLTZMANN: f64 = 5.670367e-8;

    /// Specific gas constant of dry air [J/(kg·K)].
    pub const R_DRY_AIR: f64 = 287.058;
}
