//! px-thermal: fluid/solid thermal coupling.
//!
//! - `ThermalInterfaceCoupler`: temperature continuity, flux continuity and
//!   radiative variants of one interface, with optional heat-flux sources
//! - `ConjugateInterface`: Riemann-based conjugate heat transfer
//! - `ThermalMatchCondition`: essential energy condition at a wall
//! - `RadiationBoundary` and scalar functions of time
//! - fluid temperature sampling

pub mod conjugate;
pub mod coupler;
pub mod error;
pub mod function;
pub mod matching;
pub mod radiation;
pub mod sampling;

pub use conjugate::{ConjugateInterface, ConjugateResidual};
pub use coupler::{
    FluidPoint, FluidThermalState, InterfaceCondition, InterfacePoint, InterfaceResidual,
    InterfaceSide, SolidPoint, ThermalInterfaceCoupler,
};
pub use error::{ThermalError, ThermalResult};
pub use function::{ConstantFunction, PiecewiseLinear, ScalarFunction};
pub use matching::{MatchResidual, ThermalMatchCondition};
pub use radiation::{
    DEFAULT_AMBIENT_TEMPERATURE, RadiationBoundary, RadiationTemperature, radiative_loss,
};
pub use sampling::{fluid_temperature, fluid_temperatures};
