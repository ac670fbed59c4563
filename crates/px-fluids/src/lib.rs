//! px-fluids: equation-of-state models for the phoenix flux core.
//!
//! Provides:
//! - `EquationOfState` trait, the single seam every flux and ghost-state
//!   computation goes through
//! - `IdealGas`: closed-form calorically perfect gas
//! - `TabulatedAir`: dry-air properties interpolated from a table keyed on
//!   specific internal energy
//! - `PropertyTable`: the monotone piecewise-linear lookup behind it
//!
//! # Example
//!
//! ```
//! use px_fluids::{EquationOfState, IdealGas};
//!
//! let air = IdealGas::air();
//! let v = 1.0 / 1.2;
//! let u = air.cv(v, 0.0).unwrap() * 300.0;
//! let p = air.pressure(v, u).unwrap();
//! assert!((p - 1.2 * 287.058 * 300.0).abs() < 1e-6);
//! ```

pub mod air;
pub mod error;
pub mod ideal_gas;
pub mod model;
pub mod table;

// Re-exports for ergonomics
pub use air::TabulatedAir;
pub use error::{FluidError, FluidResult};
pub use ideal_gas::IdealGas;
pub use model::{
    EquationOfState, PRESSURE_FLOOR, PressureDerivatives, PropertyPack, SOUND_SPEED_SQ_FLOOR,
};
pub use table::{Column, PropertyTable};
