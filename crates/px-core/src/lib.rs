//! px-core: stable foundation for the phoenix flux core.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Vec3, tolerances, float helpers)
//! - ids (compact element/subdomain/boundary identifiers and face keys)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{PxError, PxResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
