//! px-config: YAML/JSON case files, validation and model wiring.

pub mod build;
pub mod schema;
pub mod validate;

pub use build::{BoundarySetup, CaseModel, boundary_kind, build_case, build_fluid, build_function};
pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_case};

use px_core::PxError;
use px_fluids::FluidError;
use px_thermal::ThermalError;
use std::path::Path;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unknown boundary: {id}")]
    UnknownBoundary { id: String },

    #[error("Unknown interface: {id}")]
    UnknownInterface { id: String },

    #[error("Build error: {what}")]
    Build { what: String },

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),

    #[error("Thermal error: {0}")]
    Thermal(#[from] ThermalError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ConfigError> for PxError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Fluid(e) => e.into(),
            ConfigError::Thermal(e) => e.into(),
            other => PxError::InvalidArg {
                what: other.to_string(),
            },
        }
    }
}

pub fn load_yaml(path: &Path) -> ConfigResult<CaseFile> {
    let content = std::fs::read_to_string(path)?;
    let case: CaseFile = serde_yaml::from_str(&content)?;
    validate_case(&case)?;
    Ok(case)
}

pub fn save_yaml(path: &Path, case: &CaseFile) -> ConfigResult<()> {
    validate_case(case)?;
    let content = serde_yaml::to_string(case)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ConfigResult<CaseFile> {
    let content = std::fs::read_to_string(path)?;
    let case: CaseFile = serde_json::from_str(&content)?;
    validate_case(&case)?;
    Ok(case)
}

pub fn save_json(path: &Path, case: &CaseFile) -> ConfigResult<()> {
    validate_case(case)?;
    let content = serde_json::to_string_pretty(case)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a YAML case and build its models in one step.
pub fn load_case(path: &Path) -> ConfigResult<CaseModel> {
    build_case(&load_yaml(path)?)
}
