//! Case validation logic.
//!
//! Every rule here runs before any model is built, so a bad case file never
//! reaches a flux evaluation.

use crate::schema::{
    BoundaryDef, BoundaryKindDef, CaseFile, ConditionDef, FieldFamilyDef, FluidDef, FunctionDef,
    InterfaceDef,
};
use std::collections::HashSet;

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing field: {field} in {context}")]
    MissingField { field: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported feature: {feature} - {reason}")]
    Unsupported { feature: String, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_case(case: &CaseFile) -> Result<(), ValidationError> {
    if case.version == 0 || case.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: case.version,
        });
    }
    if case.name.trim().is_empty() {
        return Err(ValidationError::MissingField {
            field: "name".to_string(),
            context: "case".to_string(),
        });
    }
    if case.threads == Some(0) {
        return Err(invalid("threads", 0, "must be at least 1"));
    }

    validate_fluid(&case.fluid)?;

    let mut boundary_ids = HashSet::new();
    for boundary in &case.boundaries {
        if !boundary_ids.insert(&boundary.id) {
            return Err(ValidationError::DuplicateId {
                id: boundary.id.clone(),
                context: "boundaries".to_string(),
            });
        }
        validate_boundary(boundary)?;
    }

    let mut interface_ids = HashSet::new();
    for interface in &case.interfaces {
        if !interface_ids.insert(&interface.id) {
            return Err(ValidationError::DuplicateId {
                id: interface.id.clone(),
                context: "interfaces".to_string(),
            });
        }
        validate_interface(interface)?;
    }

    Ok(())
}

fn validate_fluid(fluid: &FluidDef) -> Result<(), ValidationError> {
    match fluid {
        FluidDef::IdealGas {
            gamma,
            gas_constant,
            viscosity,
            conductivity,
            beta,
        } => {
            if !gamma.is_finite() || *gamma <= 1.0 {
                return Err(invalid("fluid.gamma", gamma, "must be > 1"));
            }
            validate_positive("fluid.gas_constant", *gas_constant)?;
            validate_non_negative("fluid.viscosity", *viscosity)?;
            validate_non_negative("fluid.conductivity", *conductivity)?;
            validate_finite("fluid.beta", *beta)
        }
        FluidDef::TabulatedAir { gas_constant, beta } => {
            validate_positive("fluid.gas_constant", *gas_constant)?;
            validate_finite("fluid.beta", *beta)
        }
    }
}

fn validate_boundary(boundary: &BoundaryDef) -> Result<(), ValidationError> {
    let ctx = |field: &str| format!("boundary '{}'.{field}", boundary.id);
    if boundary.id.trim().is_empty() {
        return Err(ValidationError::MissingField {
            field: "id".to_string(),
            context: "boundaries".to_string(),
        });
    }

    validate_non_negative(&ctx("resistivity"), boundary.resistivity)?;
    validate_non_negative(&ctx("thickness"), boundary.thickness)?;
    if boundary.kind != BoundaryKindDef::ThermalResistive
        && (boundary.resistivity != 0.0 || boundary.thickness != 0.0)
    {
        return Err(ValidationError::Unsupported {
            feature: ctx("resistivity"),
            reason: "wall layers only apply to thermal_resistive boundaries".to_string(),
        });
    }

    if boundary.kind.is_thermal() {
        match &boundary.temperature_field {
            None => {
                return Err(ValidationError::MissingField {
                    field: "temperature_field".to_string(),
                    context: format!("boundary '{}'", boundary.id),
                });
            }
            Some(field) if field.name.trim().is_empty() => {
                return Err(ValidationError::MissingField {
                    field: "temperature_field.name".to_string(),
                    context: format!("boundary '{}'", boundary.id),
                });
            }
            Some(field) if field.family != FieldFamilyDef::Nodal => {
                return Err(ValidationError::Unsupported {
                    feature: ctx("temperature_field.family"),
                    reason: "wall temperatures must be a nodal field".to_string(),
                });
            }
            Some(_) => {}
        }
    }
    Ok(())
}

fn validate_interface(interface: &InterfaceDef) -> Result<(), ValidationError> {
    let ctx = |field: &str| format!("interface '{}'.{field}", interface.id);
    if interface.id.trim().is_empty() {
        return Err(ValidationError::MissingField {
            field: "id".to_string(),
            context: "interfaces".to_string(),
        });
    }
    if interface.fluid_subdomains.is_empty() {
        return Err(ValidationError::MissingField {
            field: "fluid_subdomains".to_string(),
            context: format!("interface '{}'", interface.id),
        });
    }
    if interface.solid_subdomains.is_empty() {
        return Err(ValidationError::MissingField {
            field: "solid_subdomains".to_string(),
            context: format!("interface '{}'", interface.id),
        });
    }
    let fluid: HashSet<_> = interface.fluid_subdomains.iter().collect();
    if let Some(shared) = interface.solid_subdomains.iter().find(|s| fluid.contains(s)) {
        return Err(invalid(
            ctx("solid_subdomains"),
            shared,
            "subdomain is also listed on the fluid side",
        ));
    }

    if let Some(k) = interface.fluid_conductivity {
        validate_non_negative(&ctx("fluid_conductivity"), k)?;
    }

    match interface.condition {
        ConditionDef::Radiative => match interface.emissivity {
            None => {
                return Err(ValidationError::MissingField {
                    field: "emissivity".to_string(),
                    context: format!("interface '{}'", interface.id),
                });
            }
            Some(e) if !(0.0..=1.0).contains(&e) => {
                return Err(invalid(ctx("emissivity"), e, "must lie in [0, 1]"));
            }
            Some(_) => {}
        },
        ConditionDef::TemperatureContinuity | ConditionDef::FluxContinuity => {
            if interface.emissivity.is_some() || interface.radiation_temperature.is_some() {
                return Err(ValidationError::Unsupported {
                    feature: ctx("emissivity"),
                    reason: "radiation settings need condition: radiative".to_string(),
                });
            }
        }
    }

    for (field, function) in [
        ("radiation_temperature", &interface.radiation_temperature),
        ("fluid_heat_flux", &interface.fluid_heat_flux),
        ("solid_heat_flux", &interface.solid_heat_flux),
    ] {
        if let Some(function) = function {
            validate_function(&ctx(field), function)?;
        }
    }
    Ok(())
}

fn validate_function(field: &str, function: &FunctionDef) -> Result<(), ValidationError> {
    match function {
        FunctionDef::Constant { value } => validate_finite(field, *value),
        FunctionDef::PiecewiseLinear { times, values } => {
            if times.is_empty() {
                return Err(ValidationError::MissingField {
                    field: "times".to_string(),
                    context: field.to_string(),
                });
            }
            if times.len() != values.len() {
                return Err(invalid(
                    field,
                    format!("{} times, {} values", times.len(), values.len()),
                    "times and values must have the same length",
                ));
            }
            for x in times.iter().chain(values) {
                validate_finite(field, *x)?;
            }
            if times.windows(2).any(|w| w[1] <= w[0]) {
                return Err(invalid(field, format!("{times:?}"), "times must be strictly increasing"));
            }
            Ok(())
        }
    }
}

fn validate_finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, value, "must be finite"))
    }
}

fn validate_positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be > 0"))
    }
}

fn validate_non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be >= 0"))
    }
}
