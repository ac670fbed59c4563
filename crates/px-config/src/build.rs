//! Turns a validated case file into ready-to-evaluate models.

use crate::schema::{
    BoundaryDef, BoundaryKindDef, CaseFile, ConditionDef, DensityPolicyDef, FluidDef, FunctionDef,
    InterfaceDef, MotionDef,
};
use crate::validate::validate_case;
use crate::{ConfigError, ConfigResult};
use px_core::{BoundaryId, SubdomainId};
use px_fluids::{EquationOfState, IdealGas, TabulatedAir};
use px_flux::{
    BoundaryFlux, BoundaryKind, FluxCache, GhostDensity, HllcFlux, ResistiveLayer, WallMotion,
};
use px_thermal::{
    ConjugateInterface, ConstantFunction, InterfaceCondition, InterfaceSide, PiecewiseLinear,
    RadiationTemperature, ScalarFunction, ThermalInterfaceCoupler,
};
use std::sync::Arc;

/// One configured wall boundary.
#[derive(Debug, Clone)]
pub struct BoundarySetup {
    pub id: BoundaryId,
    pub name: String,
    /// Nodal field supplying wall temperatures, for thermal kinds.
    pub temperature_field: Option<String>,
    pub flux: BoundaryFlux,
}

/// Everything a case file describes, wired to one shared equation of state.
#[derive(Clone)]
pub struct CaseModel {
    name: String,
    eos: Arc<dyn EquationOfState>,
    boundaries: Vec<BoundarySetup>,
    interfaces: Vec<ThermalInterfaceCoupler>,
    threads: usize,
}

impl std::fmt::Debug for CaseModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaseModel")
            .field("name", &self.name)
            .field("eos", &self.eos.name())
            .field("boundaries", &self.boundaries.len())
            .field("interfaces", &self.interfaces.len())
            .field("threads", &self.threads)
            .finish()
    }
}

impl CaseModel {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn eos(&self) -> &Arc<dyn EquationOfState> {
        &self.eos
    }

    pub fn boundaries(&self) -> &[BoundarySetup] {
        &self.boundaries
    }

    pub fn interfaces(&self) -> &[ThermalInterfaceCoupler] {
        &self.interfaces
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn boundary(&self, name: &str) -> ConfigResult<&BoundarySetup> {
        self.boundaries
            .iter()
            .find(|b| b.name == name)
            .ok_or_else(|| ConfigError::UnknownBoundary {
                id: name.to_string(),
            })
    }

    pub fn interface(&self, name: &str) -> ConfigResult<&ThermalInterfaceCoupler> {
        self.interfaces
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| ConfigError::UnknownInterface {
                id: name.to_string(),
            })
    }

    /// Conjugate heat-transfer evaluator for a thermal boundary.
    pub fn conjugate(&self, name: &str) -> ConfigResult<ConjugateInterface> {
        let setup = self.boundary(name)?;
        Ok(ConjugateInterface::new(
            *setup.flux.kind(),
            Arc::clone(&self.eos),
        )?)
    }

    pub fn hllc(&self) -> HllcFlux {
        HllcFlux::new(Arc::clone(&self.eos))
    }

    /// A fresh cache with one slot per configured thread.
    pub fn flux_cache(&self) -> FluxCache {
        FluxCache::new(self.threads)
    }
}

/// Validate `case` and build its models.
pub fn build_case(case: &CaseFile) -> ConfigResult<CaseModel> {
    validate_case(case)?;

    let eos = build_fluid(&case.fluid)?;
    let boundaries = case
        .boundaries
        .iter()
        .enumerate()
        .map(|(index, def)| build_boundary(index, def, &eos))
        .collect::<Vec<_>>();
    let interfaces = case
        .interfaces
        .iter()
        .map(|def| build_interface(def, &eos))
        .collect::<ConfigResult<Vec<_>>>()?;
    let threads = case
        .threads
        .unwrap_or_else(rayon::current_num_threads)
        .max(1);

    tracing::debug!(
        case = %case.name,
        eos = eos.name(),
        boundaries = boundaries.len(),
        interfaces = interfaces.len(),
        threads,
        "case built"
    );

    Ok(CaseModel {
        name: case.name.clone(),
        eos,
        boundaries,
        interfaces,
        threads,
    })
}

pub fn build_fluid(def: &FluidDef) -> ConfigResult<Arc<dyn EquationOfState>> {
    Ok(match def {
        FluidDef::IdealGas {
            gamma,
            gas_constant,
            viscosity,
            conductivity,
            beta,
        } => Arc::new(
            IdealGas::new(*gamma, *gas_constant)?
                .with_transport(*viscosity, *conductivity)?
                .with_beta(*beta),
        ),
        FluidDef::TabulatedAir { gas_constant, beta } => Arc::new(
            TabulatedAir::new()?
                .with_gas_constant(*gas_constant)?
                .with_beta(*beta),
        ),
    })
}

fn density(def: DensityPolicyDef) -> GhostDensity {
    match def {
        DensityPolicyDef::Isochoric => GhostDensity::Isochoric,
        DensityPolicyDef::Isentropic => GhostDensity::Isentropic,
    }
}

pub fn boundary_kind(def: &BoundaryDef) -> BoundaryKind {
    let density = density(def.density_policy);
    match def.kind {
        BoundaryKindDef::NoSlip => BoundaryKind::NoSlipWall,
        BoundaryKindDef::Slip => BoundaryKind::SlipWall,
        BoundaryKindDef::ThermalNoSlip => BoundaryKind::ThermalNoSlip { density },
        BoundaryKindDef::ThermalSlip => BoundaryKind::ThermalSlip { density },
        BoundaryKindDef::ThermalResistive => BoundaryKind::ThermalResistive(ResistiveLayer {
            motion: match def.motion {
                MotionDef::NoSlip => WallMotion::NoSlip,
                MotionDef::Slip => WallMotion::Slip,
            },
            density,
            resistivity: def.resistivity,
            thickness: def.thickness,
        }),
    }
}

fn build_boundary(
    index: usize,
    def: &BoundaryDef,
    eos: &Arc<dyn EquationOfState>,
) -> BoundarySetup {
    let kind = boundary_kind(def);
    BoundarySetup {
        id: BoundaryId::from_index(u32::try_from(index).unwrap_or(u32::MAX)),
        name: def.id.clone(),
        temperature_field: def.temperature_field.as_ref().map(|f| f.name.clone()),
        flux: BoundaryFlux::new(kind, Arc::clone(eos)),
    }
}

pub fn build_function(def: &FunctionDef) -> ConfigResult<Arc<dyn ScalarFunction>> {
    Ok(match def {
        FunctionDef::Constant { value } => Arc::new(ConstantFunction(*value)),
        FunctionDef::PiecewiseLinear { times, values } => {
            Arc::new(PiecewiseLinear::new(times.clone(), values.clone())?)
        }
    })
}

fn build_interface(
    def: &InterfaceDef,
    eos: &Arc<dyn EquationOfState>,
) -> ConfigResult<ThermalInterfaceCoupler> {
    let condition = match def.condition {
        ConditionDef::TemperatureContinuity => InterfaceCondition::TemperatureContinuity,
        ConditionDef::FluxContinuity => InterfaceCondition::FluxContinuity,
        ConditionDef::Radiative => InterfaceCondition::Radiative {
            emissivity: def.emissivity.ok_or_else(|| ConfigError::Build {
                what: format!("interface '{}' has no emissivity", def.id),
            })?,
            environment: match &def.radiation_temperature {
                None => RadiationTemperature::default(),
                Some(FunctionDef::Constant { value }) => RadiationTemperature::Constant(*value),
                Some(f) => RadiationTemperature::Varying(build_function(f)?),
            },
        },
    };

    let mut coupler = ThermalInterfaceCoupler::new(
        def.id.clone(),
        condition,
        def.fluid_subdomains.iter().copied().map(SubdomainId::from_index),
        def.solid_subdomains.iter().copied().map(SubdomainId::from_index),
        Arc::clone(eos),
    )?;
    if let Some(k) = def.fluid_conductivity {
        coupler = coupler.with_fluid_conductivity(k)?;
    }
    if let Some(f) = &def.fluid_heat_flux {
        coupler = coupler.with_heat_flux(InterfaceSide::Fluid, build_function(f)?);
    }
    if let Some(f) = &def.solid_heat_flux {
        coupler = coupler.with_heat_flux(InterfaceSide::Solid, build_function(f)?);
    }
    Ok(coupler)
}
