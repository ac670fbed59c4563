//! Temperature and heat-flux coupling between a fluid energy equation and a
//! solid temperature field.
//!
//! The interface normal points from the fluid into the solid, so a positive
//! heat flux leaves the fluid. Fluid residuals see outflow as positive and the
//! solid sees the same energy as inflow.
//!
//! Derivatives hold c_v and the fluid conductivity fixed, which is exact for
//! a calorically perfect gas with constant transport properties.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use px_core::ids::SubdomainId;
use px_core::numeric::Vec3;
use px_fluids::EquationOfState;
use px_flux::{ConservedState, FluxVector};

use crate::error::{ThermalError, ThermalResult};
use crate::function::ScalarFunction;
use crate::radiation::{RadiationTemperature, radiative_loss, validate_emissivity};

/// Which physics the current element belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InterfaceSide {
    Fluid,
    Solid,
}

/// Coupling condition imposed across the interface.
#[derive(Clone, Debug)]
pub enum InterfaceCondition {
    /// Each side is pulled halfway to the other side's temperature.
    TemperatureContinuity,
    /// Both sides see the average of the two conductive fluxes.
    FluxContinuity,
    /// Flux continuity plus gray-body loss from the solid.
    Radiative {
        emissivity: f64,
        environment: RadiationTemperature,
    },
}

impl InterfaceCondition {
    pub fn label(&self) -> &'static str {
        match self {
            Self::TemperatureContinuity => "temperature_continuity",
            Self::FluxContinuity => "flux_continuity",
            Self::Radiative { .. } => "radiative",
        }
    }
}

/// Fluid data at one interface quadrature point.
#[derive(Clone, Copy, Debug)]
pub struct FluidPoint {
    pub state: ConservedState,
    pub grad_rho: Vec3,
    pub grad_total_energy: Vec3,
}

/// Solid data at one interface quadrature point.
#[derive(Clone, Copy, Debug)]
pub struct SolidPoint {
    pub temperature: f64,
    pub grad_temperature: Vec3,
    /// Thermal conductivity [W/(m·K)]
    pub conductivity: f64,
}

/// Where and when the interface is evaluated.
#[derive(Clone, Copy, Debug)]
pub struct InterfacePoint {
    pub time: f64,
    pub position: Vec3,
    /// Unit normal from fluid into solid
    pub normal: Vec3,
}

/// Residual contribution for the side being assembled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InterfaceResidual {
    pub side: InterfaceSide,
    pub value: f64,
    /// ∂value/∂U_fluid, with U = (ρ, ρu, ρE)
    pub d_fluid_state: FluxVector,
    /// ∂value/∂(∇ρ)
    pub d_fluid_grad_rho: Vec3,
    /// ∂value/∂(∇ρE)
    pub d_fluid_grad_total_energy: Vec3,
    /// ∂value/∂T_solid
    pub d_solid_temperature: f64,
    /// ∂value/∂(∇T_solid·n)
    pub d_solid_normal_gradient: f64,
}

impl InterfaceResidual {
    /// The same contribution seen from the other side.
    fn mirrored(self, side: InterfaceSide) -> Self {
        Self {
            side,
            value: -self.value,
            d_fluid_state: -self.d_fluid_state,
            d_fluid_grad_rho: -self.d_fluid_grad_rho,
            d_fluid_grad_total_energy: -self.d_fluid_grad_total_energy,
            d_solid_temperature: -self.d_solid_temperature,
            d_solid_normal_gradient: -self.d_solid_normal_gradient,
        }
    }
}

/// Fluid-side temperature and conductive heat flux at a point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FluidThermalState {
    pub temperature: f64,
    pub grad_temperature: Vec3,
    pub conductivity: f64,
    pub cv: f64,
    /// ∂T/∂U at fixed c_v
    pub d_temperature: FluxVector,
}

/// One configurable fluid/solid thermal interface.
#[derive(Clone)]
pub struct ThermalInterfaceCoupler {
    name: String,
    condition: InterfaceCondition,
    fluid_subdomains: BTreeSet<SubdomainId>,
    solid_subdomains: BTreeSet<SubdomainId>,
    eos: Arc<dyn EquationOfState>,
    fluid_conductivity: Option<f64>,
    fluid_heat_flux: Option<Arc<dyn ScalarFunction>>,
    solid_heat_flux: Option<Arc<dyn ScalarFunction>>,
}

impl fmt::Debug for ThermalInterfaceCoupler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThermalInterfaceCoupler")
            .field("name", &self.name)
            .field("condition", &self.condition.label())
            .field("fluid_subdomains", &self.fluid_subdomains)
            .field("solid_subdomains", &self.solid_subdomains)
            .field("eos", &self.eos.name())
            .finish_non_exhaustive()
    }
}

impl ThermalInterfaceCoupler {
    pub fn new(
        name: impl Into<String>,
        condition: InterfaceCondition,
        fluid_subdomains: impl IntoIterator<Item = SubdomainId>,
        solid_subdomains: impl IntoIterator<Item = SubdomainId>,
        eos: Arc<dyn EquationOfState>,
    ) -> ThermalResult<Self> {
        let name = name.into();
        let fluid_subdomains: BTreeSet<_> = fluid_subdomains.into_iter().collect();
        let solid_subdomains: BTreeSet<_> = solid_subdomains.into_iter().collect();
        if let Some(&subdomain) = fluid_subdomains.intersection(&solid_subdomains).next() {
            return Err(ThermalError::OverlappingSubdomains {
                interface: name,
                subdomain,
            });
        }
        if fluid_subdomains.is_empty() || solid_subdomains.is_empty() {
            return Err(ThermalError::InvalidArg {
                what: format!("interface '{name}' needs fluid and solid subdomains"),
            });
        }
        if let InterfaceCondition::Radiative { emissivity, .. } = &condition {
            validate_emissivity(*emissivity)?;
        }
        tracing::debug!(
            interface = %name,
            condition = condition.label(),
            fluid = fluid_subdomains.len(),
            solid = solid_subdomains.len(),
            "thermal interface configured"
        );
        Ok(Self {
            name,
            condition,
            fluid_subdomains,
            solid_subdomains,
            eos,
            fluid_conductivity: None,
            fluid_heat_flux: None,
            solid_heat_flux: None,
        })
    }

    /// Use a fixed fluid conductivity instead of the equation of state's.
    pub fn with_fluid_conductivity(mut self, k: f64) -> ThermalResult<Self> {
        if !k.is_finite() || k < 0.0 {
            return Err(ThermalError::InvalidArg {
                what: format!("fluid conductivity must be >= 0 (got {k})"),
            });
        }
        self.fluid_conductivity = Some(k);
        Ok(self)
    }

    pub fn with_heat_flux(mut self, side: InterfaceSide, f: Arc<dyn ScalarFunction>) -> Self {
        match side {
            InterfaceSide::Fluid => self.fluid_heat_flux = Some(f),
            InterfaceSide::Solid => self.solid_heat_flux = Some(f),
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn condition(&self) -> &InterfaceCondition {
        &self.condition
    }

    /// Side of the interface that `subdomain` belongs to.
    pub fn side_of(&self, subdomain: SubdomainId) -> ThermalResult<InterfaceSide> {
        if self.fluid_subdomains.contains(&subdomain) {
            Ok(InterfaceSide::Fluid)
        } else if self.solid_subdomains.contains(&subdomain) {
            Ok(InterfaceSide::Solid)
        } else {
            Err(ThermalError::UnknownSubdomain {
                interface: self.name.clone(),
                subdomain,
            })
        }
    }

    /// Temperature, temperature gradient and conductivity on the fluid side.
    ///
    /// ∇T = (∇(ρE) - c_v T ∇ρ) / (ρ c_v), exact where the velocity vanishes.
    pub fn fluid_thermal_state(&self, fluid: &FluidPoint) -> ThermalResult<FluidThermalState> {
        let state = &fluid.state;
        state.validate()?;
        let v = state.specific_volume();
        let e = state.specific_internal_energy();
        let temperature = self.eos.temperature(v, e)?;
        let cv = self.eos.cv(v, e)?;
        let conductivity = match self.fluid_conductivity {
            Some(k) => k,
            None => self.eos.k(v, e)?,
        };
        let rho_cv = state.rho * cv;
        let grad_temperature =
            (fluid.grad_total_energy - fluid.grad_rho * (cv * temperature)) / rho_cv;
        let u = state.velocity();
        let d_temperature =
            FluxVector::new(0.5 * u.norm_squared() - e, -u.x, -u.y, -u.z, 1.0) / rho_cv;
        Ok(FluidThermalState {
            temperature,
            grad_temperature,
            conductivity,
            cv,
            d_temperature,
        })
    }

    /// Residual for the element in `subdomain`.
    pub fn residual(
        &self,
        subdomain: SubdomainId,
        fluid: &FluidPoint,
        solid: &SolidPoint,
        at: &InterfacePoint,
    ) -> ThermalResult<InterfaceResidual> {
        let side = self.side_of(subdomain)?;
        let f = self.fluid_thermal_state(fluid)?;

        // Fluid-side orientation; the solid sees the negation.
        let fluid_side = match &self.condition {
            InterfaceCondition::TemperatureContinuity => InterfaceResidual {
                side: InterfaceSide::Fluid,
                value: 0.5 * (f.temperature - solid.temperature),
                d_fluid_state: f.d_temperature * 0.5,
                d_fluid_grad_rho: Vec3::zeros(),
                d_fluid_grad_total_energy: Vec3::zeros(),
                d_solid_temperature: -0.5,
                d_solid_normal_gradient: 0.0,
            },
            InterfaceCondition::FluxContinuity | InterfaceCondition::Radiative { .. } => {
                let rho = fluid.state.rho;
                let n = &at.normal;
                let k = f.conductivity;
                let grad_n = f.grad_temperature.dot(n);
                // ∂(∇T·n)/∂U: explicit 1/ρ plus the c_v T ∇ρ term through T.
                let mut d_grad_n = f.d_temperature * (-fluid.grad_rho.dot(n) / rho);
                d_grad_n[0] -= grad_n / rho;

                let q_fluid = -k * grad_n;
                let q_solid = -solid.conductivity * solid.grad_temperature.dot(n);
                InterfaceResidual {
                    side: InterfaceSide::Fluid,
                    value: 0.5 * (q_fluid + q_solid),
                    d_fluid_state: d_grad_n * (-0.5 * k),
                    d_fluid_grad_rho: n * (0.5 * k * f.temperature / rho),
                    d_fluid_grad_total_energy: n * (-0.5 * k / (rho * f.cv)),
                    d_solid_temperature: 0.0,
                    d_solid_normal_gradient: -0.5 * solid.conductivity,
                }
            }
        };
        let mut out = match side {
            InterfaceSide::Fluid => fluid_side,
            InterfaceSide::Solid => fluid_side.mirrored(side),
        };

        if let (
            InterfaceSide::Solid,
            InterfaceCondition::Radiative {
                emissivity,
                environment,
            },
        ) = (side, &self.condition)
        {
            let (q, dq) = radiative_loss(
                *emissivity,
                solid.temperature,
                environment.at(at.time, &at.position),
            );
            out.value += q;
            out.d_solid_temperature += dq;
        }

        let source = match side {
            InterfaceSide::Fluid => self.fluid_heat_flux.as_ref(),
            InterfaceSide::Solid => self.solid_heat_flux.as_ref(),
        };
        if let Some(source) = source {
            out.value -= source.value(at.time, &at.position);
        }

        Ok(out)
    }
}
