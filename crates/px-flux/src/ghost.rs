//! Ghost-state reconstruction for wall boundaries.
//!
//! A boundary face is closed by solving a Riemann problem between the
//! interior state and a fictitious ghost state. Mirror walls reflect the
//! momentum; thermally coupled walls additionally pick the ghost temperature
//! so that the face average matches the wall temperature:
//!
//! ```text
//! T_ghost = 2 (T_wall - ΔT) - T_fluid,   ΔT = q · R'' · thickness
//! ```

use std::fmt;
use std::sync::Arc;

use nalgebra::Matrix3;
use px_core::numeric::{Vec3, mean};
use px_fluids::EquationOfState;

use crate::error::{FluxError, RiemannResult};
use crate::jacobian::{DEFAULT_RELATIVE_STEP, central_difference_jacobian};
use crate::state::{ConservedState, FluxJacobian, FluxVector};

/// Tangential behavior of a wall.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WallMotion {
    /// Whole momentum reversed.
    #[default]
    NoSlip,
    /// Normal momentum reversed, tangential kept.
    Slip,
}

/// How the ghost density follows the ghost temperature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GhostDensity {
    /// ρ_ghost = ρ; pressure and energy come from (ρ, T_ghost).
    #[default]
    Isochoric,
    /// ρ_ghost = ρ (T_fluid / T_ghost)^(1/(γ-1)), momentum rescaled with it.
    Isentropic,
}

/// Thin wall layer with finite thermal resistance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResistiveLayer {
    pub motion: WallMotion,
    pub density: GhostDensity,
    /// Thermal resistivity [m·K/W]
    pub resistivity: f64,
    /// Layer thickness [m]
    pub thickness: f64,
}

impl ResistiveLayer {
    /// Temperature drop across the layer for a normal heat flux `q` [W/m²].
    ///
    /// Exactly zero when the layer has no resistance or no thickness.
    pub fn temperature_drop(&self, q: f64) -> f64 {
        if self.resistivity == 0.0 || self.thickness == 0.0 {
            0.0
        } else {
            q * self.resistivity * self.thickness
        }
    }
}

/// Closed set of wall boundary treatments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoundaryKind {
    NoSlipWall,
    SlipWall,
    ThermalNoSlip { density: GhostDensity },
    ThermalSlip { density: GhostDensity },
    ThermalResistive(ResistiveLayer),
}

impl BoundaryKind {
    pub fn motion(&self) -> WallMotion {
        match self {
            BoundaryKind::NoSlipWall | BoundaryKind::ThermalNoSlip { .. } => WallMotion::NoSlip,
            BoundaryKind::SlipWall | BoundaryKind::ThermalSlip { .. } => WallMotion::Slip,
            BoundaryKind::ThermalResistive(layer) => layer.motion,
        }
    }

    /// Density policy for thermally coupled kinds.
    pub fn density_policy(&self) -> Option<GhostDensity> {
        match self {
            BoundaryKind::NoSlipWall | BoundaryKind::SlipWall => None,
            BoundaryKind::ThermalNoSlip { density } | BoundaryKind::ThermalSlip { density } => {
                Some(*density)
            }
            BoundaryKind::ThermalResistive(layer) => Some(layer.density),
        }
    }

    pub fn is_thermal(&self) -> bool {
        self.density_policy().is_some()
    }

    pub fn label(&self) -> &'static str {
        match self {
            BoundaryKind::NoSlipWall => "no_slip",
            BoundaryKind::SlipWall => "slip",
            BoundaryKind::ThermalNoSlip { .. } => "thermal_no_slip",
            BoundaryKind::ThermalSlip { .. } => "thermal_slip",
            BoundaryKind::ThermalResistive(_) => "thermal_resistive",
        }
    }
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-face data supplied by the caller for thermally coupled walls.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoundaryInputs<'a> {
    /// Coupled wall temperatures at the face nodes [K]
    pub nodal_temperatures: &'a [f64],
    /// Conductive normal heat flux in the adjoining solid [W/m²]
    pub solid_heat_flux: f64,
}

impl<'a> BoundaryInputs<'a> {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn thermal(nodal_temperatures: &'a [f64]) -> Self {
        Self {
            nodal_temperatures,
            solid_heat_flux: 0.0,
        }
    }

    pub fn with_heat_flux(mut self, q: f64) -> Self {
        self.solid_heat_flux = q;
        self
    }
}

fn reflect(motion: WallMotion, m: &Vec3, normal: &Vec3) -> Vec3 {
    match motion {
        WallMotion::NoSlip => -m,
        WallMotion::Slip => m - normal * (2.0 * m.dot(normal)),
    }
}

/// Ghost state across a wall face with unit outward normal `normal`.
pub fn ghost_state(
    kind: &BoundaryKind,
    eos: &dyn EquationOfState,
    interior: &ConservedState,
    normal: &Vec3,
    inputs: &BoundaryInputs<'_>,
) -> RiemannResult<ConservedState> {
    interior.validate()?;
    let m_reflected = reflect(kind.motion(), &interior.momentum, normal);

    let Some(density) = kind.density_policy() else {
        return Ok(ConservedState::new(
            interior.rho,
            m_reflected,
            interior.total_energy,
        ));
    };

    let v = interior.specific_volume();
    let e = interior.specific_internal_energy();
    let t_fluid = eos.temperature(v, e)?;
    let t_wall = mean(inputs.nodal_temperatures).ok_or(FluxError::MissingBoundaryTemperature)?;
    let drop = match kind {
        BoundaryKind::ThermalResistive(layer) => layer.temperature_drop(inputs.solid_heat_flux),
        _ => 0.0,
    };
    let t_ghost = 2.0 * (t_wall - drop) - t_fluid;
    if !t_ghost.is_finite() || t_ghost <= 0.0 {
        return Err(FluxError::NonPhysicalGhost {
            t_ghost,
            t_fluid,
            t_wall,
        });
    }

    let ghost = match density {
        GhostDensity::Isochoric => {
            let rho = interior.rho;
            let p = eos.p_from_rho_t(rho, t_ghost)?;
            let e_ghost = eos.e_from_p_rho(p, rho)?;
            ConservedState::new(
                rho,
                m_reflected,
                0.5 * m_reflected.norm_squared() / rho + rho * e_ghost,
            )
        }
        GhostDensity::Isentropic => {
            let gamma = eos.gamma(v, e)?;
            let cv = eos.cv(v, e)?;
            let rho = interior.rho * (t_fluid / t_ghost).powf(1.0 / (gamma - 1.0));
            let m = m_reflected * (rho / interior.rho);
            ConservedState::new(rho, m, 0.5 * m.norm_squared() / rho + rho * cv * t_ghost)
        }
    };
    ghost.validate()?;
    Ok(ghost)
}

/// Derivative of the ghost state with respect to the interior state.
///
/// Mirror walls are linear and get the exact reflection matrix; thermally
/// coupled walls are differenced centrally with the wall inputs held fixed.
pub fn ghost_jacobian(
    kind: &BoundaryKind,
    eos: &dyn EquationOfState,
    interior: &ConservedState,
    normal: &Vec3,
    inputs: &BoundaryInputs<'_>,
) -> RiemannResult<FluxJacobian> {
    if kind.is_thermal() {
        return central_difference_jacobian(
            &interior.to_vector(),
            |u| {
                let g = ghost_state(kind, eos, &ConservedState::from_vector(u), normal, inputs)?;
                Ok(g.to_vector())
            },
            DEFAULT_RELATIVE_STEP,
        );
    }

    let block: Matrix3<f64> = match kind.motion() {
        WallMotion::NoSlip => -Matrix3::identity(),
        WallMotion::Slip => Matrix3::identity() - normal * normal.transpose() * 2.0,
    };
    let mut jac = FluxJacobian::identity();
    jac.fixed_view_mut::<3, 3>(1, 1).copy_from(&block);
    Ok(jac)
}

/// Derivative of the ghost state with respect to a uniform shift of every
/// nodal wall temperature.
///
/// The ghost only sees the mean wall temperature, so the derivative with
/// respect to a single node is this vector divided by the node count. Mirror
/// walls do not depend on the wall temperature.
pub fn ghost_wall_temperature_derivative(
    kind: &BoundaryKind,
    eos: &dyn EquationOfState,
    interior: &ConservedState,
    normal: &Vec3,
    inputs: &BoundaryInputs<'_>,
) -> RiemannResult<FluxVector> {
    if !kind.is_thermal() {
        return Ok(FluxVector::zeros());
    }
    let t_wall = mean(inputs.nodal_temperatures).ok_or(FluxError::MissingBoundaryTemperature)?;
    let h = DEFAULT_RELATIVE_STEP * t_wall.abs().max(1.0);
    let shifted = |dt: f64| -> RiemannResult<FluxVector> {
        let temperatures: Vec<f64> = inputs.nodal_temperatures.iter().map(|t| t + dt).collect();
        let shifted = BoundaryInputs {
            nodal_temperatures: &temperatures,
            solid_heat_flux: inputs.solid_heat_flux,
        };
        Ok(ghost_state(kind, eos, interior, normal, &shifted)?.to_vector())
    };
    Ok((shifted(h)? - shifted(-h)?) / (2.0 * h))
}

/// Ghost-state construction with its collaborators bound at setup time.
#[derive(Clone)]
pub struct GhostStateBuilder {
    kind: BoundaryKind,
    eos: Arc<dyn EquationOfState>,
}

impl fmt::Debug for GhostStateBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GhostStateBuilder")
            .field("kind", &self.kind)
            .field("eos", &self.eos.name())
            .finish()
    }
}

impl GhostStateBuilder {
    pub fn new(kind: BoundaryKind, eos: Arc<dyn EquationOfState>) -> Self {
        Self { kind, eos }
    }

    pub fn kind(&self) -> &BoundaryKind {
        &self.kind
    }

    pub fn eos(&self) -> &Arc<dyn EquationOfState> {
        &self.eos
    }

    pub fn build(
        &self,
        interior: &ConservedState,
        normal: &Vec3,
        inputs: &BoundaryInputs<'_>,
    ) -> RiemannResult<ConservedState> {
        ghost_state(&self.kind, self.eos.as_ref(), interior, normal, inputs)
    }

    pub fn jacobian(
        &self,
        interior: &ConservedState,
        normal: &Vec3,
        inputs: &BoundaryInputs<'_>,
    ) -> RiemannResult<FluxJacobian> {
        ghost_jacobian(&self.kind, self.eos.as_ref(), interior, normal, inputs)
    }

    pub fn wall_temperature_derivative(
        &self,
        interior: &ConservedState,
        normal: &Vec3,
        inputs: &BoundaryInputs<'_>,
    ) -> RiemannResult<FluxVector> {
        ghost_wall_temperature_derivative(&self.kind, self.eos.as_ref(), interior, normal, inputs)
    }
}
