//! Conserved states, face geometry and flux results.

use nalgebra::{SMatrix, SVector};
use px_core::ids::{BoundaryId, ElemId, FaceKey, SideIndex};
use px_core::numeric::Vec3;
use px_fluids::EquationOfState;

use crate::error::{FluxError, RiemannResult};

/// Number of conserved variables (ρ, ρu, ρv, ρw, ρE).
pub const NVARS: usize = 5;

pub type FluxVector = SVector<f64, NVARS>;
pub type FluxJacobian = SMatrix<f64, NVARS, NVARS>;

/// Conserved variables of one cell or ghost cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConservedState {
    /// Density ρ [kg/m³]
    pub rho: f64,
    /// Momentum density ρu [kg/(m²·s)]
    pub momentum: Vec3,
    /// Total energy density ρE [J/m³]
    pub total_energy: f64,
}

impl ConservedState {
    pub fn new(rho: f64, momentum: Vec3, total_energy: f64) -> Self {
        Self {
            rho,
            momentum,
            total_energy,
        }
    }

    /// Build from density, velocity and temperature through the equation of state.
    pub fn from_rho_velocity_temperature(
        eos: &dyn EquationOfState,
        rho: f64,
        velocity: Vec3,
        temperature: f64,
    ) -> RiemannResult<Self> {
        let p = eos.p_from_rho_t(rho, temperature)?;
        let e = eos.e_from_p_rho(p, rho)?;
        let state = Self {
            rho,
            momentum: velocity * rho,
            total_energy: rho * e + 0.5 * rho * velocity.norm_squared(),
        };
        state.validate()?;
        Ok(state)
    }

    pub fn from_vector(u: &FluxVector) -> Self {
        Self {
            rho: u[0],
            momentum: Vec3::new(u[1], u[2], u[3]),
            total_energy: u[4],
        }
    }

    pub fn to_vector(&self) -> FluxVector {
        FluxVector::new(
            self.rho,
            self.momentum.x,
            self.momentum.y,
            self.momentum.z,
            self.total_energy,
        )
    }

    /// Density must be positive and every component finite.
    pub fn validate(&self) -> RiemannResult<()> {
        if !self.rho.is_finite() || self.rho <= 0.0 {
            return Err(FluxError::NonPhysicalState {
                what: "density",
                value: self.rho,
            });
        }
        if let Some(m) = self.momentum.iter().find(|m| !m.is_finite()) {
            return Err(FluxError::NonPhysicalState {
                what: "momentum",
                value: *m,
            });
        }
        if !self.total_energy.is_finite() {
            return Err(FluxError::NonPhysicalState {
                what: "total energy",
                value: self.total_energy,
            });
        }
        Ok(())
    }

    pub fn specific_volume(&self) -> f64 {
        1.0 / self.rho
    }

    pub fn velocity(&self) -> Vec3 {
        self.momentum / self.rho
    }

    /// ½|ρu|²/ρ
    pub fn kinetic_energy_density(&self) -> f64 {
        0.5 * self.momentum.norm_squared() / self.rho
    }

    /// (ρE - ½|ρu|²/ρ)/ρ
    pub fn specific_internal_energy(&self) -> f64 {
        (self.total_energy - self.kinetic_energy_density()) / self.rho
    }

    pub fn pressure(&self, eos: &dyn EquationOfState) -> RiemannResult<f64> {
        Ok(eos.pressure(self.specific_volume(), self.specific_internal_energy())?)
    }

    pub fn temperature(&self, eos: &dyn EquationOfState) -> RiemannResult<f64> {
        Ok(eos.temperature(self.specific_volume(), self.specific_internal_energy())?)
    }
}

/// What lies on the far side of a face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceNeighbor {
    Element(ElemId),
    Boundary(BoundaryId),
}

/// Oriented face: unit outward normal of the owning element plus the ids
/// needed to key cached evaluations.
///
/// The normal is taken as given; it is never renormalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceGeometry {
    pub normal: Vec3,
    pub elem: ElemId,
    pub side: SideIndex,
    pub neighbor: FaceNeighbor,
}

impl FaceGeometry {
    pub fn internal(elem: ElemId, side: SideIndex, neighbor: ElemId, normal: Vec3) -> Self {
        Self {
            normal,
            elem,
            side,
            neighbor: FaceNeighbor::Element(neighbor),
        }
    }

    pub fn boundary(elem: ElemId, side: SideIndex, boundary: BoundaryId, normal: Vec3) -> Self {
        Self {
            normal,
            elem,
            side,
            neighbor: FaceNeighbor::Boundary(boundary),
        }
    }

    pub fn key(&self) -> FaceKey {
        FaceKey::new(self.side, self.elem)
    }

    pub fn neighbor_elem(&self) -> Option<ElemId> {
        match self.neighbor {
            FaceNeighbor::Element(id) => Some(id),
            FaceNeighbor::Boundary(_) => None,
        }
    }
}

/// Wave-pattern region the HLLC flux was taken from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FluxRegion {
    /// 0 <= S_L
    LeftSupersonic,
    /// S_L < 0 <= S_M
    LeftStar,
    /// S_M < 0 <= S_R
    RightStar,
    /// S_R < 0
    RightSupersonic,
}

/// Numerical flux through one face and its derivatives.
///
/// The element on the left adds `flux` to its residual, the element on the
/// right subtracts it.
#[derive(Clone, Debug, PartialEq)]
pub struct FluxResult {
    pub flux: FluxVector,
    /// ∂flux/∂U_left (for boundary faces: total derivative w.r.t. the interior state)
    pub jac_left: FluxJacobian,
    /// ∂flux/∂U_right (for boundary faces: w.r.t. the ghost state)
    pub jac_right: FluxJacobian,
    pub region: FluxRegion,
}

impl FluxResult {
    pub(crate) fn ensure_finite(self) -> RiemannResult<Self> {
        if self.flux.iter().any(|x| !x.is_finite()) {
            return Err(FluxError::NonFinite { what: "flux" });
        }
        if self
            .jac_left
            .iter()
            .chain(self.jac_right.iter())
            .any(|x| !x.is_finite())
        {
            return Err(FluxError::NonFinite { what: "flux Jacobian" });
        }
        Ok(self)
    }
}
