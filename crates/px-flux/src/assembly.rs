//! Parallel sweep over faces producing residual contributions.

use std::collections::BTreeMap;

use px_core::ids::{ElemId, FaceKey};
use rayon::prelude::*;

use crate::cache::FluxCache;
use crate::error::RiemannResult;
use crate::hllc::RiemannSolver;
use crate::state::{ConservedState, FaceGeometry, FluxResult, FluxVector};

/// An internal face with the states on both sides.
#[derive(Clone, Debug)]
pub struct FaceStates {
    pub geometry: FaceGeometry,
    /// State of `geometry.elem`
    pub left: ConservedState,
    /// State across the face
    pub right: ConservedState,
}

/// Residual contributions of one face.
#[derive(Clone, Debug)]
pub struct FaceContribution {
    pub key: FaceKey,
    pub elem: ElemId,
    pub neighbor: Option<ElemId>,
    /// +flux, added to the owning element
    pub elem_residual: FluxVector,
    /// -flux, added to the neighbor
    pub neighbor_residual: FluxVector,
    pub flux: FluxResult,
}

/// Solve every face once (through the cache) and split the flux between the
/// two adjoining elements.
///
/// A face revisited with the same states reuses its cached solve; updated
/// states are solved again.
pub fn sweep_faces(
    faces: &[FaceStates],
    solver: &dyn RiemannSolver,
    cache: &FluxCache,
) -> RiemannResult<Vec<FaceContribution>> {
    faces
        .par_iter()
        .map(|face| -> RiemannResult<FaceContribution> {
            let thread = rayon::current_thread_index().unwrap_or(0);
            let key = face.geometry.key();
            let flux = cache.get_flux(
                thread,
                key,
                solver,
                &face.left,
                &face.right,
                &face.geometry.normal,
            )?;
            Ok(FaceContribution {
                key,
                elem: face.geometry.elem,
                neighbor: face.geometry.neighbor_elem(),
                elem_residual: flux.flux,
                neighbor_residual: -flux.flux,
                flux,
            })
        })
        .collect()
}

/// Sum face contributions per element.
pub fn accumulate_residuals(contributions: &[FaceContribution]) -> BTreeMap<ElemId, FluxVector> {
    let mut residuals: BTreeMap<ElemId, FluxVector> = BTreeMap::new();
    for c in contributions {
        *residuals.entry(c.elem).or_insert_with(FluxVector::zeros) += c.elem_residual;
        if let Some(neighbor) = c.neighbor {
            *residuals.entry(neighbor).or_insert_with(FluxVector::zeros) += c.neighbor_residual;
        }
    }
    residuals
}
