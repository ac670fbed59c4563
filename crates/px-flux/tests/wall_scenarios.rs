//! End-to-end wall and cache scenarios.

use std::sync::Arc;

use px_core::ids::Id;
use px_core::numeric::Vec3;
use px_fluids::{EquationOfState, IdealGas, TabulatedAir};
use px_flux::{
    BoundaryFlux, BoundaryInputs, BoundaryKind, ConservedState, FaceGeometry, FaceStates,
    FluxCache, FluxRegion, GhostDensity, HllcFlux, physical_flux, sweep_faces,
};

const RHO: f64 = 1.2;
const T: f64 = 300.0;

fn air_at_rest(eos: &dyn EquationOfState) -> ConservedState {
    ConservedState::from_rho_velocity_temperature(eos, RHO, Vec3::zeros(), T).unwrap()
}

#[test]
fn air_at_rest_against_no_slip_wall() {
    let eos: Arc<dyn EquationOfState> = Arc::new(IdealGas::air());
    let interior = air_at_rest(eos.as_ref());
    let bf = BoundaryFlux::new(BoundaryKind::NoSlipWall, Arc::clone(&eos));
    let n = Vec3::new(1.0, 0.0, 0.0);

    let ghost = bf
        .ghost()
        .build(&interior, &n, &BoundaryInputs::none())
        .unwrap();
    assert_eq!(ghost.momentum.norm(), 0.0);

    let result = bf
        .boundary_flux(&interior, &n, &BoundaryInputs::none())
        .unwrap();
    let p = RHO * 287.058 * T;
    assert_eq!(result.region, FluxRegion::LeftStar);
    assert!(result.flux[0].abs() < 1e-12, "mass flux {}", result.flux[0]);
    assert!((result.flux[1] - p).abs() < 1e-6 * p);
    assert!(result.flux[2].abs() < 1e-9);
    assert!(result.flux[3].abs() < 1e-9);
    assert!(result.flux[4].abs() < 1e-6);

    // At rest the wall flux is the pure pressure flux of the interior.
    let exact = physical_flux(eos.as_ref(), &interior, &n).unwrap();
    for i in 0..5 {
        assert!(
            (result.flux[i] - exact[i]).abs() < 1e-6 * p,
            "row {i}: {} vs {}",
            result.flux[i],
            exact[i]
        );
    }
}

#[test]
fn tabulated_air_at_rest_against_thermal_wall_in_equilibrium() {
    let eos: Arc<dyn EquationOfState> = Arc::new(TabulatedAir::new().unwrap());
    // Start exactly on the 300 K knot.
    let interior = ConservedState::new(RHO, Vec3::zeros(), RHO * 215340.0);
    assert_eq!(interior.temperature(eos.as_ref()).unwrap(), 300.0);

    let bf = BoundaryFlux::new(
        BoundaryKind::ThermalNoSlip {
            density: GhostDensity::Isochoric,
        },
        Arc::clone(&eos),
    );
    let wall = [300.0, 300.0, 300.0, 300.0];
    let result = bf
        .boundary_flux(&interior, &Vec3::z(), &BoundaryInputs::thermal(&wall))
        .unwrap();
    let p = interior.pressure(eos.as_ref()).unwrap();
    assert!(result.flux[0].abs() < 1e-9);
    assert!((result.flux[3] - p).abs() < 1e-6 * p);
}

#[test]
fn table_range_errors_surface_through_the_wall_flux() {
    let eos: Arc<dyn EquationOfState> = Arc::new(TabulatedAir::new().unwrap());
    let interior = ConservedState::new(RHO, Vec3::zeros(), RHO * 215340.0);
    let bf = BoundaryFlux::new(
        BoundaryKind::ThermalSlip {
            density: GhostDensity::Isochoric,
        },
        eos,
    );
    // Ghost at 2·1200 - 300 = 2100 K is above the table.
    let wall = [1200.0];
    let err = bf
        .boundary_flux(&interior, &Vec3::x(), &BoundaryInputs::thermal(&wall))
        .unwrap_err();
    assert!(err.to_string().contains("upper bound"), "{err}");
}

#[test]
fn cache_results_do_not_depend_on_face_order() {
    let gas = IdealGas::air();
    let hllc = HllcFlux::new(Arc::new(gas.clone()));
    let faces: Vec<FaceStates> = (0..64)
        .map(|i| {
            let left = ConservedState::from_rho_velocity_temperature(
                &gas,
                1.0 + 0.01 * i as f64,
                Vec3::new(20.0 - i as f64, 3.0, 0.0),
                290.0 + i as f64,
            )
            .unwrap();
            let right = ConservedState::from_rho_velocity_temperature(
                &gas,
                1.1,
                Vec3::new(-5.0, 0.0, 1.0),
                310.0,
            )
            .unwrap();
            FaceStates {
                geometry: FaceGeometry::internal(
                    Id::from_index(i),
                    0,
                    Id::from_index(i + 100),
                    Vec3::new(0.0, 0.6, 0.8),
                ),
                left,
                right,
            }
        })
        .collect();

    let cache = FluxCache::for_current_pool();
    let forward = sweep_faces(&faces, &hllc, &cache).unwrap();

    let mut reversed_faces = faces.clone();
    reversed_faces.reverse();
    cache.reset().unwrap();
    let mut backward = sweep_faces(&reversed_faces, &hllc, &cache).unwrap();
    backward.reverse();

    for (a, b) in forward.iter().zip(&backward) {
        assert_eq!(a.key, b.key);
        assert_eq!(a.flux, b.flux);
    }

    // Heat every left state and sweep again without a reset: each face must be
    // solved with its new states.
    let heated: Vec<FaceStates> = faces
        .iter()
        .map(|f| {
            let v = f.left.velocity();
            let left =
                ConservedState::from_rho_velocity_temperature(&gas, f.left.rho, v, 600.0).unwrap();
            FaceStates {
                left,
                ..f.clone()
            }
        })
        .collect();
    let again = sweep_faces(&heated, &hllc, &cache).unwrap();
    for ((old, new), face) in forward.iter().zip(&again).zip(&heated) {
        let fresh = hllc
            .flux(&face.left, &face.right, &face.geometry.normal)
            .unwrap();
        assert_eq!(new.flux, fresh);
        assert_ne!(old.flux.flux, new.flux.flux);
    }
}

#[test]
fn boundary_flux_through_cache() {
    let eos: Arc<dyn EquationOfState> = Arc::new(IdealGas::air());
    let bf = BoundaryFlux::new(BoundaryKind::SlipWall, eos);
    let cache = FluxCache::new(1);
    let face = FaceGeometry::boundary(Id::from_index(4), 2, Id::from_index(1), Vec3::y());
    let interior = ConservedState::from_rho_velocity_temperature(
        &IdealGas::air(),
        RHO,
        Vec3::new(5.0, 10.0, 0.0),
        T,
    )
    .unwrap();
    let compute = || bf.boundary_flux(&interior, &face.normal, &BoundaryInputs::none());
    let key_inputs = interior.to_vector();
    let a = cache
        .get_or_compute(0, face.key(), key_inputs.as_slice(), compute)
        .unwrap();
    let b = cache
        .get_or_compute(0, face.key(), key_inputs.as_slice(), || unreachable!("cached"))
        .unwrap();
    assert_eq!(a, b);

    // Same key, different interior: the slot is recomputed.
    let moved = ConservedState::from_rho_velocity_temperature(
        &IdealGas::air(),
        RHO,
        Vec3::new(5.0, -10.0, 0.0),
        T,
    )
    .unwrap();
    let c = cache
        .get_or_compute(0, face.key(), moved.to_vector().as_slice(), || {
            bf.boundary_flux(&moved, &face.normal, &BoundaryInputs::none())
        })
        .unwrap();
    assert_ne!(a.flux, c.flux);
}
