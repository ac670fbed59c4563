//! Cross-model checks on the equation-of-state seam.
//!
//! Both models must agree near 300 K, honor the pressure and sound-speed
//! floors, and report unsupported relations as errors.

use std::sync::Arc;

use proptest::prelude::*;
use px_fluids::{
    EquationOfState, FluidError, IdealGas, PRESSURE_FLOOR, SOUND_SPEED_SQ_FLOOR, TabulatedAir,
};

fn models() -> Vec<Arc<dyn EquationOfState>> {
    vec![
        Arc::new(IdealGas::air()),
        Arc::new(TabulatedAir::new().unwrap()),
    ]
}

#[test]
fn air_models_agree_near_300k() {
    let ideal = IdealGas::air();
    let table = TabulatedAir::new().unwrap();
    let v = 1.0 / 1.177;
    let u_table = 215340.0;

    let t_table = table.temperature(v, u_table).unwrap();
    assert_eq!(t_table, 300.0);

    let u_ideal = ideal.cv(v, 0.0).unwrap() * 300.0;
    let p_ideal = ideal.pressure(v, u_ideal).unwrap();
    let p_table = table.pressure(v, u_table).unwrap();
    let rel = (p_ideal - p_table).abs() / p_ideal;
    assert!(rel < 0.01, "p_ideal = {p_ideal}, p_table = {p_table}");

    let c_ideal = ideal.sound_speed(v, u_ideal).unwrap();
    let c_table = table.sound_speed(v, u_table).unwrap();
    assert!((c_ideal - c_table).abs() < 1.0);
}

#[test]
fn property_pack_for_both_models() {
    for eos in models() {
        let pack = eos.property_pack(1.0 / 1.2, 215340.0).unwrap();
        assert!(pack.p.value > 0.0, "{}", eos.name());
        assert!(pack.gamma > 1.0);
        assert!(pack.summary().starts_with("Pack("));
    }
}

#[test]
fn tabulated_air_is_shareable_across_threads() {
    let eos: Arc<dyn EquationOfState> = Arc::new(TabulatedAir::new().unwrap());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let eos = Arc::clone(&eos);
            std::thread::spawn(move || eos.temperature(1.0, 215340.0 + 1000.0 * i as f64))
        })
        .collect();
    for h in handles {
        let t = h.join().unwrap().unwrap();
        assert!((300.0..310.0).contains(&t));
    }
}

#[test]
fn out_of_range_energy_propagates_as_range_error() {
    let table = TabulatedAir::new().unwrap();
    let err = table.sound_speed(1.0, 2.0e6).unwrap_err();
    assert!(err.is_out_of_range());
    assert!(err.to_string().contains("upper bound"));
}

#[test]
fn not_implemented_names_model_and_method() {
    let table = TabulatedAir::new().unwrap();
    let err = table.entropy(1.0, 215340.0).unwrap_err();
    assert_eq!(
        err,
        FluidError::NotImplemented {
            model: "TabulatedAir",
            what: "entropy"
        }
    );
    assert_eq!(err.to_string(), "TabulatedAir: entropy() not implemented");
}

proptest! {
    #[test]
    fn pressure_never_below_floor(v in 1e-3f64..10.0, u in -1e6f64..1e6) {
        let gas = IdealGas::air();
        let p = gas.pressure(v, u).unwrap();
        prop_assert!(p >= PRESSURE_FLOOR);
        prop_assert!(p.is_finite());
    }

    #[test]
    fn sound_speed_never_below_floor(v in 1e-3f64..10.0, u in -1e6f64..1e6) {
        let gas = IdealGas::air();
        let c = gas.sound_speed(v, u).unwrap();
        prop_assert!(c * c >= SOUND_SPEED_SQ_FLOOR * (1.0 - 1e-12));
    }

    #[test]
    fn tabulated_temperature_monotone_in_energy(
        u1 in 125160.0f64..1818110.0,
        u2 in 125160.0f64..1818110.0,
    ) {
        let air = TabulatedAir::new().unwrap();
        let (lo, hi) = if u1 <= u2 { (u1, u2) } else { (u2, u1) };
        let t_lo = air.temperature(1.0, lo).unwrap();
        let t_hi = air.temperature(1.0, hi).unwrap();
        prop_assert!(t_lo <= t_hi);
        prop_assert!((175.0..=1900.0).contains(&t_lo));
    }
}
