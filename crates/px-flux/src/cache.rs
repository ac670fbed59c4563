//! Per-thread memoization of face fluxes within one assembly pass.
//!
//! Residual and Jacobian evaluation visit the same face several times; the
//! cache lets every visit after the first reuse one Riemann solve. Each worker
//! thread owns a slot remembering the key and the inputs of its last
//! computation. A hit needs both to match exactly, so a face revisited with
//! updated states is solved again even when nobody reset the cache. A single
//! mutex guards key comparison and recomputation, and results leave the cache
//! by value.

use std::sync::Mutex;

use px_core::ids::FaceKey;
use px_core::numeric::Vec3;

use crate::error::{FluxError, RiemannResult};
use crate::hllc::RiemannSolver;
use crate::state::{ConservedState, FluxResult, NVARS};

#[derive(Clone, Debug, Default)]
struct Slot {
    key: Option<FaceKey>,
    inputs: Vec<f64>,
    result: Option<FluxResult>,
}

impl Slot {
    fn holds(&self, key: FaceKey, inputs: &[f64]) -> bool {
        self.key == Some(key) && self.result.is_some() && self.inputs.as_slice() == inputs
    }
}

/// Everything an oriented Riemann solve depends on, flattened for comparison.
fn solve_inputs(
    left: &ConservedState,
    right: &ConservedState,
    normal: &Vec3,
) -> [f64; 2 * NVARS + 3] {
    let mut inputs = [0.0; 2 * NVARS + 3];
    inputs[..NVARS].copy_from_slice(left.to_vector().as_slice());
    inputs[NVARS..2 * NVARS].copy_from_slice(right.to_vector().as_slice());
    inputs[2 * NVARS..].copy_from_slice(normal.as_slice());
    inputs
}

/// Flux cache with one slot per worker thread.
#[derive(Debug)]
pub struct FluxCache {
    slots: Mutex<Vec<Slot>>,
}

impl FluxCache {
    pub fn new(threads: usize) -> Self {
        Self {
            slots: Mutex::new(vec![Slot::default(); threads.max(1)]),
        }
    }

    /// One slot per thread of the current rayon pool.
    pub fn for_current_pool() -> Self {
        Self::new(rayon::current_num_threads())
    }

    pub fn threads(&self) -> usize {
        self.slots.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Return the cached result for `key` on `thread`, or compute and store it.
    ///
    /// `inputs` are the values `compute` depends on; a slot holding the same
    /// key with different inputs is recomputed.
    pub fn get_or_compute<F>(
        &self,
        thread: usize,
        key: FaceKey,
        inputs: &[f64],
        compute: F,
    ) -> RiemannResult<FluxResult>
    where
        F: FnOnce() -> RiemannResult<FluxResult>,
    {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| FluxError::CachePoisoned { key })?;
        let len = slots.len();
        let slot = slots
            .get_mut(thread)
            .ok_or(FluxError::ThreadOutOfRange { thread, slots: len })?;

        if slot.holds(key, inputs) {
            if let Some(result) = &slot.result {
                return Ok(result.clone());
            }
        }

        tracing::trace!(thread, %key, "flux cache miss");
        // Clear first so a failed computation never leaves a stale pairing.
        slot.key = None;
        slot.result = None;
        let result = compute()?;
        slot.key = Some(key);
        slot.inputs.clear();
        slot.inputs.extend_from_slice(inputs);
        slot.result = Some(result.clone());
        Ok(result)
    }

    /// Cached Riemann solve for an oriented (left, right, normal) triple.
    pub fn get_flux(
        &self,
        thread: usize,
        key: FaceKey,
        solver: &dyn RiemannSolver,
        left: &ConservedState,
        right: &ConservedState,
        normal: &Vec3,
    ) -> RiemannResult<FluxResult> {
        let inputs = solve_inputs(left, right, normal);
        self.get_or_compute(thread, key, &inputs, || solver.solve(left, right, normal))
    }

    /// Forget every slot; call at the start of an assembly pass.
    pub fn reset(&self) -> RiemannResult<()> {
        let mut slots = self.slots.lock().map_err(|_| FluxError::InvalidArg {
            what: "flux cache lock poisoned during reset".to_string(),
        })?;
        for slot in slots.iter_mut() {
            *slot = Slot::default();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{FluxJacobian, FluxRegion, FluxVector};
    use px_core::ids::Id;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns the left density as mass flux and counts its calls.
    struct CountingSolver {
        calls: AtomicUsize,
    }

    impl CountingSolver {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl RiemannSolver for CountingSolver {
        fn solve(
            &self,
            left: &ConservedState,
            _right: &ConservedState,
            _normal: &Vec3,
        ) -> RiemannResult<FluxResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(FluxResult {
                flux: FluxVector::new(left.rho, 0.0, 0.0, 0.0, 0.0),
                jac_left: FluxJacobian::identity(),
                jac_right: FluxJacobian::zeros(),
                region: FluxRegion::LeftStar,
            })
        }
    }

    fn state(rho: f64) -> ConservedState {
        ConservedState::new(rho, Vec3::zeros(), 2.5e5)
    }

    #[test]
    fn repeated_key_reuses_result() {
        let cache = FluxCache::new(2);
        let solver = CountingSolver::new();
        let key = FaceKey::new(1, Id::from_index(3));
        let n = Vec3::x();
        let a = cache.get_flux(0, key, &solver, &state(1.0), &state(2.0), &n).unwrap();
        let b = cache.get_flux(0, key, &solver, &state(1.0), &state(2.0), &n).unwrap();
        assert_eq!(solver.calls(), 1);
        assert_eq!(a, b);
    }

    #[test]
    fn new_key_or_reset_recomputes() {
        let cache = FluxCache::new(1);
        let solver = CountingSolver::new();
        let n = Vec3::x();
        let k1 = FaceKey::new(0, Id::from_index(0));
        let k2 = FaceKey::new(1, Id::from_index(0));
        cache.get_flux(0, k1, &solver, &state(1.0), &state(1.0), &n).unwrap();
        let r = cache.get_flux(0, k2, &solver, &state(3.0), &state(1.0), &n).unwrap();
        assert_eq!(r.flux[0], 3.0);
        assert_eq!(solver.calls(), 2);

        cache.reset().unwrap();
        cache.get_flux(0, k2, &solver, &state(3.0), &state(1.0), &n).unwrap();
        assert_eq!(solver.calls(), 3);
    }

    #[test]
    fn changed_states_under_the_same_key_recompute() {
        let cache = FluxCache::new(1);
        let solver = CountingSolver::new();
        let n = Vec3::x();
        let key = FaceKey::new(0, Id::from_index(0));
        let first = cache.get_flux(0, key, &solver, &state(1.0), &state(1.0), &n).unwrap();
        let second = cache.get_flux(0, key, &solver, &state(4.0), &state(1.0), &n).unwrap();
        assert_eq!(first.flux[0], 1.0);
        assert_eq!(second.flux[0], 4.0);
        assert_eq!(solver.calls(), 2);

        // A different normal is a different problem too.
        cache.get_flux(0, key, &solver, &state(4.0), &state(1.0), &Vec3::y()).unwrap();
        assert_eq!(solver.calls(), 3);
    }

    #[test]
    fn slots_keep_their_own_keys() {
        let cache = FluxCache::new(2);
        let solver = CountingSolver::new();
        let n = Vec3::x();
        let k1 = FaceKey::new(0, Id::from_index(1));
        let k2 = FaceKey::new(0, Id::from_index(2));
        cache.get_flux(0, k1, &solver, &state(1.0), &state(1.0), &n).unwrap();
        cache.get_flux(1, k2, &solver, &state(2.0), &state(1.0), &n).unwrap();
        // Thread 1 moving to a new key must not make thread 0 return its result.
        let r = cache.get_flux(0, k1, &solver, &state(1.0), &state(1.0), &n).unwrap();
        assert_eq!(r.flux[0], 1.0);
        assert_eq!(solver.calls(), 2);
    }

    #[test]
    fn failed_computation_is_not_cached() {
        let cache = FluxCache::new(1);
        let key = FaceKey::new(0, Id::from_index(0));
        let err = cache
            .get_or_compute(0, key, &[], || Err(FluxError::NonFinite { what: "flux" }))
            .unwrap_err();
        assert_eq!(err, FluxError::NonFinite { what: "flux" });
        let solver = CountingSolver::new();
        cache
            .get_flux(0, key, &solver, &state(1.0), &state(1.0), &Vec3::x())
            .unwrap();
        assert_eq!(solver.calls(), 1);
    }

    #[test]
    fn thread_index_out_of_range() {
        let cache = FluxCache::new(2);
        let solver = CountingSolver::new();
        let err = cache
            .get_flux(
                5,
                FaceKey::new(0, Id::from_index(0)),
                &solver,
                &state(1.0),
                &state(1.0),
                &Vec3::x(),
            )
            .unwrap_err();
        assert_eq!(err, FluxError::ThreadOutOfRange { thread: 5, slots: 2 });
    }
}
