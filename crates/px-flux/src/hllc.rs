//! HLLC approximate Riemann solver for the 3D Euler fluxes.
//!
//! Wave speeds follow Einfeldt (Roe-averaged bounds); contact speed, star
//! pressure and star states follow Batten et al., "On the choice of
//! wavespeeds for the HLLC Riemann solver", SIAM J. Sci. Comput. 18 (1997).
//!
//! ```text
//! 0 <= S_L          F = F(U_L)
//! S_L < 0 <= S_M    F = F(U*_L)
//! S_M < 0 <= S_R    F = F(U*_R)
//! S_R < 0           F = F(U_R)
//! ```
//!
//! Jacobians differentiate the selected formula with S_L and S_R frozen and
//! pressure linearized as dp = (γ-1)[½|u|², -u, 1]·dU with the local γ. This
//! is exact for the ideal gas; across region changes the Jacobian jumps.

use std::fmt;
use std::sync::Arc;

use nalgebra::SMatrix;
use px_core::numeric::Vec3;
use px_fluids::{EquationOfState, SOUND_SPEED_SQ_FLOOR};

use crate::error::{FluxError, RiemannResult};
use crate::state::{ConservedState, FluxJacobian, FluxRegion, FluxResult, FluxVector, NVARS};

/// Numerical flux between two states across an oriented face.
///
/// `normal` points from `left` into `right`.
pub trait RiemannSolver: Send + Sync {
    fn solve(
        &self,
        left: &ConservedState,
        right: &ConservedState,
        normal: &Vec3,
    ) -> RiemannResult<FluxResult>;
}

/// Outer wave speed estimates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveSpeeds {
    pub left: f64,
    pub right: f64,
}

/// Primitive view of one side of the face.
#[derive(Clone, Copy, Debug)]
struct Side {
    rho: f64,
    m: Vec3,
    e: f64,
    u: Vec3,
    /// Normal velocity u·n
    q: f64,
    p: f64,
    c: f64,
    gamma: f64,
}

impl Side {
    fn new(eos: &dyn EquationOfState, s: &ConservedState, n: &Vec3) -> RiemannResult<Self> {
        s.validate()?;
        let v = s.specific_volume();
        let e_int = s.specific_internal_energy();
        let u = s.velocity();
        Ok(Self {
            rho: s.rho,
            m: s.momentum,
            e: s.total_energy,
            u,
            q: u.dot(n),
            p: eos.pressure(v, e_int)?,
            c: eos.sound_speed(v, e_int)?,
            gamma: eos.gamma(v, e_int)?,
        })
    }

    /// Total specific enthalpy (ρE + p)/ρ
    fn enthalpy(&self) -> f64 {
        (self.e + self.p) / self.rho
    }

    fn flux(&self, n: &Vec3) -> FluxVector {
        let mom = self.m * self.q + n * self.p;
        FluxVector::new(
            self.rho * self.q,
            mom.x,
            mom.y,
            mom.z,
            (self.e + self.p) * self.q,
        )
    }

    /// ∂p/∂U with frozen γ.
    fn dp(&self) -> FluxVector {
        let g1 = self.gamma - 1.0;
        FluxVector::new(
            g1 * 0.5 * self.u.norm_squared(),
            -g1 * self.u.x,
            -g1 * self.u.y,
            -g1 * self.u.z,
            g1,
        )
    }

    /// ∂(u·n)/∂U
    fn dq(&self, n: &Vec3) -> FluxVector {
        let inv = 1.0 / self.rho;
        FluxVector::new(-self.q * inv, n.x * inv, n.y * inv, n.z * inv, 0.0)
    }

    fn flux_jacobian(&self, n: &Vec3) -> FluxJacobian {
        let dq = self.dq(n);
        let dp = self.dp();
        let mut a = FluxJacobian::zeros();
        a.set_row(0, &FluxVector::new(0.0, n.x, n.y, n.z, 0.0).transpose());
        for i in 0..3 {
            let mut row = dq * self.m[i] + dp * n[i];
            row[i + 1] += self.q;
            a.set_row(i + 1, &row.transpose());
        }
        let mut row = dq * (self.e + self.p) + dp * self.q;
        row[4] += self.q;
        a.set_row(4, &row.transpose());
        a
    }
}

const NSTACK: usize = 2 * NVARS;

/// Gradient with respect to the stacked states [U_L; U_R].
type Grad = nalgebra::SVector<f64, NSTACK>;

fn lift(g: &FluxVector, offset: usize) -> Grad {
    let mut out = Grad::zeros();
    out.fixed_rows_mut::<NVARS>(offset).copy_from(g);
    out
}

fn unit(index: usize) -> Grad {
    let mut out = Grad::zeros();
    out[index] = 1.0;
    out
}

/// Value and gradient of a side quantity, stacked over both states.
#[derive(Clone, Copy)]
struct Dual {
    v: f64,
    d: Grad,
}

impl Dual {
    fn new(v: f64, d: Grad) -> Self {
        Self { v, d }
    }
}

/// Per-side derivatives used by the star region.
struct SideTerms {
    offset: usize,
    speed: f64,
    /// ρ(S - q)
    a: Dual,
    q: Dual,
    p: Dual,
}

impl SideTerms {
    fn new(side: &Side, n: &Vec3, speed: f64, offset: usize) -> Self {
        let dj = lift(&FluxVector::new(0.0, n.x, n.y, n.z, 0.0), offset);
        Self {
            offset,
            speed,
            a: Dual::new(
                side.rho * (speed - side.q),
                unit(offset) * speed - dj,
            ),
            q: Dual::new(side.q, lift(&side.dq(n), offset)),
            p: Dual::new(side.p, lift(&side.dp(), offset)),
        }
    }
}

fn roe_speeds(l: &Side, r: &Side, n: &Vec3) -> WaveSpeeds {
    let wl = l.rho.sqrt();
    let wr = r.rho.sqrt();
    let inv = 1.0 / (wl + wr);
    let u = (l.u * wl + r.u * wr) * inv;
    let h = (l.enthalpy() * wl + r.enthalpy() * wr) * inv;
    let gamma = (l.gamma * wl + r.gamma * wr) * inv;
    let c = SOUND_SPEED_SQ_FLOOR
        .max((gamma - 1.0) * (h - 0.5 * u.norm_squared()))
        .sqrt();
    let q = u.dot(n);
    WaveSpeeds {
        left: (l.q - l.c).min(q - c),
        right: (r.q + r.c).max(q + c),
    }
}

/// HLLC flux with its equation of state bound at construction.
#[derive(Clone)]
pub struct HllcFlux {
    eos: Arc<dyn EquationOfState>,
}

impl fmt::Debug for HllcFlux {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HllcFlux")
            .field("eos", &self.eos.name())
            .finish()
    }
}

impl HllcFlux {
    pub fn new(eos: Arc<dyn EquationOfState>) -> Self {
        Self { eos }
    }

    pub fn eos(&self) -> &Arc<dyn EquationOfState> {
        &self.eos
    }

    /// Einfeldt estimates S_L = min(q_L - c_L, q̃ - c̃), S_R = max(q_R + c_R, q̃ + c̃).
    pub fn wave_speeds(
        &self,
        left: &ConservedState,
        right: &ConservedState,
        normal: &Vec3,
    ) -> RiemannResult<WaveSpeeds> {
        let l = Side::new(self.eos.as_ref(), left, normal)?;
        let r = Side::new(self.eos.as_ref(), right, normal)?;
        Ok(roe_speeds(&l, &r, normal))
    }

    /// Flux and Jacobians with caller-supplied outer wave speeds.
    pub fn flux_with_speeds(
        &self,
        left: &ConservedState,
        right: &ConservedState,
        normal: &Vec3,
        speeds: WaveSpeeds,
    ) -> RiemannResult<FluxResult> {
        let l = Side::new(self.eos.as_ref(), left, normal)?;
        let r = Side::new(self.eos.as_ref(), right, normal)?;
        evaluate(&l, &r, normal, speeds)
    }

    pub fn flux(
        &self,
        left: &ConservedState,
        right: &ConservedState,
        normal: &Vec3,
    ) -> RiemannResult<FluxResult> {
        let l = Side::new(self.eos.as_ref(), left, normal)?;
        let r = Side::new(self.eos.as_ref(), right, normal)?;
        let speeds = roe_speeds(&l, &r, normal);
        evaluate(&l, &r, normal, speeds)
    }
}

impl RiemannSolver for HllcFlux {
    fn solve(
        &self,
        left: &ConservedState,
        right: &ConservedState,
        normal: &Vec3,
    ) -> RiemannResult<FluxResult> {
        self.flux(left, right, normal)
    }
}

fn evaluate(l: &Side, r: &Side, n: &Vec3, speeds: WaveSpeeds) -> RiemannResult<FluxResult> {
    if !(speeds.left.is_finite() && speeds.right.is_finite()) {
        return Err(FluxError::NonFinite { what: "wave speed" });
    }
    if speeds.left >= 0.0 {
        return FluxResult {
            flux: l.flux(n),
            jac_left: l.flux_jacobian(n),
            jac_right: FluxJacobian::zeros(),
            region: FluxRegion::LeftSupersonic,
        }
        .ensure_finite();
    }
    if speeds.right < 0.0 {
        return FluxResult {
            flux: r.flux(n),
            jac_left: FluxJacobian::zeros(),
            jac_right: r.flux_jacobian(n),
            region: FluxRegion::RightSupersonic,
        }
        .ensure_finite();
    }

    let tl = SideTerms::new(l, n, speeds.left, 0);
    let tr = SideTerms::new(r, n, speeds.right, NVARS);

    // Contact speed S_M = N / D
    let num = tr.a.v * tr.q.v - tl.a.v * tl.q.v + tl.p.v - tr.p.v;
    let d_num = tr.a.d * tr.q.v + tr.q.d * tr.a.v - tl.a.d * tl.q.v - tl.q.d * tl.a.v + tl.p.d
        - tr.p.d;
    let den = tr.a.v - tl.a.v;
    let d_den = tr.a.d - tl.a.d;
    let s_m = num / den;
    let sm = Dual::new(s_m, (d_num - d_den * s_m) / den);

    // p* = p_L - ρ_L (S_L - q_L)(q_L - S_M)
    let p_star = Dual::new(
        tl.p.v - tl.a.v * (tl.q.v - sm.v),
        tl.p.d - tl.a.d * (tl.q.v - sm.v) - (tl.q.d - sm.d) * tl.a.v,
    );

    let (side, terms, region) = if sm.v >= 0.0 {
        (l, &tl, FluxRegion::LeftStar)
    } else {
        (r, &tr, FluxRegion::RightStar)
    };
    let (flux, jac) = star_flux(side, terms, n, sm, p_star);

    FluxResult {
        flux,
        jac_left: jac.fixed_view::<NVARS, NVARS>(0, 0).into_owned(),
        jac_right: jac.fixed_view::<NVARS, NVARS>(0, NVARS).into_owned(),
        region,
    }
    .ensure_finite()
}

/// Flux of the star state on one side and its stacked gradient.
fn star_flux(
    side: &Side,
    t: &SideTerms,
    n: &Vec3,
    sm: Dual,
    p_star: Dual,
) -> (FluxVector, SMatrix<f64, NVARS, NSTACK>) {
    let omega = 1.0 / (t.speed - sm.v);
    let d_omega = sm.d * (omega * omega);
    let b = t.speed - side.q;
    let d_b = -t.q.d;

    let rho = omega * t.a.v;
    let d_rho = d_omega * t.a.v + t.a.d * omega;

    let mut flux = FluxVector::zeros();
    let mut jac = SMatrix::<f64, NVARS, NSTACK>::zeros();

    flux[0] = rho * sm.v;
    jac.set_row(0, &(d_rho * sm.v + sm.d * rho).transpose());

    let dp_jump = p_star.d - t.p.d;
    for i in 0..3 {
        let inner = b * side.m[i] + (p_star.v - t.p.v) * n[i];
        let d_inner = d_b * side.m[i] + unit(t.offset + 1 + i) * b + dp_jump * n[i];
        let m = omega * inner;
        let d_m = d_omega * inner + d_inner * omega;
        flux[i + 1] = m * sm.v + p_star.v * n[i];
        jac.set_row(
            i + 1,
            &(d_m * sm.v + sm.d * m + p_star.d * n[i]).transpose(),
        );
    }

    let inner = b * side.e - t.p.v * side.q + p_star.v * sm.v;
    let d_inner = d_b * side.e + unit(t.offset + 4) * b - t.p.d * side.q - t.q.d * t.p.v
        + p_star.d * sm.v
        + sm.d * p_star.v;
    let e = omega * inner;
    let d_e = d_omega * inner + d_inner * omega;
    flux[4] = (e + p_star.v) * sm.v;
    jac.set_row(4, &((d_e + p_star.d) * sm.v + sm.d * (e + p_star.v)).transpose());

    (flux, jac)
}

/// Physical Euler flux F(U)·n.
pub fn physical_flux(
    eos: &dyn EquationOfState,
    state: &ConservedState,
    normal: &Vec3,
) -> RiemannResult<FluxVector> {
    Ok(Side::new(eos, state, normal)?.flux(normal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jacobian::central_difference_jacobian;
    use px_fluids::IdealGas;

    fn solver() -> HllcFlux {
        HllcFlux::new(Arc::new(IdealGas::air()))
    }

    fn state(rho: f64, velocity: Vec3, t: f64) -> ConservedState {
        ConservedState::from_rho_velocity_temperature(&IdealGas::air(), rho, velocity, t).unwrap()
    }

    fn assert_close(analytic: &FluxJacobian, numeric: &FluxJacobian) {
        for i in 0..NVARS {
            let scale = numeric.row(i).abs().max().max(1.0);
            for j in 0..NVARS {
                let (a, b) = (analytic[(i, j)], numeric[(i, j)]);
                assert!(
                    (a - b).abs() <= 1e-6 * scale + 1e-4 * b.abs(),
                    "entry ({i}, {j}): analytic {a}, numeric {b}"
                );
            }
        }
    }

    #[test]
    fn identical_states_give_physical_flux() {
        let hllc = solver();
        let gas = IdealGas::air();
        let n = Vec3::new(0.6, 0.0, 0.8);
        for velocity in [
            Vec3::zeros(),
            Vec3::new(30.0, -5.0, 2.0),
            Vec3::new(-80.0, 0.0, 40.0),
            Vec3::new(600.0, 0.0, 600.0),
        ] {
            let s = state(1.1, velocity, 320.0);
            let f = hllc.flux(&s, &s, &n).unwrap();
            let exact = physical_flux(&gas, &s, &n).unwrap();
            for i in 0..NVARS {
                assert!(
                    (f.flux[i] - exact[i]).abs() <= 1e-9 * exact[i].abs().max(1.0),
                    "component {i} for {velocity:?}"
                );
            }
        }
    }

    #[test]
    fn region_selection() {
        let hllc = solver();
        let n = Vec3::x();
        let fast = state(1.2, Vec3::new(800.0, 0.0, 0.0), 300.0);
        let r = hllc.flux(&fast, &fast, &n).unwrap();
        assert_eq!(r.region, FluxRegion::LeftSupersonic);
        let r = hllc.flux(&fast, &fast, &-n).unwrap();
        assert_eq!(r.region, FluxRegion::RightSupersonic);

        let a = state(1.2, Vec3::new(60.0, 0.0, 0.0), 300.0);
        let b = state(1.0, Vec3::new(40.0, 0.0, 0.0), 330.0);
        assert_eq!(hllc.flux(&a, &b, &n).unwrap().region, FluxRegion::LeftStar);
        let a = state(1.2, Vec3::new(-60.0, 0.0, 0.0), 300.0);
        let b = state(1.0, Vec3::new(-40.0, 0.0, 0.0), 330.0);
        assert_eq!(hllc.flux(&a, &b, &n).unwrap().region, FluxRegion::RightStar);
    }

    #[test]
    fn swapping_sides_negates_flux() {
        let hllc = solver();
        let n = Vec3::new(0.0, 0.6, 0.8);
        let a = state(1.3, Vec3::new(10.0, 40.0, -20.0), 290.0);
        let b = state(0.9, Vec3::new(-5.0, 0.0, 15.0), 350.0);
        let f = hllc.flux(&a, &b, &n).unwrap();
        let g = hllc.flux(&b, &a, &-n).unwrap();
        for i in 0..NVARS {
            assert!((f.flux[i] + g.flux[i]).abs() <= 1e-9 * f.flux[i].abs().max(1.0));
        }
    }

    #[test]
    fn supersonic_jacobian_matches_finite_differences() {
        let hllc = solver();
        let n = Vec3::new(0.8, 0.6, 0.0);
        let left = state(1.2, Vec3::new(700.0, 500.0, 10.0), 300.0);
        let right = state(1.0, Vec3::new(650.0, 480.0, 0.0), 280.0);
        let r = hllc.flux(&left, &right, &n).unwrap();
        assert_eq!(r.region, FluxRegion::LeftSupersonic);
        assert_eq!(r.jac_right, FluxJacobian::zeros());

        let numeric = central_difference_jacobian(
            &left.to_vector(),
            |u| Ok(hllc.flux(&ConservedState::from_vector(u), &right, &n)?.flux),
            1e-6,
        )
        .unwrap();
        assert_close(&r.jac_left, &numeric);
    }

    #[test]
    fn star_jacobians_match_finite_differences_with_frozen_speeds() {
        let hllc = solver();
        let n = Vec3::new(0.6, 0.8, 0.0);
        let cases = [
            (
                state(1.2, Vec3::new(60.0, 20.0, 5.0), 300.0),
                state(1.0, Vec3::new(40.0, 10.0, -5.0), 330.0),
                FluxRegion::LeftStar,
            ),
            (
                state(1.2, Vec3::new(-60.0, -20.0, 5.0), 300.0),
                state(1.0, Vec3::new(-40.0, -10.0, -5.0), 330.0),
                FluxRegion::RightStar,
            ),
        ];
        for (left, right, region) in cases {
            let speeds = hllc.wave_speeds(&left, &right, &n).unwrap();
            let r = hllc.flux_with_speeds(&left, &right, &n, speeds).unwrap();
            assert_eq!(r.region, region);

            let d_left = central_difference_jacobian(
                &left.to_vector(),
                |u| {
                    let s = ConservedState::from_vector(u);
                    Ok(hllc.flux_with_speeds(&s, &right, &n, speeds)?.flux)
                },
                1e-6,
            )
            .unwrap();
            let d_right = central_difference_jacobian(
                &right.to_vector(),
                |u| {
                    let s = ConservedState::from_vector(u);
                    Ok(hllc.flux_with_speeds(&left, &s, &n, speeds)?.flux)
                },
                1e-6,
            )
            .unwrap();
            assert_close(&r.jac_left, &d_left);
            assert_close(&r.jac_right, &d_right);
        }
    }

    #[test]
    fn wall_state_pair_has_zero_mass_flux() {
        let hllc = solver();
        let s = state(1.2, Vec3::zeros(), 300.0);
        let r = hllc.flux(&s, &s, &Vec3::x()).unwrap();
        assert_eq!(r.region, FluxRegion::LeftStar);
        assert!(r.flux[0].abs() < 1e-12);
        let p = 1.2 * 287.058 * 300.0;
        assert!((r.flux[1] - p).abs() < 1e-6);
    }

    #[test]
    fn invalid_state_is_reported() {
        let hllc = solver();
        let good = state(1.2, Vec3::zeros(), 300.0);
        let bad = ConservedState::new(-1.0, Vec3::zeros(), 1.0);
        assert!(matches!(
            hllc.flux(&good, &bad, &Vec3::x()),
            Err(FluxError::NonPhysicalState { .. })
        ));
    }
}
