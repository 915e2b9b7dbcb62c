// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Adaptive Stiff Integration Methods
// ─────────────────────────────────────────────────────────────────────
//! Two linearly implicit/implicit one-step methods behind a common
//! trait, each with its own step budget and the shared wall-clock
//! deadline:
//!
//! - `Rosenbrock23`: the L-stable second-order Rosenbrock W-method with
//!   an embedded third-order error estimate (Shampine & Reichelt).
//! - `ImplicitEuler`: backward Euler with simplified Newton iterations,
//!   step-doubling error control and local Richardson extrapolation.
//!
//! Both use a forward-difference Jacobian and 5×5 LU solves.

use std::fmt;
use std::time::Instant;

use nalgebra::SMatrix;
use serde::{Deserialize, Serialize};

use ssz_types::{SszError, SszResult};

use crate::system::{State, StructureSystem};

type Jacobian = SMatrix<f64, 5, 5>;

/// Step-size bounds of the controllers.
const MAX_GROWTH: f64 = 5.0;
const MIN_SHRINK: f64 = 0.2;
const SAFETY: f64 = 0.8;
/// Newton iterations per implicit solve.
const NEWTON_MAX_ITER: usize = 10;
/// Scaled Newton increment accepted as converged.
const NEWTON_TOL: f64 = 1e-2;

/// Identifies an integration method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    Rosenbrock23,
    ImplicitEuler,
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodKind::Rosenbrock23 => write!(f, "rosenbrock23"),
            MethodKind::ImplicitEuler => write!(f, "implicit-euler"),
        }
    }
}

/// Step counters of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationStats {
    pub accepted: usize,
    pub rejected: usize,
    pub rhs_evals: usize,
}

/// Initial-value problem on [t0, t1], t1 > t0.
#[derive(Debug, Clone, Copy)]
pub struct Problem<'a> {
    pub system: &'a StructureSystem,
    pub t0: f64,
    pub t1: f64,
    pub y0: State,
    /// Step ceiling in the independent variable.
    pub max_step: Option<f64>,
    pub rtol: f64,
    pub atol: f64,
}

/// Resource limits of one method attempt.
#[derive(Debug, Clone, Copy)]
pub struct Budget {
    pub max_steps: usize,
    pub deadline: Instant,
    pub timeout_ms: u64,
}

impl Budget {
    fn check(&self, stats: &IntegrationStats, t: f64) -> SszResult<()> {
        if Instant::now() >= self.deadline {
            return Err(SszError::Timeout {
                deadline_ms: self.timeout_ms,
            });
        }
        if stats.accepted + stats.rejected >= self.max_steps {
            return Err(SszError::NonConvergence(format!(
                "step budget of {} exhausted at t = {t:.6e}",
                self.max_steps
            )));
        }
        Ok(())
    }
}

/// Accepted nodes of a run.
#[derive(Debug, Clone, Default)]
pub struct Trajectory {
    pub t: Vec<f64>,
    pub y: Vec<State>,
    pub stats: IntegrationStats,
}

impl Trajectory {
    fn start(t0: f64, y0: State) -> Self {
        Self {
            t: vec![t0],
            y: vec![y0],
            stats: IntegrationStats::default(),
        }
    }

    fn push(&mut self, t: f64, y: State) {
        self.t.push(t);
        self.y.push(y);
        self.stats.accepted += 1;
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }
}

/// An adaptive integration method.
pub trait StiffMethod: Send + Sync {
    fn kind(&self) -> MethodKind;

    fn integrate(&self, problem: &Problem<'_>, budget: &Budget) -> SszResult<Trajectory>;
}

// ── shared helpers ──────────────────────────────────────────────────

fn eval(problem: &Problem<'_>, stats: &mut IntegrationStats, t: f64, y: &State) -> SszResult<State> {
    stats.rhs_evals += 1;
    problem.system.rhs(t, y)
}

/// Forward-difference Jacobian ∂f/∂y around (t, y) with f0 = f(t, y).
fn jacobian(
    problem: &Problem<'_>,
    stats: &mut IntegrationStats,
    t: f64,
    y: &State,
    f0: &State,
) -> SszResult<Jacobian> {
    let sqrt_eps = f64::EPSILON.sqrt();
    let mut jac = Jacobian::zeros();
    for j in 0..5 {
        let delta = sqrt_eps * y[j].abs().max(1.0);
        let mut shifted = *y;
        shifted[j] += delta;
        let column = (eval(problem, stats, t, &shifted)? - *f0) / delta;
        jac.set_column(j, &column);
    }
    Ok(jac)
}

/// Max-norm of `err` scaled by atol + rtol·max(|y0|, |y1|).
fn error_norm(err: &State, y0: &State, y1: &State, rtol: f64, atol: f64) -> f64 {
    let mut norm: f64 = 0.0;
    for i in 0..5 {
        let scale = atol + rtol * y0[i].abs().max(y1[i].abs());
        norm = norm.max((err[i] / scale).abs());
    }
    if norm.is_finite() {
        norm
    } else {
        f64::INFINITY
    }
}

fn initial_step(problem: &Problem<'_>) -> f64 {
    let span = problem.t1 - problem.t0;
    let h = 1e-3 * span;
    problem.max_step.map_or(h, |m| h.min(m))
}

fn step_floor(t: f64) -> f64 {
    16.0 * f64::EPSILON * t.abs().max(1.0)
}

fn all_finite(y: &State) -> bool {
    y.iter().all(|v| v.is_finite())
}

// ── Rosenbrock23 ────────────────────────────────────────────────────

/// Second-order Rosenbrock W-method with third-order error estimate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rosenbrock23;

impl StiffMethod for Rosenbrock23 {
    fn kind(&self) -> MethodKind {
        MethodKind::Rosenbrock23
    }

    fn integrate(&self, problem: &Problem<'_>, budget: &Budget) -> SszResult<Trajectory> {
        let d = 1.0 / (2.0 + std::f64::consts::SQRT_2);
        let e32 = 6.0 + std::f64::consts::SQRT_2;
        let h_max = problem.max_step.unwrap_or(f64::INFINITY);

        let mut out = Trajectory::start(problem.t0, problem.y0);
        let mut t = problem.t0;
        let mut y = problem.y0;
        let mut f0 = eval(problem, &mut out.stats, t, &y)?;
        let mut h = initial_step(problem);

        while t < problem.t1 {
            budget.check(&out.stats, t)?;
            if h < step_floor(t) {
                return Err(SszError::NonConvergence(format!(
                    "rosenbrock23 step size underflow at t = {t:.6e}"
                )));
            }
            let last = t + h >= problem.t1;
            if last {
                h = problem.t1 - t;
            }

            let jac = jacobian(problem, &mut out.stats, t, &y, &f0)?;
            let dt = f64::EPSILON.sqrt() * t.abs().max(1.0);
            let dfdt = (eval(problem, &mut out.stats, t + dt, &y)? - f0) / dt;

            let w = Jacobian::identity() - jac * (h * d);
            let lu = w.lu();
            let k1 = match lu.solve(&(f0 + dfdt * (h * d))) {
                Some(k1) if all_finite(&k1) => k1,
                _ => {
                    out.stats.rejected += 1;
                    h *= 0.25;
                    continue;
                }
            };
            let f1 = eval(problem, &mut out.stats, t + 0.5 * h, &(y + k1 * (0.5 * h)))?;
            let k2 = match lu.solve(&(f1 - k1)) {
                Some(v) => v + k1,
                None => {
                    out.stats.rejected += 1;
                    h *= 0.25;
                    continue;
                }
            };
            let y_new = y + k2 * h;
            let f2 = eval(problem, &mut out.stats, t + h, &y_new)?;
            let k3_rhs = f2 - (k2 - f1) * e32 - (k1 - f0) * 2.0 + dfdt * (h * d);
            let k3 = match lu.solve(&k3_rhs) {
                Some(v) => v,
                None => {
                    out.stats.rejected += 1;
                    h *= 0.25;
                    continue;
                }
            };

            let err = (k1 - k2 * 2.0 + k3) * (h / 6.0);
            let norm = if all_finite(&y_new) {
                error_norm(&err, &y, &y_new, problem.rtol, problem.atol)
            } else {
                f64::INFINITY
            };

            if norm <= 1.0 {
                t = if last { problem.t1 } else { t + h };
                y = y_new;
                f0 = f2;
                out.push(t, y);
                let growth = if norm == 0.0 {
                    MAX_GROWTH
                } else {
                    (SAFETY * norm.powf(-1.0 / 3.0)).clamp(MIN_SHRINK, MAX_GROWTH)
                };
                h = (h * growth).min(h_max);
            } else {
                out.stats.rejected += 1;
                let shrink = if norm.is_finite() {
                    (SAFETY * norm.powf(-1.0 / 3.0)).clamp(MIN_SHRINK, 1.0)
                } else {
                    MIN_SHRINK
                };
                h *= shrink;
            }
        }
        Ok(out)
    }
}

// ── Implicit Euler with step doubling ───────────────────────────────

/// Backward Euler; the local error is the difference between one full
/// step and two half steps, and the accepted value is 2·y_half − y_full.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImplicitEuler;

impl ImplicitEuler {
    /// Solve z = y + h·f(t + h, z) by simplified Newton. `None` when the
    /// iteration matrix is singular or Newton does not converge.
    fn implicit_step(
        problem: &Problem<'_>,
        stats: &mut IntegrationStats,
        jac: &Jacobian,
        t: f64,
        y: &State,
        f_start: &State,
        h: f64,
    ) -> SszResult<Option<State>> {
        let lu = (Jacobian::identity() - *jac * h).lu();
        let mut z = *y + *f_start * h;
        for _ in 0..NEWTON_MAX_ITER {
            let residual = z - *y - eval(problem, stats, t + h, &z)? * h;
            let dz = match lu.solve(&residual) {
                Some(dz) if all_finite(&dz) => dz,
                _ => return Ok(None),
            };
            z -= dz;
            if error_norm(&dz, y, &z, problem.rtol, problem.atol) <= NEWTON_TOL {
                return Ok(Some(z));
            }
        }
        Ok(None)
    }
}

impl StiffMethod for ImplicitEuler {
    fn kind(&self) -> MethodKind {
        MethodKind::ImplicitEuler
    }

    fn integrate(&self, problem: &Problem<'_>, budget: &Budget) -> SszResult<Trajectory> {
        let h_max = problem.max_step.unwrap_or(f64::INFINITY);

        let mut out = Trajectory::start(problem.t0, problem.y0);
        let mut t = problem.t0;
        let mut y = problem.y0;
        let mut h = initial_step(problem);

        while t < problem.t1 {
            budget.check(&out.stats, t)?;
            if h < step_floor(t) {
                return Err(SszError::NonConvergence(format!(
                    "implicit-euler step size underflow at t = {t:.6e}"
                )));
            }
            let last = t + h >= problem.t1;
            if last {
                h = problem.t1 - t;
            }

            let f_start = eval(problem, &mut out.stats, t, &y)?;
            let jac = jacobian(problem, &mut out.stats, t, &y, &f_start)?;
            let half = 0.5 * h;

            let full = Self::implicit_step(problem, &mut out.stats, &jac, t, &y, &f_start, h)?;
            let first =
                Self::implicit_step(problem, &mut out.stats, &jac, t, &y, &f_start, half)?;
            let second = match first {
                Some(mid) => {
                    let f_mid = eval(problem, &mut out.stats, t + half, &mid)?;
                    Self::implicit_step(problem, &mut out.stats, &jac, t + half, &mid, &f_mid, half)?
                }
                None => None,
            };

            let (full, fine) = match (full, second) {
                (Some(a), Some(b)) => (a, b),
                _ => {
                    out.stats.rejected += 1;
                    h *= 0.25;
                    continue;
                }
            };

            let norm = error_norm(&(fine - full), &y, &fine, problem.rtol, problem.atol);
            if norm <= 1.0 {
                t = if last { problem.t1 } else { t + h };
                y = fine * 2.0 - full;
                out.push(t, y);
                let growth = if norm == 0.0 {
                    MAX_GROWTH
                } else {
                    (0.9 * norm.powf(-0.5)).clamp(MIN_SHRINK, MAX_GROWTH)
                };
                h = (h * growth).min(h_max);
            } else {
                out.stats.rejected += 1;
                let shrink = if norm.is_finite() {
                    (0.9 * norm.powf(-0.5)).clamp(MIN_SHRINK, 1.0)
                } else {
                    MIN_SHRINK
                };
                h *= shrink;
            }
        }
        Ok(out)
    }
}
