// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Structure Integration Driver
// ─────────────────────────────────────────────────────────────────────
//! Runs the ordered method list under one wall-clock deadline:
//!
//!   NotStarted → Integrating(primary) → Succeeded
//!                                     ↘ Integrating(fallback) → Succeeded
//!   any attempt → AbortedHorizon  (guard trip, never retried)
//!   last attempt → Failed
//!
//! A method that fails to converge hands over to the next one; a
//! horizon-guard trip or an expired deadline ends the run.

use std::time::{Duration, Instant};

use ssz_physics::{schwarzschild_radius, ScalarAction};
use ssz_types::{IntegrationCoordinate, IntegrationMode, SszError, SszResult, TovConfig};

use crate::methods::{Budget, ImplicitEuler, MethodKind, Problem, Rosenbrock23, StiffMethod};
use crate::solution::{OutputGrid, TovSolution};
use crate::system::{State, StructureSystem, IDX_MASS};

/// Fewest accepted nodes a usable trajectory may have.
const MIN_NODES: usize = 2;
/// 2m0/r_min above this is reported as a suspicious seed.
const SEED_WARN_RATIO: f64 = 0.9;

/// Lifecycle of one integration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverState {
    NotStarted,
    Integrating(MethodKind),
    Succeeded(MethodKind),
    AbortedHorizon,
    Failed,
}

/// Structure-equation integrator for one central mass.
pub struct TovSolver {
    config: TovConfig,
    r_s: f64,
    geometric_mass: f64,
    system: StructureSystem,
    methods: Vec<Box<dyn StiffMethod>>,
    state: SolverState,
}

impl TovSolver {
    /// Primary Rosenbrock, fallback implicit Euler.
    pub fn new(mass_kg: f64, g: f64, c: f64, config: TovConfig) -> SszResult<Self> {
        Self::with_methods(
            mass_kg,
            g,
            c,
            config,
            vec![Box::new(Rosenbrock23), Box::new(ImplicitEuler)],
        )
    }

    /// Custom ordered method list.
    pub fn with_methods(
        mass_kg: f64,
        g: f64,
        c: f64,
        config: TovConfig,
        methods: Vec<Box<dyn StiffMethod>>,
    ) -> SszResult<Self> {
        if !(mass_kg > 0.0) || !mass_kg.is_finite() {
            return Err(SszError::Validation(format!(
                "mass must be finite and > 0, got {mass_kg}"
            )));
        }
        config.validate()?;
        let config = Self::effective_config(config);
        let r_s = schwarzschild_radius(mass_kg, g, c);
        let system = StructureSystem::new(
            ScalarAction::new(config.action),
            config.fluid,
            config.guard,
            config.coordinate,
        );
        Ok(Self {
            config,
            r_s,
            geometric_mass: 0.5 * r_s,
            system,
            methods,
            state: SolverState::NotStarted,
        })
    }

    /// Exterior runs carry no fluid.
    fn effective_config(mut config: TovConfig) -> TovConfig {
        if config.mode == IntegrationMode::Exterior {
            config.fluid.rho0 = 0.0;
            config.pr0 = 0.0;
        }
        config
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    pub fn r_s(&self) -> f64 {
        self.r_s
    }

    pub fn r_min(&self) -> f64 {
        self.config.r_min_rs * self.r_s
    }

    pub fn r_max(&self) -> f64 {
        self.config.r_max_rs * self.r_s
    }

    /// Seed mass m(r_min): configured, else r_s/2 outside and a small
    /// fraction of GM/c² inside.
    pub fn seed_mass(&self) -> f64 {
        self.config.m0.unwrap_or(match self.config.mode {
            IntegrationMode::Exterior => 0.5 * self.r_s,
            IntegrationMode::Interior => (1e-6 * self.geometric_mass).min(0.05 * self.r_min()),
        })
    }

    /// y(r_min) = (m0, 0, p0, φ0, φ′0).
    pub fn initial_state(&self) -> State {
        State::new(
            self.seed_mass(),
            0.0,
            self.config.pr0,
            self.config.phi0,
            self.config.phi_prime0,
        )
    }

    fn max_step(&self) -> Option<f64> {
        if self.config.max_step_rs <= 0.0 {
            return None;
        }
        let h = self.config.max_step_rs * self.r_s;
        Some(match self.config.coordinate {
            IntegrationCoordinate::Radius => h,
            IntegrationCoordinate::LogRadius => h / self.r_min(),
        })
    }

    /// Integrate from r_min to r_max through the method list.
    pub fn solve(&mut self) -> SszResult<TovSolution> {
        let r_min = self.r_min();
        let r_max = self.r_max();
        let y0 = self.initial_state();
        let compactness = 2.0 * y0[IDX_MASS] / r_min;
        if compactness > SEED_WARN_RATIO {
            log::warn!("seed mass is large relative to r_min: 2m0/r_min = {compactness:.3}");
        }

        let tol = self.config.tolerances;
        let budget_start = Instant::now();
        let budget = Budget {
            max_steps: tol.max_steps,
            deadline: budget_start + Duration::from_millis(tol.timeout_ms),
            timeout_ms: tol.timeout_ms,
        };
        let problem = Problem {
            system: &self.system,
            t0: self.system.to_coordinate(r_min),
            t1: self.system.to_coordinate(r_max),
            y0,
            max_step: self.max_step(),
            rtol: tol.rtol,
            atol: tol.atol,
        };

        let mut last_error = None;
        for method in &self.methods {
            let kind = method.kind();
            self.state = SolverState::Integrating(kind);
            log::debug!(
                "integrating r/r_s in [{:.3}, {:.3}] with {kind}",
                self.config.r_min_rs,
                self.config.r_max_rs
            );

            match method.integrate(&problem, &budget) {
                Ok(trajectory) if trajectory.len() >= MIN_NODES => {
                    self.state = SolverState::Succeeded(kind);
                    log::info!(
                        "{kind} finished: {} accepted, {} rejected, {} rhs evaluations in {:?}",
                        trajectory.stats.accepted,
                        trajectory.stats.rejected,
                        trajectory.stats.rhs_evals,
                        budget_start.elapsed()
                    );
                    let grid = OutputGrid {
                        r_min,
                        r_max,
                        points: self.config.grid,
                    };
                    return Ok(TovSolution::from_trajectory(
                        self.system.clone(),
                        self.r_s,
                        kind,
                        trajectory,
                        grid,
                    ));
                }
                Ok(trajectory) => {
                    let err = SszError::NonConvergence(format!(
                        "{kind} produced {} node(s), need {MIN_NODES}",
                        trajectory.len()
                    ));
                    log::warn!("{err}; trying next method");
                    last_error = Some(err);
                }
                Err(err @ SszError::HorizonGuard { .. }) => {
                    self.state = SolverState::AbortedHorizon;
                    log::error!("{kind}: {err}");
                    return Err(err);
                }
                Err(err) if err.is_terminal() => {
                    self.state = SolverState::Failed;
                    log::error!("{kind}: {err}");
                    return Err(err);
                }
                Err(err) => {
                    log::warn!("{kind} failed: {err}; trying next method");
                    last_error = Some(err);
                }
            }
        }

        self.state = SolverState::Failed;
        Err(last_error.unwrap_or_else(|| {
            SszError::NonConvergence("no integration method configured".to_string())
        }))
    }
}

/// One-shot convenience wrapper around [`TovSolver`].
pub fn solve_structure(mass_kg: f64, g: f64, c: f64, config: &TovConfig) -> SszResult<TovSolution> {
    TovSolver::new(mass_kg, g, c, config.clone())?.solve()
}
