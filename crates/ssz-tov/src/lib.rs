// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Structure-Equation Integrator
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Stiff integration of the coupled structure equations (mass, lapse,
//! fluid pressure, scalar field) from r_min to r_max, producing the
//! exact scalar-field profile consumed by the metric facade and the
//! `ssz-tov` tool.
//!
//! # Invariants
//!
//! 1. **The horizon guard is terminal**: once 1 − 2m/r drops to the
//!    margin the run aborts with `HorizonGuard`; no fallback method is
//!    tried.
//!
//! 2. **Bounded work**: every method has a step budget and the whole run
//!    shares one wall-clock deadline.
//!
//! 3. **Interpolated output**: grid values come from linear
//!    interpolation of accepted nodes, never from re-integration.

pub mod methods;
pub mod solution;
pub mod solver;
pub mod system;

pub use methods::{ImplicitEuler, IntegrationStats, MethodKind, Rosenbrock23, StiffMethod};
pub use solution::{OutputGrid, TovSolution};
pub use solver::{solve_structure, SolverState, TovSolver};
pub use system::{State, StructureRow, StructureSystem, COLUMNS};
