// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Physics Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! SSZ physics: bounded numerical primitives, the weak-field series +
//! golden-ratio saturation metric, the mirror-blend alternate model,
//! finite-difference geometry, the scalar-field action, energy
//! conditions, geodesic motion, and the derived observables.
//!
//! # Invariants
//!
//! 1. **A(r) > ε for every r > 0**: the series value is saturated below
//!    r_φ and always passed through the smooth floor. No code path in
//!    `series` can return a non-positive coefficient or fail.
//!
//! 2. **B is derived**: B(r) = 1/A(r), never evaluated independently.
//!
//! 3. **Curvature is bounded by construction**: the invariant is built
//!    from a saturated baseline and capped at 1.1·K_max, whatever the
//!    finite differences produce.

pub mod action;
pub mod constants;
pub mod energy;
pub mod geodesics;
pub mod geometry;
pub mod mirror;
pub mod observables;
pub mod roots;
pub mod scales;
pub mod series;
pub mod stability;
pub mod thermo;

pub use action::{ScalarAction, ScalarSector};
pub use energy::evaluate_energy_conditions;
pub use geodesics::{FocusingReport, GeodesicConfig, GeodesicKind, GeodesicSolver, GeodesicState};
pub use geometry::{kretschmann_bounded, FiniteDifferenceGeometry, RadialMetric};
pub use mirror::{MirrorBlendMetric, MirrorBlendResult};
pub use observables::{extract_gamma_beta, PpnParameters};
pub use roots::{brent, solve_with_brackets, Bracket};
pub use scales::{fundamental_scales, mass_correction_percent, schwarzschild_radius};
pub use series::SeriesMetric;
