// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Metric Facade
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Single entry point to the segmented metric: one `SegmentedMetric`
//! per central mass, evaluated at any (r, θ) with r > 0.
//!
//! # Invariants
//!
//! 1. **No hidden per-call state**: the scalar-field profile is obtained
//!    from a provider and passed down for each evaluation. Two calls at
//!    the same (r, θ) return bit-identical results.
//!
//! 2. **Integrate at most once**: the exact profile comes from a single
//!    structure integration per instance. Its outcome, success or error,
//!    is stored once and shared by every later evaluation.
//!
//! 3. **Degraded stress-energy is visible**: without an action model the
//!    stress-energy is tagged `GeometricFallback`, never passed off as
//!    action-derived.

pub mod evaluation;
pub mod metric;
pub mod profile;

pub use evaluation::{MetricEvaluation, SingularityCheck};
pub use metric::SegmentedMetric;
pub use profile::{ClosedFormProfile, ProfileProvider};
