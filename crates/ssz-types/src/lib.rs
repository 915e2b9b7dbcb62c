// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for the
//! segmented-spacetime (SSZ) metric kernel.
//!
//! Everything in this crate is plain data: configuration bundles with
//! validation, the per-radius record types produced by the physics and
//! facade crates, and the single error enum shared across the workspace.

pub mod config;
pub mod error;
pub mod records;

pub use config::{
    ActionParams, FiniteDifferenceConfig, FluidParams, GuardParams, IntegrationCoordinate,
    IntegrationMode, MetricConfig, ProfileMode, SolverTolerances, TovConfig,
};
pub use error::{SszError, SszResult};
pub use records::{
    clamp_finite, ConnectionSet, CurvatureBundle, EnergyConditionVerdict, FundamentalScales,
    GeometricTensor, MetricCoefficients, ProfileSource, ScalarFieldProfile, StressEnergySource,
    StressEnergyTensor,
};
