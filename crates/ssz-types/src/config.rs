// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Configuration
// ─────────────────────────────────────────────────────────────────────
//! Theory parameters for the metric facade and the structure-equation
//! integrator. Every bundle has a `Default`, a `validate()` and can be
//! loaded from JSON; missing JSON fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::error::{SszError, SszResult};

/// Newtonian constant of gravitation (m³ kg⁻¹ s⁻²).
pub const G_NEWTON: f64 = 6.67430e-11;
/// Speed of light in vacuum (m/s).
pub const C_LIGHT: f64 = 299_792_458.0;
/// Golden ratio φ = (1 + √5)/2.
pub const PHI_GOLDEN: f64 = 1.618_033_988_749_895;
/// Solar mass (kg).
pub const M_SUN: f64 = 1.98847e30;

/// How the facade obtains (φ, φ′) at a radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileMode {
    /// Closed form φ₀·e^(−r/r_φ), recomputed every call.
    Approximate,
    /// Interpolated from a lazily integrated structure-equation solution.
    Exact,
}

/// Step-size policy for the central differences of A(r).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiniteDifferenceConfig {
    /// Step as a fraction of r. Default: 1e-6.
    pub relative_step: f64,
    /// Lower bound on the step in metres. Default: 1e-3.
    pub min_step_m: f64,
}

impl Default for FiniteDifferenceConfig {
    fn default() -> Self {
        Self {
            relative_step: 1e-6,
            min_step_m: 1e-3,
        }
    }
}

impl FiniteDifferenceConfig {
    /// Step used at radius `r`.
    ///
    /// Never larger than r/2, so every stencil point stays at positive radius.
    #[inline]
    pub fn step(&self, r: f64) -> f64 {
        (r * self.relative_step).max(self.min_step_m).min(0.5 * r)
    }

    pub fn validate(&self) -> SszResult<()> {
        if !(self.relative_step > 0.0 && self.relative_step < 0.1) {
            return Err(SszError::Config(format!(
                "relative_step must be in (0, 0.1), got {}",
                self.relative_step
            )));
        }
        if !(self.min_step_m > 0.0) || !self.min_step_m.is_finite() {
            return Err(SszError::Config(format!(
                "min_step_m must be finite and > 0, got {}",
                self.min_step_m
            )));
        }
        Ok(())
    }
}

/// Coefficients of the scalar-field action: kinetic coupling Z(φ) and
/// quartic potential U(φ), each fed through a tanh saturation cap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionParams {
    pub z0: f64,
    pub alpha: f64,
    pub beta: f64,
    pub z_min: f64,
    pub z_max: f64,
    /// Field mass m_φ.
    pub m_phi: f64,
    /// Quartic self-coupling λ.
    pub lambda: f64,
    /// Saturation cap for φ (≤ 0 disables).
    pub phi_cap: f64,
    /// Saturation cap for φ′ (≤ 0 disables).
    pub phi_prime_cap: f64,
}

impl Default for ActionParams {
    /// Values used by the metric facade.
    fn default() -> Self {
        Self {
            z0: 1.0,
            alpha: 0.1,
            beta: 0.01,
            z_min: 0.1,
            z_max: 10.0,
            m_phi: 0.1,
            lambda: 0.001,
            phi_cap: 10.0,
            phi_prime_cap: 1.0,
        }
    }
}

impl ActionParams {
    /// Values used by the structure-equation integrator and its CLI.
    pub fn integrator_defaults() -> Self {
        Self {
            z0: 1.0,
            alpha: 3e-3,
            beta: -8e-3,
            z_min: 1e-8,
            z_max: 1e8,
            m_phi: 0.0,
            lambda: 0.0,
            phi_cap: 1e-3,
            phi_prime_cap: 1e-3,
        }
    }

    pub fn validate(&self) -> SszResult<()> {
        let all = [
            self.z0,
            self.alpha,
            self.beta,
            self.z_min,
            self.z_max,
            self.m_phi,
            self.lambda,
            self.phi_cap,
            self.phi_prime_cap,
        ];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(SszError::Config(
                "action parameters must be finite".to_string(),
            ));
        }
        if self.z_min <= 0.0 || self.z_max <= self.z_min {
            return Err(SszError::Config(format!(
                "need 0 < z_min < z_max, got z_min={} z_max={}",
                self.z_min, self.z_max
            )));
        }
        if self.lambda < 0.0 {
            return Err(SszError::Config(format!(
                "lambda must be >= 0 for a bounded potential, got {}",
                self.lambda
            )));
        }
        Ok(())
    }
}

/// Boundary type of the structure-equation integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationMode {
    /// Vacuum exterior: m(r_min) = r_s/2, no fluid.
    Exterior,
    /// Fluid interior: small seed mass, fluid pressure/density active.
    Interior,
}

/// Independent variable of the integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationCoordinate {
    /// Plain radius r.
    Radius,
    /// x = ln r, right-hand side rescaled by r. Preferred near r_s.
    LogRadius,
}

/// Barotropic fluid closure ρ = p/c_s² + ρ₀.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluidParams {
    pub cs2: f64,
    pub rho0: f64,
}

impl Default for FluidParams {
    fn default() -> Self {
        Self {
            cs2: 0.30,
            rho0: 0.0,
        }
    }
}

/// Horizon guard on 1 − 2m/r.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardParams {
    pub enabled: bool,
    pub margin: f64,
}

impl Default for GuardParams {
    fn default() -> Self {
        Self {
            enabled: true,
            margin: 1e-6,
        }
    }
}

/// Error control and resource budget of the stiff solvers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverTolerances {
    pub rtol: f64,
    pub atol: f64,
    /// Accepted plus rejected steps allowed per method.
    pub max_steps: usize,
    /// Wall-clock deadline for the whole run, across all methods.
    pub timeout_ms: u64,
}

impl Default for SolverTolerances {
    fn default() -> Self {
        Self {
            rtol: 1e-7,
            atol: 1e-9,
            max_steps: 200_000,
            timeout_ms: 30_000,
        }
    }
}

/// Structure-equation integration setup. The mass is supplied separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TovConfig {
    pub mode: IntegrationMode,
    pub coordinate: IntegrationCoordinate,
    /// Inner radius in units of r_s. Default: 1.05.
    pub r_min_rs: f64,
    /// Outer radius in units of r_s. Default: 12.
    pub r_max_rs: f64,
    /// Output grid points. Default: 200.
    pub grid: usize,
    pub phi0: f64,
    pub phi_prime0: f64,
    /// Initial fluid pressure (ignored in exterior mode).
    pub pr0: f64,
    /// Seed mass in geometric metres; mode default when absent.
    pub m0: Option<f64>,
    pub action: ActionParams,
    pub fluid: FluidParams,
    pub guard: GuardParams,
    /// Maximum step as a fraction of r_s (0 disables). Default: 0.02.
    pub max_step_rs: f64,
    pub tolerances: SolverTolerances,
}

impl Default for TovConfig {
    fn default() -> Self {
        Self {
            mode: IntegrationMode::Exterior,
            coordinate: IntegrationCoordinate::LogRadius,
            r_min_rs: 1.05,
            r_max_rs: 12.0,
            grid: 200,
            phi0: 1e-4,
            phi_prime0: 0.0,
            pr0: 0.0,
            m0: None,
            action: ActionParams::integrator_defaults(),
            fluid: FluidParams::default(),
            guard: GuardParams::default(),
            max_step_rs: 0.02,
            tolerances: SolverTolerances::default(),
        }
    }
}

impl TovConfig {
    pub fn validate(&self) -> SszResult<()> {
        if !(self.r_min_rs > 0.0 && self.r_max_rs > self.r_min_rs) || !self.r_max_rs.is_finite() {
            return Err(SszError::Validation(format!(
                "need 0 < r_min < r_max, got r_min={} r_s, r_max={} r_s",
                self.r_min_rs, self.r_max_rs
            )));
        }
        if self.grid < 2 {
            return Err(SszError::Validation(format!(
                "grid must be >= 2, got {}",
                self.grid
            )));
        }
        if !(self.fluid.cs2 > 0.0) {
            return Err(SszError::Validation(format!(
                "cs2 must be > 0, got {}",
                self.fluid.cs2
            )));
        }
        if self.guard.margin < 0.0 || !self.guard.margin.is_finite() {
            return Err(SszError::Validation(format!(
                "horizon margin must be finite and >= 0, got {}",
                self.guard.margin
            )));
        }
        if self.max_step_rs < 0.0 || !self.max_step_rs.is_finite() {
            return Err(SszError::Validation(format!(
                "max_step_rs must be finite and >= 0, got {}",
                self.max_step_rs
            )));
        }
        let tol = &self.tolerances;
        if !(tol.rtol > 0.0) || !(tol.atol > 0.0) {
            return Err(SszError::Validation(format!(
                "tolerances must be > 0, got rtol={} atol={}",
                tol.rtol, tol.atol
            )));
        }
        if tol.max_steps == 0 || tol.timeout_ms == 0 {
            return Err(SszError::Validation(
                "max_steps and timeout_ms must be > 0".to_string(),
            ));
        }
        if let Some(m0) = self.m0 {
            if !(m0 >= 0.0) || !m0.is_finite() {
                return Err(SszError::Validation(format!(
                    "m0 must be finite and >= 0, got {m0}"
                )));
            }
        }
        if ![self.phi0, self.phi_prime0, self.pr0, self.fluid.rho0]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(SszError::Validation(
                "initial state must be finite".to_string(),
            ));
        }
        self.action.validate()
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> SszResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| SszError::Config(format!("JSON parse error: {e}")))
    }
}

/// Theory parameters owned by one metric instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricConfig {
    /// Central mass (kg).
    pub mass_kg: f64,
    pub g: f64,
    pub c: f64,
    /// Golden-ratio constant. Default: 1.618…
    pub phi: f64,
    /// Truncation order of the weak-field series, 2..=6. Default: 6.
    pub pn_order: u8,
    /// Smooth-floor minimum ε. Default: 1e-6.
    pub floor_epsilon: f64,
    /// Smooth-floor steepness β. Default: 50.
    pub floor_beta: f64,
    /// Segment count K in the golden-ratio saturation. Default: 100.
    pub segments: f64,
    /// Report the local Hubble parameter. Default: true.
    pub include_hubble: bool,
    pub profile_mode: ProfileMode,
    /// Amplitude φ₀ of the closed-form profile. Default: 0.1.
    pub phi_amplitude: f64,
    /// Action model; `None` forces the geometric stress-energy fallback.
    pub action: Option<ActionParams>,
    pub finite_difference: FiniteDifferenceConfig,
    /// Integration setup used when `profile_mode` is `Exact`.
    pub tov: TovConfig,
}

impl Default for MetricConfig {
    fn default() -> Self {
        Self {
            mass_kg: M_SUN,
            g: G_NEWTON,
            c: C_LIGHT,
            phi: PHI_GOLDEN,
            pn_order: 6,
            floor_epsilon: 1e-6,
            floor_beta: 50.0,
            segments: 100.0,
            include_hubble: true,
            profile_mode: ProfileMode::Approximate,
            phi_amplitude: 0.1,
            action: Some(ActionParams::default()),
            finite_difference: FiniteDifferenceConfig::default(),
            tov: TovConfig::default(),
        }
    }
}

impl MetricConfig {
    /// Defaults for a given central mass.
    pub fn for_mass(mass_kg: f64) -> Self {
        Self {
            mass_kg,
            ..Self::default()
        }
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> SszResult<()> {
        if !(self.mass_kg > 0.0) || !self.mass_kg.is_finite() {
            return Err(SszError::Validation(format!(
                "mass must be finite and > 0, got {}",
                self.mass_kg
            )));
        }
        if !(self.g > 0.0) || !(self.c > 0.0) {
            return Err(SszError::Config(format!(
                "G and c must be > 0, got G={} c={}",
                self.g, self.c
            )));
        }
        if !(self.phi > 1.0) || !self.phi.is_finite() {
            return Err(SszError::Config(format!(
                "phi must be finite and > 1, got {}",
                self.phi
            )));
        }
        if !(2..=6).contains(&self.pn_order) {
            return Err(SszError::Config(format!(
                "pn_order must be in [2, 6], got {}",
                self.pn_order
            )));
        }
        if !(self.floor_epsilon > 0.0 && self.floor_epsilon < 0.1) {
            return Err(SszError::Config(format!(
                "floor_epsilon must be in (0, 0.1), got {}",
                self.floor_epsilon
            )));
        }
        if !(self.floor_beta > 0.0) || !self.floor_beta.is_finite() {
            return Err(SszError::Config(format!(
                "floor_beta must be finite and > 0, got {}",
                self.floor_beta
            )));
        }
        if !(self.segments > 0.0) || !self.segments.is_finite() {
            return Err(SszError::Config(format!(
                "segments must be finite and > 0, got {}",
                self.segments
            )));
        }
        if !self.phi_amplitude.is_finite() {
            return Err(SszError::Config(format!(
                "phi_amplitude must be finite, got {}",
                self.phi_amplitude
            )));
        }
        if let Some(action) = &self.action {
            action.validate()?;
        }
        self.finite_difference.validate()?;
        if self.profile_mode == ProfileMode::Exact {
            self.tov.validate()?;
        }
        Ok(())
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> SszResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| SszError::Config(format!("JSON parse error: {e}")))
    }
}
