// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Geodesic Motion & Radial Focusing
// ─────────────────────────────────────────────────────────────────────
//! Free fall in a static, spherically symmetric [`RadialMetric`]:
//!
//!   d²x^μ/dλ² = −Γ^μ_νρ ẋ^ν ẋ^ρ
//!
//! Coordinates are (ct, r, θ, φ), so every component is a length and λ is
//! cτ along timelike curves. Connection coefficients come from the
//! finite-difference geometry and are clamped below the bound radius like
//! every other geometric quantity. The integrator is classical RK4 with a
//! fixed number of substeps between output samples.
//!
//! Radial focusing follows the congruence falling from rest at infinity
//! (E = 1) and splits the Raychaudhuri right-hand side into expansion,
//! shear, rotation and Ricci terms.

use serde::{Deserialize, Serialize};

use ssz_types::{FiniteDifferenceConfig, SszError, SszResult};

use crate::geometry::{FiniteDifferenceGeometry, RadialMetric};

/// Relative finite-difference step for geodesic work. Matches the orbit
/// step so that A″ is not dominated by round-off.
const GEODESIC_RELATIVE_STEP: f64 = 1e-4;

/// (ct, r, θ, φ, d(ct)/dλ, dr/dλ, dθ/dλ, dφ/dλ).
pub type GeodesicState = [f64; 8];

/// Causal character of a geodesic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeodesicKind {
    Timelike,
    Null,
}

impl GeodesicKind {
    /// Conserved value of g_μν ẋ^μ ẋ^ν.
    pub fn norm(self) -> f64 {
        match self {
            GeodesicKind::Timelike => -1.0,
            GeodesicKind::Null => 0.0,
        }
    }
}

/// Output sampling of [`GeodesicSolver::integrate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeodesicConfig {
    /// Output samples including both ends. Default: 1000.
    pub points: usize,
    /// RK4 steps between consecutive samples. Default: 8.
    pub substeps: usize,
}

impl Default for GeodesicConfig {
    fn default() -> Self {
        Self {
            points: 1000,
            substeps: 8,
        }
    }
}

/// Sampled geodesic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeodesicTrajectory {
    pub lambda: Vec<f64>,
    pub states: Vec<GeodesicState>,
}

impl GeodesicTrajectory {
    pub fn radii(&self) -> impl Iterator<Item = f64> + '_ {
        self.states.iter().map(|y| y[1])
    }

    pub fn last(&self) -> Option<&GeodesicState> {
        self.states.last()
    }

    /// Largest |g_μν ẋ^μ ẋ^ν − norm| over the samples.
    pub fn max_constraint_violation<M: RadialMetric + ?Sized>(
        &self,
        metric: &M,
        kind: GeodesicKind,
    ) -> f64 {
        self.states
            .iter()
            .map(|y| constraint_violation(metric, y, kind).abs())
            .fold(0.0, f64::max)
    }
}

/// g_μν ẋ^μ ẋ^ν = −Aṫ² + Bṙ² + r²θ̇² + r²sin²θ φ̇².
pub fn line_element<M: RadialMetric + ?Sized>(metric: &M, y: &GeodesicState) -> f64 {
    let [_, r, theta, _, vt, vr, vth, vph] = *y;
    let s = theta.sin();
    let r2 = r * r;
    -metric.coefficient_a(r) * vt * vt
        + metric.coefficient_b(r) * vr * vr
        + r2 * vth * vth
        + r2 * s * s * vph * vph
}

/// Departure of the line element from the value `kind` requires.
pub fn constraint_violation<M: RadialMetric + ?Sized>(
    metric: &M,
    y: &GeodesicState,
    kind: GeodesicKind,
) -> f64 {
    line_element(metric, y) - kind.norm()
}

#[inline]
fn offset(y: &GeodesicState, k: &GeodesicState, h: f64) -> GeodesicState {
    let mut out = *y;
    for (o, d) in out.iter_mut().zip(k) {
        *o += h * d;
    }
    out
}

/// Terms of the Raychaudhuri equation for radial infall from rest at
/// infinity, evaluated at one radius. Rates are per unit cτ.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusingReport {
    pub r: f64,
    /// dr/d(cτ) of the infalling congruence (≤ 0).
    pub radial_velocity: f64,
    /// θ = ∇_a u^a.
    pub expansion: f64,
    /// σ_ab σ^ab.
    pub shear_squared: f64,
    /// ω_ab ω^ab; zero for a hypersurface-orthogonal radial flow.
    pub rotation_squared: f64,
    /// R_ab u^a u^b.
    pub ricci_focusing: f64,
    /// dθ/dτ = −θ²/3 − σ² + ω² − R_ab u^a u^b.
    pub expansion_rate: f64,
    /// θ < 0.
    pub converging: bool,
    /// R_ab u^a u^b ≥ 0, the timelike convergence condition.
    pub focusing_condition: bool,
}

/// Geodesic integrator over one metric.
pub struct GeodesicSolver<'a, M: RadialMetric + ?Sized> {
    metric: &'a M,
    geometry: FiniteDifferenceGeometry<'a, M>,
}

impl<'a, M: RadialMetric + ?Sized> GeodesicSolver<'a, M> {
    /// Connections are clamped below `bound_radius` (0 disables).
    pub fn new(metric: &'a M, bound_radius: f64) -> Self {
        let fd = FiniteDifferenceConfig {
            relative_step: GEODESIC_RELATIVE_STEP,
            ..FiniteDifferenceConfig::default()
        };
        Self {
            metric,
            geometry: FiniteDifferenceGeometry::new(metric, fd, bound_radius),
        }
    }

    fn check_radius(r: f64) -> SszResult<()> {
        if !(r > 0.0) || !r.is_finite() {
            return Err(SszError::Validation(format!(
                "radius must be finite and > 0, got {r}"
            )));
        }
        Ok(())
    }

    /// d/dλ of the state.
    pub fn rhs(&self, y: &GeodesicState) -> GeodesicState {
        let [_, r, theta, _, vt, vr, vth, vph] = *y;
        let g = self.geometry.connections(r, theta);
        [
            vt,
            vr,
            vth,
            vph,
            -2.0 * g.t_tr * vt * vr,
            -(g.r_tt * vt * vt
                + g.r_rr * vr * vr
                + g.r_thth * vth * vth
                + g.r_phph * vph * vph),
            -(2.0 * g.th_rth * vr * vth + g.th_phph * vph * vph),
            -2.0 * (g.ph_rph * vr * vph + g.ph_thph * vth * vph),
        ]
    }

    /// One classical Runge–Kutta step of size `h`.
    pub fn step(&self, y: &GeodesicState, h: f64) -> GeodesicState {
        let k1 = self.rhs(y);
        let k2 = self.rhs(&offset(y, &k1, 0.5 * h));
        let k3 = self.rhs(&offset(y, &k2, 0.5 * h));
        let k4 = self.rhs(&offset(y, &k3, h));
        let mut out = *y;
        for (i, o) in out.iter_mut().enumerate() {
            *o += h / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
        }
        out
    }

    /// Integrate from `initial` over `lambda_span`, sampled evenly.
    ///
    /// Fails with `Numerical` when the state stops being finite or the
    /// curve reaches r ≤ 0.
    pub fn integrate(
        &self,
        initial: GeodesicState,
        lambda_span: (f64, f64),
        config: GeodesicConfig,
    ) -> SszResult<GeodesicTrajectory> {
        let (start, end) = lambda_span;
        if !start.is_finite() || !end.is_finite() || start == end {
            return Err(SszError::Validation(format!(
                "affine span must be finite and non-empty, got [{start}, {end}]"
            )));
        }
        if config.points < 2 || config.substeps == 0 {
            return Err(SszError::Validation(format!(
                "need points >= 2 and substeps >= 1, got {} and {}",
                config.points, config.substeps
            )));
        }
        if initial.iter().any(|v| !v.is_finite()) {
            return Err(SszError::Validation(
                "initial geodesic state must be finite".to_string(),
            ));
        }
        Self::check_radius(initial[1])?;

        let sample = (end - start) / (config.points - 1) as f64;
        let h = sample / config.substeps as f64;

        let mut lambda = Vec::with_capacity(config.points);
        let mut states = Vec::with_capacity(config.points);
        lambda.push(start);
        states.push(initial);

        let mut y = initial;
        for i in 1..config.points {
            for _ in 0..config.substeps {
                y = self.step(&y, h);
            }
            let l = start + sample * i as f64;
            if y.iter().any(|v| !v.is_finite()) || !(y[1] > 0.0) {
                return Err(SszError::Numerical(format!(
                    "geodesic left the chart at λ = {l:.6e} (r = {:.6e})",
                    y[1]
                )));
            }
            lambda.push(l);
            states.push(y);
        }
        log::debug!(
            "geodesic integrated over {} samples, r in [{:.4e}, {:.4e}]",
            states.len(),
            states.iter().map(|s| s[1]).fold(f64::INFINITY, f64::min),
            states.iter().map(|s| s[1]).fold(0.0, f64::max)
        );
        Ok(GeodesicTrajectory { lambda, states })
    }

    /// Squared angular velocity dφ/d(ct) of a circular orbit: A′/(2r).
    fn circular_omega_squared(&self, r: f64) -> f64 {
        self.geometry.da_dr(r) / (2.0 * r)
    }

    /// A − rA′/2; positive exactly where timelike circular orbits exist.
    fn circular_denominator(&self, r: f64) -> f64 {
        self.metric.coefficient_a(r) - 0.5 * r * self.geometry.da_dr(r)
    }

    fn check_circular(&self, r: f64) -> SszResult<(f64, f64)> {
        Self::check_radius(r)?;
        let omega2 = self.circular_omega_squared(r);
        let denom = self.circular_denominator(r);
        if !(omega2 > 0.0) || !(denom > 0.0) {
            return Err(SszError::Validation(format!(
                "no timelike circular orbit at r = {r:.6e} m (A - rA'/2 = {denom:.3e})"
            )));
        }
        Ok((omega2, denom))
    }

    /// Equatorial circular orbit at r, normalised to g(u, u) = −1.
    pub fn circular_orbit(&self, r: f64, prograde: bool) -> SszResult<GeodesicState> {
        let (omega2, denom) = self.check_circular(r)?;
        let vt = 1.0 / denom.sqrt();
        let sign = if prograde { 1.0 } else { -1.0 };
        Ok([
            0.0,
            r,
            std::f64::consts::FRAC_PI_2,
            0.0,
            vt,
            0.0,
            0.0,
            sign * vt * omega2.sqrt(),
        ])
    }

    /// Specific energy E/(mc²) = A/√(A − rA′/2) of the circular orbit at r.
    pub fn circular_orbit_energy(&self, r: f64) -> SszResult<f64> {
        let (_, denom) = self.check_circular(r)?;
        Ok(self.metric.coefficient_a(r) / denom.sqrt())
    }

    /// Orbital speed of the circular orbit at r measured by a static
    /// observer: c·√(rA′/(2A)).
    pub fn circular_orbit_speed(&self, r: f64, c: f64) -> SszResult<f64> {
        self.check_circular(r)?;
        let ratio = 0.5 * r * self.geometry.da_dr(r) / self.metric.coefficient_a(r);
        Ok(c * ratio.sqrt())
    }

    /// Speed needed at r to reach infinity: c·√(1 − A), zero where A ≥ 1.
    pub fn escape_velocity(&self, r: f64, c: f64) -> SszResult<f64> {
        Self::check_radius(r)?;
        Ok(c * (1.0 - self.metric.coefficient_a(r)).max(0.0).sqrt())
    }

    /// Equatorial null ray at r with impact parameter b (E = 1, L = b).
    pub fn null_ray(&self, r: f64, impact_parameter: f64, inward: bool) -> SszResult<GeodesicState> {
        Self::check_radius(r)?;
        let a = self.metric.coefficient_a(r);
        let b = self.metric.coefficient_b(r);
        let radial2 = (1.0 / a - impact_parameter * impact_parameter / (r * r)) / b;
        if !(radial2 >= 0.0) {
            return Err(SszError::Validation(format!(
                "impact parameter {impact_parameter:.6e} m lies beyond the turning point at r = {r:.6e} m"
            )));
        }
        let sign = if inward { -1.0 } else { 1.0 };
        Ok([
            0.0,
            r,
            std::f64::consts::FRAC_PI_2,
            0.0,
            1.0 / a,
            sign * radial2.sqrt(),
            0.0,
            impact_parameter / (r * r),
        ])
    }

    /// u^r of the congruence falling from rest at infinity:
    /// −√((1 − A)/(AB)), zero where A ≥ 1.
    fn infall_velocity(&self, r: f64) -> f64 {
        let a = self.metric.coefficient_a(r);
        let b = self.metric.coefficient_b(r);
        -((1.0 - a).max(0.0) / (a * b)).sqrt()
    }

    /// Raychaudhuri terms of radial infall at r.
    pub fn radial_focusing(&self, r: f64) -> SszResult<FocusingReport> {
        Self::check_radius(r)?;
        let m = self.metric;
        let h = self.geometry.step(r);

        // θ = (√(AB) r²)⁻¹ d/dr(√(AB) r² u^r)
        let flux = |x: f64| {
            let volume = (m.coefficient_a(x) * m.coefficient_b(x)).sqrt() * x * x;
            volume * self.infall_velocity(x)
        };
        let a = m.coefficient_a(r);
        let b = m.coefficient_b(r);
        let u_r = self.infall_velocity(r);
        let expansion = (flux(r + h) - flux(r - h)) / (2.0 * h) / ((a * b).sqrt() * r * r);

        // eigenvalues of the expansion tensor: one radial, two tangential
        let tangential = u_r / r;
        let radial = expansion - 2.0 * tangential;
        let shear_squared = 2.0 / 3.0 * (radial - tangential).powi(2);
        let rotation_squared = 0.0;

        let da = self.geometry.da_dr(r);
        let d2a = self.geometry.d2a_dr2(r);
        let db = self.geometry.db_dr(r);
        let log_sum = da / a + db / b;
        let r_tt = d2a / (2.0 * b) - da / (4.0 * b) * log_sum + da / (r * b);
        let r_rr = -d2a / (2.0 * a) + da / (4.0 * a) * log_sum + db / (r * b);
        let u_t = 1.0 / a;
        let ricci_focusing = r_tt * u_t * u_t + r_rr * u_r * u_r;

        let expansion_rate =
            -expansion * expansion / 3.0 - shear_squared + rotation_squared - ricci_focusing;

        Ok(FocusingReport {
            r,
            radial_velocity: u_r,
            expansion,
            shear_squared,
            rotation_squared,
            ricci_focusing,
            expansion_rate,
            converging: expansion < 0.0,
            focusing_condition: ricci_focusing >= 0.0,
        })
    }
}
