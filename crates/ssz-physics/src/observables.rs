// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Derived Observables
// ─────────────────────────────────────────────────────────────────────
//! Orbits, shadow, ringdown and the classical weak-field tests, derived
//! from any [`RadialMetric`] by the same finite-difference machinery as
//! the geometry module.
//!
//! - Photon sphere: root of r·A′ − 2A.
//! - ISCO: root of 3AA′ − 2rA′² + rAA″.
//! - Shadow: critical impact parameter b = r_ph/√A(r_ph).
//! - Ringdown: first-order WKB on V = A·l(l+1)/r² at its peak.
//! - PPN γ, β: far-field coefficients of A and B, extrapolated to U → 0.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use ssz_types::{FiniteDifferenceConfig, FundamentalScales, SszError, SszResult};

use crate::constants::{
    ARCSEC_PER_RAD, DEFLECTION_XI_GAIN, MICROARCSEC_PER_RAD, PERIHELION_XI_GAIN,
    SHAPIRO_OBSERVER_M,
};
use crate::geometry::{FiniteDifferenceGeometry, RadialMetric};
use crate::roots::{solve_with_brackets, Bracket};
use crate::scales::segment_density;

/// Relative step for orbit conditions. Coarser than the tensor step so
/// that A″ is not dominated by round-off.
const ORBIT_RELATIVE_STEP: f64 = 1e-4;
/// Root tolerance in units of r_s.
const ORBIT_XTOL_RS: f64 = 1e-10;

/// Photon-sphere brackets in units of r_s, tried in order.
pub const PHOTON_SPHERE_BRACKETS_RS: [(f64, f64); 2] = [(1.05, 3.0), (1.01, 5.0)];
/// ISCO brackets in units of r_s, tried in order.
pub const ISCO_BRACKETS_RS: [(f64, f64); 2] = [(2.0, 6.0), (1.6, 10.0)];

/// Default pass band for [`compare_shadow`].
pub const SHADOW_TOLERANCE: f64 = 0.15;

fn orbit_geometry<M: RadialMetric + ?Sized>(metric: &M) -> FiniteDifferenceGeometry<'_, M> {
    let fd = FiniteDifferenceConfig {
        relative_step: ORBIT_RELATIVE_STEP,
        ..FiniteDifferenceConfig::default()
    };
    FiniteDifferenceGeometry::new(metric, fd, 0.0)
}

fn brackets(table: &[(f64, f64)], r_s: f64) -> Vec<Bracket> {
    table
        .iter()
        .map(|&(lo, hi)| Bracket::scaled(lo, hi, r_s))
        .collect()
}

/// Classical photon sphere 1.5 r_s.
#[inline]
pub fn classical_photon_sphere(r_s: f64) -> f64 {
    1.5 * r_s
}

/// Classical ISCO 3 r_s.
#[inline]
pub fn classical_isco(r_s: f64) -> f64 {
    3.0 * r_s
}

/// Circular null orbit: r·A′(r) = 2A(r).
pub fn photon_sphere_radius<M: RadialMetric + ?Sized>(metric: &M, r_s: f64) -> SszResult<f64> {
    let geo = orbit_geometry(metric);
    let f = |r: f64| r * geo.da_dr(r) - 2.0 * metric.coefficient_a(r);
    solve_with_brackets(f, &brackets(&PHOTON_SPHERE_BRACKETS_RS, r_s), ORBIT_XTOL_RS * r_s)
}

/// Innermost stable circular orbit: the marginal-stability condition
/// 3AA′ − 2rA′² + rAA″ = 0.
pub fn isco_radius<M: RadialMetric + ?Sized>(metric: &M, r_s: f64) -> SszResult<f64> {
    let geo = orbit_geometry(metric);
    let f = |r: f64| {
        let a = metric.coefficient_a(r);
        let da = geo.da_dr(r);
        let d2a = geo.d2a_dr2(r);
        3.0 * a * da - 2.0 * r * da * da + r * a * d2a
    };
    solve_with_brackets(f, &brackets(&ISCO_BRACKETS_RS, r_s), ORBIT_XTOL_RS * r_s)
}

/// Critical impact parameter b = r_ph/√A(r_ph) (m).
pub fn shadow_impact_parameter<M: RadialMetric + ?Sized>(metric: &M, r_s: f64) -> SszResult<f64> {
    let r_ph = photon_sphere_radius(metric, r_s)?;
    Ok(r_ph / metric.coefficient_a(r_ph).sqrt())
}

/// Angular diameter 2b/D in microarcseconds.
pub fn angular_diameter_microarcsec(impact_parameter: f64, distance_m: f64) -> SszResult<f64> {
    if !(distance_m > 0.0) || !distance_m.is_finite() {
        return Err(SszError::Validation(format!(
            "distance must be finite and > 0, got {distance_m}"
        )));
    }
    Ok(2.0 * impact_parameter / distance_m * MICROARCSEC_PER_RAD)
}

/// Predicted shadow size against an observed one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadowComparison {
    pub predicted_uas: f64,
    pub observed_uas: f64,
    /// (predicted − observed)/observed.
    pub residual: f64,
    pub within_tolerance: bool,
}

pub fn compare_shadow(predicted_uas: f64, observed_uas: f64, tolerance: f64) -> ShadowComparison {
    let residual = (predicted_uas - observed_uas) / observed_uas;
    ShadowComparison {
        predicted_uas,
        observed_uas,
        residual,
        within_tolerance: residual.abs() <= tolerance,
    }
}

/// Fundamental quasi-normal mode ω (rad/s) of multipole `l`, overtone `n`.
///
/// First-order WKB: ω² = V₀ − i(n + ½)·√(−2·d²V/dr*²) at the potential
/// peak, with d/dr* = A·d/dr. Lengths in metres, scaled to seconds by c.
pub fn quasi_normal_mode<M: RadialMetric + ?Sized>(
    metric: &M,
    r_s: f64,
    c: f64,
    l: u32,
    n: u32,
) -> SszResult<Complex64> {
    if l == 0 {
        return Err(SszError::Validation(
            "multipole l must be >= 1 for the WKB barrier".to_string(),
        ));
    }
    let ll = f64::from(l) * f64::from(l + 1);
    let potential = |r: f64| metric.coefficient_a(r) * ll / (r * r);

    // V′ ∝ rA′ − 2A, so the barrier peak sits on the photon sphere
    let r0 = photon_sphere_radius(metric, r_s)?;
    let h = ORBIT_RELATIVE_STEP * r0;
    let v0 = potential(r0);
    let v2 = (potential(r0 + h) - 2.0 * v0 + potential(r0 - h)) / (h * h);
    let a0 = metric.coefficient_a(r0);
    let curvature = -2.0 * a0 * a0 * v2;
    if !(curvature > 0.0) || !curvature.is_finite() {
        return Err(SszError::Numerical(format!(
            "potential at r = {r0:.6e} m is not a barrier peak (V'' = {v2:.3e})"
        )));
    }

    let omega2 = Complex64::new(v0, -(f64::from(n) + 0.5) * curvature.sqrt());
    Ok(omega2.sqrt() * c)
}

/// Oscillation frequency ω_r/2π (Hz).
#[inline]
pub fn qnm_frequency_hz(omega: Complex64) -> f64 {
    omega.re / (2.0 * std::f64::consts::PI)
}

/// Damping time 1/|ω_i| (s).
#[inline]
pub fn ringdown_time(omega: Complex64) -> f64 {
    1.0 / omega.im.abs()
}

/// Perihelion advance per orbit (rad):
/// 6πGM/(c²a(1−e²))·(1 + 0.01·Ξ(a)).
pub fn perihelion_advance(
    scales: &FundamentalScales,
    semi_major_m: f64,
    eccentricity: f64,
) -> SszResult<f64> {
    if !(semi_major_m > 0.0) {
        return Err(SszError::Validation(format!(
            "semi-major axis must be > 0, got {semi_major_m}"
        )));
    }
    if !(0.0..1.0).contains(&eccentricity) {
        return Err(SszError::Validation(format!(
            "eccentricity must lie in [0, 1), got {eccentricity}"
        )));
    }
    let gr = 3.0 * std::f64::consts::PI * scales.r_s
        / (semi_major_m * (1.0 - eccentricity * eccentricity));
    let xi = segment_density(semi_major_m, scales.r_s, scales.r_phi);
    Ok(gr * (1.0 + PERIHELION_XI_GAIN * xi))
}

/// Per-orbit advance accumulated over a century, in arcseconds.
#[inline]
pub fn arcsec_per_century(advance_rad: f64, period_years: f64) -> f64 {
    advance_rad * (100.0 / period_years) * ARCSEC_PER_RAD
}

/// Light deflection 4GM/(c²b)·(1 + 0.06·Ξ(b)) (rad).
pub fn light_deflection(scales: &FundamentalScales, impact_m: f64) -> f64 {
    let xi = segment_density(impact_m, scales.r_s, scales.r_phi);
    2.0 * scales.r_s / impact_m * (1.0 + DEFLECTION_XI_GAIN * xi)
}

/// One-way Shapiro delay (2GM/c³)·ln(r_obs/r_closest) (s).
/// Zero when the observer is not beyond the closest approach.
pub fn shapiro_delay(scales: &FundamentalScales, c: f64, r_closest: f64, r_obs: Option<f64>) -> f64 {
    let r_obs = r_obs.unwrap_or(SHAPIRO_OBSERVER_M);
    if r_obs <= r_closest || !(r_closest > 0.0) {
        return 0.0;
    }
    scales.r_s / c * (r_obs / r_closest).ln()
}

/// Areal radius of an isotropic radius: r = ρ(1 + r_s/4ρ)².
pub fn areal_from_isotropic(rho: f64, r_s: f64) -> f64 {
    let q = 1.0 + r_s / (4.0 * rho);
    rho * q * q
}

/// Outer isotropic radius of an areal radius r ≥ r_s.
pub fn isotropic_from_areal(r: f64, r_s: f64) -> SszResult<f64> {
    if !(r >= r_s) {
        return Err(SszError::Validation(format!(
            "isotropic chart covers r >= r_s, got r = {r:.6e} (r_s = {r_s:.6e})"
        )));
    }
    Ok(0.5 * ((r - 0.5 * r_s) + (r * r - r * r_s).sqrt()))
}

/// Default radius for [`extract_gamma_beta`], in units of r_s.
pub const PPN_DEFAULT_RADIUS_RS: f64 = 100.0;
/// Innermost radius accepted by [`extract_gamma_beta`], in units of r_s.
pub const PPN_MIN_RADIUS_RS: f64 = 10.0;
/// Radii r, 2r, 4r, 8r feed the extrapolation.
const PPN_LEVELS: usize = 4;

/// Post-Newtonian parameters read off a metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PpnParameters {
    pub gamma: f64,
    pub beta: f64,
}

/// Extrapolate samples taken at h, h/2, h/4, … to h → 0, assuming an
/// error series in integer powers of h.
fn richardson_halving(values: &mut [f64]) -> f64 {
    let n = values.len();
    for level in 1..n {
        let denom = f64::from(1u32 << level) - 1.0;
        for i in (level..n).rev() {
            values[i] += (values[i] - values[i - 1]) / denom;
        }
    }
    values.last().copied().unwrap_or(f64::NAN)
}

/// PPN γ and β of `metric` in the post-Newtonian form it is written in,
///
///   A = 1 − 2U + 2βU² + O(U³),  B = 1 + 2γU + O(U²),  U = r_s/(2r).
///
/// The estimates (B − 1)/2U and (A − 1 + 2U)/2U² are taken at `r_test`
/// (100 r_s by default) and three doublings of it, then extrapolated to
/// U → 0 so that the higher series orders drop out.
pub fn extract_gamma_beta<M: RadialMetric + ?Sized>(
    metric: &M,
    r_s: f64,
    r_test: Option<f64>,
) -> SszResult<PpnParameters> {
    let r0 = r_test.unwrap_or(PPN_DEFAULT_RADIUS_RS * r_s);
    if !(r0 >= PPN_MIN_RADIUS_RS * r_s) || !r0.is_finite() {
        return Err(SszError::Validation(format!(
            "PPN extraction needs a far-field radius >= {PPN_MIN_RADIUS_RS} r_s, got {r0:.6e} m"
        )));
    }

    let mut gamma = [0.0; PPN_LEVELS];
    let mut beta = [0.0; PPN_LEVELS];
    let mut r = r0;
    for (g, b) in gamma.iter_mut().zip(beta.iter_mut()) {
        let u = 0.5 * r_s / r;
        *g = (metric.coefficient_b(r) - 1.0) / (2.0 * u);
        *b = (metric.coefficient_a(r) - 1.0 + 2.0 * u) / (2.0 * u * u);
        r *= 2.0;
    }
    Ok(PpnParameters {
        gamma: richardson_halving(&mut gamma),
        beta: richardson_halving(&mut beta),
    })
}
