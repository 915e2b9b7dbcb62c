// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Fundamental Scales
// ─────────────────────────────────────────────────────────────────────
//! Characteristic radius, φ-radius, and the density/curvature/coupling
//! bounds that every later stage is clamped against.

use std::f64::consts::PI;

use ssz_types::{FundamentalScales, MetricConfig};

use crate::constants::{DELTA_AMPLITUDE, DELTA_DECAY, DELTA_FLOOR, H0, HBAR};

/// r_s = 2GM/c².
#[inline]
pub fn schwarzschild_radius(mass: f64, g: f64, c: f64) -> f64 {
    2.0 * g * mass / (c * c)
}

/// Δ% = 98.01·exp(−27000·r_s) + 2.01, with r_s in metres.
#[inline]
pub fn mass_correction_percent(r_s: f64) -> f64 {
    DELTA_AMPLITUDE * (-DELTA_DECAY * r_s).exp() + DELTA_FLOOR
}

/// r_φ = (φ/2)·r_s·(1 + Δ/100).
#[inline]
pub fn phi_radius(r_s: f64, phi: f64) -> f64 {
    (phi / 2.0) * r_s * (1.0 + mass_correction_percent(r_s) / 100.0)
}

/// Derive the full scale bundle from validated theory parameters.
pub fn fundamental_scales(cfg: &MetricConfig) -> FundamentalScales {
    let r_s = schwarzschild_radius(cfg.mass_kg, cfg.g, cfg.c);
    let delta_percent = mass_correction_percent(r_s);
    let r_phi = (cfg.phi / 2.0) * r_s * (1.0 + delta_percent / 100.0);
    let volume = (4.0 * PI / 3.0) * r_phi.powi(3);
    let k_max = 12.0 * r_s * r_s / r_phi.powi(6);
    FundamentalScales {
        r_s,
        delta_percent,
        r_phi,
        rho_max: cfg.mass_kg / volume,
        k_max,
        lambda_crit: 1.0 / (cfg.segments * cfg.segments),
        l_planck: (HBAR * cfg.g / cfg.c.powi(3)).sqrt(),
        r_hubble: cfg.c / H0,
    }
}

/// Segment density Ξ(r) = (r_s/r)²·e^(−r/r_φ), clipped to [0, 1].
/// Non-positive radius is fully segmented.
#[inline]
pub fn segment_density(r: f64, r_s: f64, r_phi: f64) -> f64 {
    if r <= 0.0 {
        return 1.0;
    }
    let ratio = r_s / r;
    (ratio * ratio * (-r / r_phi).exp()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::M_SUN;

    #[test]
    fn test_solar_scales() {
        let s = fundamental_scales(&MetricConfig::for_mass(M_SUN));
        assert!((s.r_s - 2953.34).abs() < 0.1, "r_s={}", s.r_s);
        // exp(−27000·r_s) underflows for any stellar mass
        assert!((s.delta_percent - 2.01).abs() < 1e-12);
        let ratio = s.r_phi / s.r_s;
        assert!((ratio - 0.825_278).abs() < 1e-5, "r_phi/r_s={ratio}");
        assert!(s.r_phi < s.r_s);
        assert!(s.rho_max > 0.0 && s.k_max > 0.0);
        assert!((s.lambda_crit - 1e-4).abs() < 1e-18, "1/K² with K = 100");
        assert!((s.l_planck - 1.616e-35).abs() < 1e-37);
    }

    #[test]
    fn test_mass_correction_small_radius() {
        assert!((mass_correction_percent(0.0) - 100.02).abs() < 1e-12);
    }

    #[test]
    fn test_phi_radius_below_rs_for_sweep() {
        for k in 0..=10 {
            let phi = 1.618 * (0.8 + 0.045 * k as f64);
            let r_phi = phi_radius(1000.0, phi);
            assert!(r_phi < 1000.0 * 1.05, "phi={phi}");
        }
        assert!(phi_radius(1000.0, 1.618) < 1000.0);
    }

    #[test]
    fn test_segment_density_bounds() {
        assert_eq!(segment_density(0.0, 1.0, 0.8), 1.0);
        assert_eq!(segment_density(-1.0, 1.0, 0.8), 1.0);
        assert_eq!(segment_density(1e-3, 1.0, 0.8), 1.0);
        let far = segment_density(100.0, 1.0, 0.8);
        assert!(far >= 0.0 && far < 1e-40);
    }
}
