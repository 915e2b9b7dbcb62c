// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Thermodynamics, Cosmology & Multi-Body Density
// ─────────────────────────────────────────────────────────────────────
//! Hawking radiation, the black-hole-bomb energy map with golden-ratio
//! saturation, the segment-corrected local Hubble rate, and the summed
//! segment density of several point masses.

use std::f64::consts::PI;

use ssz_types::{FundamentalScales, SszError, SszResult};

use crate::constants::{HBAR, H0, K_B, OMEGA_M};
use crate::scales::{phi_radius, schwarzschild_radius, segment_density};
use crate::stability::golden_ratio_saturation;

/// Hawking temperature ħc³/(8πGMk_B) (K).
pub fn hawking_temperature(mass: f64, g: f64, c: f64) -> f64 {
    HBAR * c.powi(3) / (8.0 * PI * g * mass * K_B)
}

/// Bekenstein–Hawking entropy k_B·4πr_s²/(4L_p²) (J/K).
pub fn black_hole_entropy(scales: &FundamentalScales) -> f64 {
    let area = 4.0 * PI * scales.r_s * scales.r_s;
    K_B * area / (4.0 * scales.l_planck * scales.l_planck)
}

/// Hawking luminosity ħc⁶/(15360πG²M²) (W).
pub fn hawking_luminosity(mass: f64, g: f64, c: f64) -> f64 {
    HBAR * c.powi(6) / (15360.0 * PI * g * g * mass * mass)
}

/// Evaporation time 5120πG²M³/(ħc⁴) (s).
pub fn evaporation_time(mass: f64, g: f64, c: f64) -> f64 {
    5120.0 * PI * g * g * mass.powi(3) / (HBAR * c.powi(4))
}

/// Energy trajectory of the black-hole bomb:
///
///   E_{t+1} = min(E_t·(1 + λ − λ²K²), E_0·(1 − e^(−φK)))
///
/// Couplings at or above λ_crit are rejected.
pub fn black_hole_bomb(
    e_initial: f64,
    lambda: f64,
    lambda_crit: f64,
    segments: f64,
    phi: f64,
    steps: usize,
) -> SszResult<Vec<f64>> {
    if lambda >= lambda_crit {
        return Err(SszError::Validation(format!(
            "unstable coupling: lambda={lambda:.6e} >= lambda_crit={lambda_crit:.6e}"
        )));
    }
    if steps == 0 || !e_initial.is_finite() {
        return Err(SszError::Validation(format!(
            "need steps >= 1 and a finite initial energy, got steps={steps} E0={e_initial}"
        )));
    }

    let growth = 1.0 + lambda - lambda * lambda * segments * segments;
    let e_max = golden_ratio_saturation(e_initial, segments, phi);

    let mut trajectory = Vec::with_capacity(steps);
    trajectory.push(e_initial);
    let mut e = e_initial;
    for _ in 1..steps {
        e = (e * growth).min(e_max);
        trajectory.push(e);
    }
    Ok(trajectory)
}

/// Local Hubble rate H = √((8πG/3)·ρ_m·(1 − Ξ)) with the critical
/// matter density ρ_m = 3H₀²Ω_M/(8πG) (s⁻¹).
pub fn hubble_parameter(xi: f64) -> f64 {
    // (8πG/3)·ρ_m reduces to H₀²Ω_M
    (H0 * H0 * OMEGA_M * (1.0 - xi)).max(0.0).sqrt()
}

/// A point mass for [`multi_body_segment_density`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMass {
    pub mass: f64,
    /// Radial position (m).
    pub position: f64,
}

/// Ξ_total(r) = Σ_i (r_s,i/d_i)²·e^(−d_i/r_φ,i), saturated at 1.
/// Bodies sitting exactly at `r` contribute nothing.
pub fn multi_body_segment_density(r: f64, bodies: &[PointMass], g: f64, c: f64, phi: f64) -> f64 {
    let total: f64 = bodies
        .iter()
        .filter_map(|body| {
            let distance = (r - body.position).abs();
            if distance > 0.0 {
                let r_s = schwarzschild_radius(body.mass, g, c);
                Some(segment_density(distance, r_s, phi_radius(r_s, phi)))
            } else {
                None
            }
        })
        .sum();
    total.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{C_LIGHT, G_NEWTON, M_SUN, PHI_GOLDEN};
    use crate::scales::fundamental_scales;
    use ssz_types::MetricConfig;

    #[test]
    fn test_solar_hawking_temperature() {
        let t = hawking_temperature(M_SUN, G_NEWTON, C_LIGHT);
        assert!((t - 6.17e-8).abs() / 6.17e-8 < 0.01, "T_H = {t:.3e} K");
    }

    #[test]
    fn test_temperature_inverse_mass() {
        let t1 = hawking_temperature(M_SUN, G_NEWTON, C_LIGHT);
        let t2 = hawking_temperature(2.0 * M_SUN, G_NEWTON, C_LIGHT);
        assert!((t1 / t2 - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_solar_entropy() {
        let s = fundamental_scales(&MetricConfig::for_mass(M_SUN));
        let entropy = black_hole_entropy(&s);
        // ≈ 1.45e54 J/K
        assert!(entropy > 1e54 && entropy < 2e54, "S = {entropy:.3e}");
    }

    #[test]
    fn test_evaporation_and_luminosity() {
        let tau = evaporation_time(M_SUN, G_NEWTON, C_LIGHT);
        assert!(tau > 1e74 && tau < 1e75, "tau = {tau:.3e} s");
        let l = hawking_luminosity(M_SUN, G_NEWTON, C_LIGHT);
        assert!(l > 0.0 && l < 1e-27, "L = {l:.3e} W");
        let l2 = hawking_luminosity(2.0 * M_SUN, G_NEWTON, C_LIGHT);
        assert!((l / l2 - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_bomb_rejects_critical_coupling() {
        let err = black_hole_bomb(1.0, 1e-4, 1e-4, 100.0, PHI_GOLDEN, 10).unwrap_err();
        assert!(matches!(err, SszError::Validation(_)));
    }

    #[test]
    fn test_bomb_subcritical_is_bounded() {
        let e = black_hole_bomb(1.0, 5e-5, 1e-4, 100.0, PHI_GOLDEN, 10_000).unwrap();
        assert_eq!(e.len(), 10_000);
        assert_eq!(e[0], 1.0);
        let e_max = golden_ratio_saturation(1.0, 100.0, PHI_GOLDEN);
        assert!(e[1..].iter().all(|&v| v <= e_max && v.is_finite()));
        // growth = 1 + 5e-5 − 25e-10·1e4 = 1.000025 > 1, so the cap binds
        assert_eq!(*e.last().unwrap(), e_max);
    }

    #[test]
    fn test_hubble_reduced_by_segments() {
        let open = hubble_parameter(0.0);
        assert!((open - H0 * OMEGA_M.sqrt()).abs() < 1e-30);
        assert!(hubble_parameter(0.5) < open);
        assert_eq!(hubble_parameter(1.0), 0.0);
    }

    #[test]
    fn test_multi_body_density() {
        let sun = PointMass {
            mass: M_SUN,
            position: 0.0,
        };
        let r_s = schwarzschild_radius(M_SUN, G_NEWTON, C_LIGHT);
        let single = multi_body_segment_density(r_s, &[sun], G_NEWTON, C_LIGHT, PHI_GOLDEN);
        let expect = segment_density(r_s, r_s, phi_radius(r_s, PHI_GOLDEN));
        assert!((single - expect).abs() < 1e-15);

        let twin = PointMass {
            mass: M_SUN,
            position: 2.0 * r_s,
        };
        let pair = multi_body_segment_density(r_s, &[sun, twin], G_NEWTON, C_LIGHT, PHI_GOLDEN);
        assert!((pair - 2.0 * expect).abs() < 1e-15);

        let on_top = multi_body_segment_density(0.0, &[sun], G_NEWTON, C_LIGHT, PHI_GOLDEN);
        assert_eq!(on_top, 0.0);

        let crowd = vec![sun; 50];
        assert!(multi_body_segment_density(0.5 * r_s, &crowd, G_NEWTON, C_LIGHT, PHI_GOLDEN) <= 1.0);
    }
}
