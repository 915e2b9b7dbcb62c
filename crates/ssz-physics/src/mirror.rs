// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Mirror-Blend Alternate Formulation
// ─────────────────────────────────────────────────────────────────────
//! A simpler two-branch model used for diagnostics. It does not feed the
//! series engine.
//!
//!   SSZ branch:       Ξ = 1 − e^(−φr/r_s),  D = 1/(1+Ξ),  A_SSZ = D²
//!   classical branch: A_GR = 1 − r_s/r
//!
//! The branches cross at r*, where D(r*) = √(1 − r_s/r*). A tanh window
//! of width δ = 0.02·r* switches from the SSZ branch inside r* to the
//! classical one outside, and the smooth floor keeps the result above ε.

use serde::{Deserialize, Serialize};

use ssz_types::{SszError, SszResult};

use crate::geometry::RadialMetric;
use crate::roots::{solve_with_brackets, Bracket};
use crate::stability::{safe_sqrt, smooth_floor};

const DEFAULT_EPSILON: f64 = 1e-6;
const DEFAULT_BETA: f64 = 50.0;
/// Window width as a fraction of r*.
const WINDOW_FRACTION: f64 = 0.02;

/// Crossing brackets in units of r_s, tried in order.
pub const CROSSING_BRACKETS_RS: [(f64, f64); 2] = [(1.01, 2.5), (1.001, 3.0)];

/// Branch values and blend at one radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MirrorBlendResult {
    pub r: f64,
    /// Floored blended coefficient.
    pub a: f64,
    pub a_ssz: f64,
    pub a_gr: f64,
    /// Blend weight of the SSZ branch, ≈1 inside r*.
    pub window: f64,
    pub r_star: f64,
}

/// Mirror-blend metric with its solved crossing radius.
#[derive(Debug, Clone)]
pub struct MirrorBlendMetric {
    r_s: f64,
    phi: f64,
    epsilon: f64,
    beta: f64,
    r_star: f64,
    width: f64,
}

impl MirrorBlendMetric {
    pub fn new(r_s: f64, phi: f64) -> SszResult<Self> {
        Self::with_floor(r_s, phi, DEFAULT_EPSILON, DEFAULT_BETA)
    }

    /// Solve r* and build the blend. `NoIntersection` if neither bracket
    /// contains the crossing.
    pub fn with_floor(r_s: f64, phi: f64, epsilon: f64, beta: f64) -> SszResult<Self> {
        if !(r_s > 0.0) || !r_s.is_finite() {
            return Err(SszError::Validation(format!(
                "r_s must be finite and > 0, got {r_s}"
            )));
        }
        if !(phi > 0.0) || !phi.is_finite() {
            return Err(SszError::Validation(format!(
                "phi must be finite and > 0, got {phi}"
            )));
        }
        let r_star = solve_crossing(r_s, phi)?;
        Ok(Self {
            r_s,
            phi,
            epsilon,
            beta,
            r_star,
            width: (WINDOW_FRACTION * r_star).max(1e-9),
        })
    }

    pub fn r_star(&self) -> f64 {
        self.r_star
    }

    pub fn r_s(&self) -> f64 {
        self.r_s
    }

    pub fn segment_density(&self, r: f64) -> f64 {
        mirror_segment_density(r, self.r_s, self.phi)
    }

    pub fn a_ssz(&self, r: f64) -> f64 {
        let d = 1.0 / (1.0 + self.segment_density(r));
        d * d
    }

    pub fn a_gr(&self, r: f64) -> f64 {
        1.0 - self.r_s / r
    }

    /// Tanh window h(r) = ½(1 − tanh((r − r*)/δ)).
    pub fn window(&self, r: f64) -> f64 {
        0.5 * (1.0 - ((r - self.r_star) / self.width).tanh())
    }

    pub fn evaluate(&self, r: f64) -> MirrorBlendResult {
        let a_ssz = self.a_ssz(r);
        let a_gr = self.a_gr(r);
        let h = self.window(r);
        let mixed = h * a_ssz + (1.0 - h) * a_gr;
        MirrorBlendResult {
            r,
            a: smooth_floor(mixed, self.epsilon, self.beta),
            a_ssz,
            a_gr,
            window: h,
            r_star: self.r_star,
        }
    }

    /// z = 1/√A − 1.
    pub fn redshift(&self, r: f64) -> f64 {
        1.0 / self.evaluate(r).a.sqrt() - 1.0
    }

    /// Curvature proxy (A′/r)² + ((1 − A)/r²)².
    pub fn curvature_proxy(&self, r: f64) -> f64 {
        let h = (r * 1e-6).max(1e-9);
        let a = self.evaluate(r).a;
        let da = (self.evaluate(r + h).a - self.evaluate(r - h).a) / (2.0 * h);
        let r2 = r * r;
        (da / r).powi(2) + ((1.0 - a) / r2).powi(2)
    }
}

impl RadialMetric for MirrorBlendMetric {
    fn coefficient_a(&self, r: f64) -> f64 {
        self.evaluate(r).a
    }
}

/// Ξ(r) = 1 − e^(−φr/r_s).
#[inline]
pub fn mirror_segment_density(r: f64, r_s: f64, phi: f64) -> f64 {
    1.0 - (-phi * r / r_s).exp()
}

/// Crossing radius of the SSZ and classical branches.
pub fn solve_crossing(r_s: f64, phi: f64) -> SszResult<f64> {
    let f = |r: f64| {
        let d_ssz = 1.0 / (1.0 + mirror_segment_density(r, r_s, phi));
        d_ssz - safe_sqrt(1.0 - r_s / r)
    };
    let brackets: Vec<Bracket> = CROSSING_BRACKETS_RS
        .iter()
        .map(|&(lo, hi)| Bracket::scaled(lo, hi, r_s))
        .collect();
    solve_with_brackets(f, &brackets, 1e-13 * r_s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PHI_GOLDEN;

    const RS: f64 = 2953.339;

    #[test]
    fn test_crossing_in_bracket() {
        let m = MirrorBlendMetric::new(RS, PHI_GOLDEN).unwrap();
        let x = m.r_star() / RS;
        assert!(x > 1.01 && x < 2.5, "r*/r_s = {x}");
    }

    #[test]
    fn test_branches_agree_at_crossing() {
        let m = MirrorBlendMetric::new(RS, PHI_GOLDEN).unwrap();
        let res = m.evaluate(m.r_star());
        assert!((res.a_ssz - res.a_gr).abs() < 1e-8, "{} vs {}", res.a_ssz, res.a_gr);
        assert!((res.window - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_phi_sweep_unique_crossing() {
        for k in 0..=20 {
            let phi = PHI_GOLDEN * (0.8 + 0.0225 * k as f64);
            let r_star = solve_crossing(RS, phi).unwrap();
            // Count sign changes on a fine grid across the widest bracket
            let f = |r: f64| {
                1.0 / (1.0 + mirror_segment_density(r, RS, phi)) - (1.0 - RS / r).sqrt()
            };
            let mut changes = 0;
            let n = 2000;
            let (lo, hi) = (1.001 * RS, 3.0 * RS);
            let mut prev = f(lo);
            for i in 1..=n {
                let r = lo + (hi - lo) * i as f64 / n as f64;
                let v = f(r);
                if (v > 0.0) != (prev > 0.0) {
                    changes += 1;
                }
                prev = v;
            }
            assert_eq!(changes, 1, "phi={phi}");
            assert!(r_star > lo && r_star < hi);
        }
    }

    #[test]
    fn test_no_intersection_surfaces() {
        // Tiny φ keeps D_SSZ near 1 across both brackets
        let err = solve_crossing(RS, 1e-6).unwrap_err();
        assert!(matches!(err, SszError::NoIntersection { attempts: 2, .. }), "{err}");
    }

    #[test]
    fn test_blend_limits_and_floor() {
        let m = MirrorBlendMetric::new(RS, PHI_GOLDEN).unwrap();
        let far = m.evaluate(50.0 * RS);
        assert!((far.a - far.a_gr).abs() < 1e-9);
        let inner = m.evaluate(0.5 * m.r_star());
        assert!((inner.a - inner.a_ssz).abs() < 1e-6);
        for x in [1e-6, 0.01, 0.5, 1.0, 1.2] {
            assert!(m.evaluate(x * RS).a > 1e-6);
        }
    }

    #[test]
    fn test_redshift_and_proxy_finite() {
        let m = MirrorBlendMetric::new(RS, PHI_GOLDEN).unwrap();
        for x in [0.1, 1.0, 2.0, 10.0] {
            assert!(m.redshift(x * RS).is_finite());
            assert!(m.redshift(x * RS) >= 0.0);
            assert!(m.curvature_proxy(x * RS).is_finite());
        }
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            MirrorBlendMetric::new(0.0, PHI_GOLDEN),
            Err(SszError::Validation(_))
        ));
    }
}
