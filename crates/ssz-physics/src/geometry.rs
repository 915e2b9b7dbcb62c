// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Finite-Difference Differential Geometry
// ─────────────────────────────────────────────────────────────────────
//! Connection coefficients, curvature scalar and geometric tensor of
//!
//!   ds² = −A(r) dt² + B(r) dr² + r² dΩ²
//!
//! obtained by central finite differences of A and B. The saturated and
//! floored coefficient has no tractable closed-form derivative, so the
//! step is configuration (`FiniteDifferenceConfig`), not a constant.
//!
//! The curvature invariant is not differenced at all: it is the
//! classical 12 r_s²/r⁶ baseline saturated toward K_max, which keeps it
//! bounded at every radius.

use ssz_types::{
    ConnectionSet, CurvatureBundle, FiniteDifferenceConfig, FundamentalScales, GeometricTensor,
};

use crate::constants::BOUND_HEADROOM;
use crate::stability::one_minus_exp_neg;

/// A static, spherically symmetric metric described by A(r).
pub trait RadialMetric {
    /// g_tt = −A(r). Must be > 0 for every r > 0.
    fn coefficient_a(&self, r: f64) -> f64;

    /// g_rr = B(r).
    fn coefficient_b(&self, r: f64) -> f64 {
        1.0 / self.coefficient_a(r)
    }
}

/// Finite-difference geometry of a [`RadialMetric`].
///
/// Below `bound_radius` every connection coefficient is clamped to
/// ±1/bound_radius and the curvature scalar to ±1/bound_radius².
pub struct FiniteDifferenceGeometry<'a, M: RadialMetric + ?Sized> {
    metric: &'a M,
    fd: FiniteDifferenceConfig,
    bound_radius: f64,
}

impl<'a, M: RadialMetric + ?Sized> FiniteDifferenceGeometry<'a, M> {
    pub fn new(metric: &'a M, fd: FiniteDifferenceConfig, bound_radius: f64) -> Self {
        Self {
            metric,
            fd,
            bound_radius,
        }
    }

    #[inline]
    pub fn step(&self, r: f64) -> f64 {
        self.fd.step(r)
    }

    /// dA/dr by central difference.
    pub fn da_dr(&self, r: f64) -> f64 {
        let h = self.step(r);
        (self.metric.coefficient_a(r + h) - self.metric.coefficient_a(r - h)) / (2.0 * h)
    }

    /// dB/dr by central difference.
    pub fn db_dr(&self, r: f64) -> f64 {
        let h = self.step(r);
        (self.metric.coefficient_b(r + h) - self.metric.coefficient_b(r - h)) / (2.0 * h)
    }

    /// d²A/dr² from the compounded step: the difference of the two
    /// one-sided first differences, divided by h once more.
    pub fn d2a_dr2(&self, r: f64) -> f64 {
        let h = self.step(r);
        let a = self.metric.coefficient_a(r);
        let forward = (self.metric.coefficient_a(r + h) - a) / h;
        let backward = (a - self.metric.coefficient_a(r - h)) / h;
        (forward - backward) / h
    }

    #[inline]
    fn bounded(&self, r: f64, value: f64) -> f64 {
        if r < self.bound_radius {
            let cap = 1.0 / self.bound_radius;
            value.clamp(-cap, cap)
        } else {
            value
        }
    }

    /// The nine non-zero connection coefficients at (r, θ).
    pub fn connections(&self, r: f64, theta: f64) -> ConnectionSet {
        let a = self.metric.coefficient_a(r);
        let b = self.metric.coefficient_b(r);
        let da = self.da_dr(r);
        let db = self.db_dr(r);
        let (s, c) = theta.sin_cos();

        ConnectionSet {
            t_tr: self.bounded(r, da / (2.0 * a)),
            r_tt: self.bounded(r, da / (2.0 * b)),
            r_rr: self.bounded(r, db / (2.0 * b)),
            r_thth: self.bounded(r, -r / b),
            r_phph: self.bounded(r, -r * s * s / b),
            th_rth: self.bounded(r, 1.0 / r),
            th_phph: self.bounded(r, -s * c),
            ph_rph: self.bounded(r, 1.0 / r),
            ph_thph: self.bounded(r, c / s.max(1e-10)),
        }
    }

    /// Curvature scalar R = −A″/A, clamped to ±1/bound_radius² inside.
    pub fn ricci_scalar(&self, r: f64) -> f64 {
        let a = self.metric.coefficient_a(r);
        let raw = -self.d2a_dr2(r) / a;
        if r < self.bound_radius {
            let cap = 1.0 / (self.bound_radius * self.bound_radius);
            raw.clamp(-cap, cap)
        } else {
            raw
        }
    }

    /// Geometric tensor diagonal from the curvature scalar, using the
    /// isotropic Ricci approximation R_μν = ½ g_μν R (sign of g_tt kept).
    pub fn einstein_tensor(&self, r: f64, theta: f64, ricci: f64) -> GeometricTensor {
        let a = self.metric.coefficient_a(r);
        let b = self.metric.coefficient_b(r);
        let r2 = r * r;
        let s2 = theta.sin().powi(2);

        let ricci_tt = -ricci * a / 2.0;
        let ricci_rr = -ricci * b / 2.0;
        let ricci_thth = ricci * r2 / 2.0;
        let ricci_phph = ricci * r2 * s2 / 2.0;

        GeometricTensor {
            tt: ricci_tt + a * ricci / 2.0,
            rr: ricci_rr - b * ricci / 2.0,
            thth: ricci_thth - r2 * ricci / 2.0,
            phph: ricci_phph - r2 * s2 * ricci / 2.0,
        }
    }
}

/// Curvature invariant: 12 r_s²/r⁶ saturated toward K_max below r_φ,
/// capped at 1.1·K_max outside.
pub fn kretschmann_bounded(r: f64, scales: &FundamentalScales, phi: f64, segments: f64) -> f64 {
    let k_gr = 12.0 * scales.r_s * scales.r_s / r.powi(6);
    if r < scales.r_phi {
        let factor = one_minus_exp_neg(phi * segments * r / scales.r_phi);
        // ∞·0 is NaN; f64::min then yields K_max
        (k_gr * factor).min(scales.k_max)
    } else {
        k_gr.min(BOUND_HEADROOM * scales.k_max)
    }
}

/// Full curvature bundle at (r, θ).
pub fn curvature_bundle<M: RadialMetric + ?Sized>(
    geometry: &FiniteDifferenceGeometry<'_, M>,
    r: f64,
    theta: f64,
    scales: &FundamentalScales,
    phi: f64,
    segments: f64,
) -> CurvatureBundle {
    let ricci = geometry.ricci_scalar(r);
    CurvatureBundle {
        ricci_scalar: ricci,
        kretschmann: kretschmann_bounded(r, scales, phi, segments),
        einstein: geometry.einstein_tensor(r, theta, ricci),
    }
}
