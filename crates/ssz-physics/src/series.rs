// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Weak-Field Series + Saturation Metric Engine
// ─────────────────────────────────────────────────────────────────────
//! Single source of truth for the metric coefficients A(r) and B(r):
//!
//!   1. U = GM/(c²r)
//!   2. A_pn = Σ_k a_k U^k, k ≤ order (Horner form, so huge U gives ±∞
//!      rather than ∞ − ∞)
//!   3. r < r_φ: A_pn · (1 − e^(−φKr/r_φ)), capped at 1
//!   4. smooth floor → A > ε
//!
//! B = 1/A, capped at 1/ε below r_φ.

use ssz_types::{FundamentalScales, MetricCoefficients, MetricConfig, SszResult};

use crate::constants::SERIES_COEFFICIENTS;
use crate::geometry::RadialMetric;
use crate::scales::{fundamental_scales, segment_density};
use crate::stability::{one_minus_exp_neg, smooth_floor};

/// Saturation ceiling applied to A before the floor.
const A_CEILING: f64 = 1.0;

/// Series + saturation metric for one central mass.
#[derive(Debug, Clone)]
pub struct SeriesMetric {
    mass: f64,
    g: f64,
    c: f64,
    phi: f64,
    order: usize,
    epsilon: f64,
    beta: f64,
    segments: f64,
    scales: FundamentalScales,
}

impl SeriesMetric {
    /// Build from theory parameters. Fails only on invalid configuration.
    pub fn new(cfg: &MetricConfig) -> SszResult<Self> {
        cfg.validate()?;
        Ok(Self {
            mass: cfg.mass_kg,
            g: cfg.g,
            c: cfg.c,
            phi: cfg.phi,
            order: cfg.pn_order as usize,
            epsilon: cfg.floor_epsilon,
            beta: cfg.floor_beta,
            segments: cfg.segments,
            scales: fundamental_scales(cfg),
        })
    }

    /// Defaults for `mass` kg.
    pub fn for_mass(mass: f64) -> SszResult<Self> {
        Self::new(&MetricConfig::for_mass(mass))
    }

    pub fn scales(&self) -> &FundamentalScales {
        &self.scales
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn g(&self) -> f64 {
        self.g
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn phi(&self) -> f64 {
        self.phi
    }

    pub fn segments(&self) -> f64 {
        self.segments
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Geometric mass GM/c² (m).
    #[inline]
    pub fn geometric_mass(&self) -> f64 {
        self.g * self.mass / (self.c * self.c)
    }

    /// U = GM/(c²r).
    #[inline]
    pub fn weak_field_parameter(&self, r: f64) -> f64 {
        self.geometric_mass() / r
    }

    /// Truncated series value before saturation and floor.
    #[inline]
    pub fn unsaturated(&self, r: f64) -> f64 {
        let u = self.weak_field_parameter(r);
        let (last, rest) = match SERIES_COEFFICIENTS[..=self.order].split_last() {
            Some(split) => split,
            None => return 1.0,
        };
        rest.iter().rev().fold(*last, |acc, &a| acc * u + a)
    }

    /// Factor 1 − e^(−φKr/r_φ) below r_φ, exactly 1 at and above it.
    #[inline]
    pub fn saturation_factor(&self, r: f64) -> f64 {
        if r >= self.scales.r_phi {
            1.0
        } else {
            one_minus_exp_neg(self.phi * self.segments * r / self.scales.r_phi)
        }
    }

    /// Golden-ratio saturation of `value` toward `value_max`.
    #[inline]
    pub fn golden_saturation(&self, value: f64, value_max: f64, r: f64) -> f64 {
        // f64::min returns the non-NaN operand, so 0·∞ lands on the cap.
        (value * self.saturation_factor(r)).min(value_max)
    }

    /// A(r) > ε for every r > 0.
    pub fn coefficient_a(&self, r: f64) -> f64 {
        let saturated = self.golden_saturation(self.unsaturated(r), A_CEILING, r);
        smooth_floor(saturated, self.epsilon, self.beta)
    }

    /// B(r) = 1/A(r), capped at 1/ε below r_φ.
    pub fn coefficient_b(&self, r: f64) -> f64 {
        let b = 1.0 / self.coefficient_a(r);
        if r < self.scales.r_phi {
            b.min(1.0 / self.epsilon)
        } else {
            b
        }
    }

    pub fn coefficients(&self, r: f64) -> MetricCoefficients {
        let a = self.coefficient_a(r);
        let mut b = 1.0 / a;
        if r < self.scales.r_phi {
            b = b.min(1.0 / self.epsilon);
        }
        MetricCoefficients { a, b }
    }

    /// Ξ(r) for this mass.
    #[inline]
    pub fn segment_density(&self, r: f64) -> f64 {
        segment_density(r, self.scales.r_s, self.scales.r_phi)
    }
}

impl RadialMetric for SeriesMetric {
    fn coefficient_a(&self, r: f64) -> f64 {
        SeriesMetric::coefficient_a(self, r)
    }

    fn coefficient_b(&self, r: f64) -> f64 {
        SeriesMetric::coefficient_b(self, r)
    }
}
