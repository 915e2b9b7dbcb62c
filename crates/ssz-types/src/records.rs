// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Record Types
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

/// Clamp a value to [lo, hi], mapping NaN to lo and Inf to nearest bound.
#[inline]
pub fn clamp_finite(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        log::warn!("clamp_finite: NaN detected, clamping to {lo:.4e}");
        return lo;
    }
    if value.is_infinite() {
        let boundary = if value > 0.0 { hi } else { lo };
        log::warn!("clamp_finite: Inf detected, clamping to {boundary:.4e}");
        return boundary;
    }
    value.clamp(lo, hi)
}

/// Length, density and curvature scales derived once from mass and theory
/// parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FundamentalScales {
    /// Characteristic radius r_s = 2GM/c² (m).
    pub r_s: f64,
    /// Mass-correction percentage Δ(M).
    pub delta_percent: f64,
    /// Inner φ-radius (m), always below r_s.
    pub r_phi: f64,
    /// Maximum density M / (4π/3 · r_φ³) (kg/m³).
    pub rho_max: f64,
    /// Maximum curvature invariant 12 r_s² / r_φ⁶ (m⁻⁴).
    pub k_max: f64,
    /// Critical energy coupling 1/K² for K segments.
    pub lambda_crit: f64,
    /// Planck length (m).
    pub l_planck: f64,
    /// Hubble radius c/H₀ (m).
    pub r_hubble: f64,
}

/// Pair (A, B) with A·B = 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricCoefficients {
    pub a: f64,
    pub b: f64,
}

impl MetricCoefficients {
    /// Diagonal metric tensor (g_tt, g_rr, g_θθ, g_φφ).
    pub fn tensor(&self, r: f64, theta: f64) -> [f64; 4] {
        let r2 = r * r;
        let s = theta.sin();
        [-self.a, self.b, r2, r2 * s * s]
    }
}

/// Non-zero connection coefficients of a static, spherically symmetric
/// metric. Naming: `upper_lower_lower`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConnectionSet {
    pub t_tr: f64,
    pub r_tt: f64,
    pub r_rr: f64,
    pub r_thth: f64,
    pub r_phph: f64,
    pub th_rth: f64,
    pub th_phph: f64,
    pub ph_rph: f64,
    pub ph_thph: f64,
}

impl ConnectionSet {
    pub fn as_array(&self) -> [f64; 9] {
        [
            self.t_tr,
            self.r_tt,
            self.r_rr,
            self.r_thth,
            self.r_phph,
            self.th_rth,
            self.th_phph,
            self.ph_rph,
            self.ph_thph,
        ]
    }
}

/// Diagonal of the geometric (Einstein) tensor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeometricTensor {
    pub tt: f64,
    pub rr: f64,
    pub thth: f64,
    pub phph: f64,
}

/// Curvature scalar, curvature invariant and geometric-tensor diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvatureBundle {
    pub ricci_scalar: f64,
    pub kretschmann: f64,
    pub einstein: GeometricTensor,
}

/// Where a scalar-field profile value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSource {
    ClosedForm,
    Integrated,
}

/// Scalar-field value and radial derivative at one radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalarFieldProfile {
    pub phi: f64,
    pub phi_prime: f64,
    pub source: ProfileSource,
}

/// Anisotropic stress-energy (ρ, p_r, p_t, Δ = p_t − p_r).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressEnergyTensor {
    pub rho: f64,
    pub p_r: f64,
    pub p_t: f64,
    /// Anisotropy, taken before clamping.
    pub delta: f64,
    /// Equation of state p_r/ρ, absent when |ρ| ≤ 1e-30.
    pub w: Option<f64>,
}

impl StressEnergyTensor {
    /// Build from the raw components. Δ is fixed here.
    pub fn from_components(rho: f64, p_r: f64, p_t: f64) -> Self {
        Self {
            rho,
            p_r,
            p_t,
            delta: p_t - p_r,
            w: None,
        }
    }

    /// Clamp ρ into [0, ρ_max] and pressures into [−ρ_max, ρ_max].
    /// Δ keeps its pre-clamp value; w is recomputed from the clamped pair.
    pub fn clamped(self, rho_max: f64) -> Self {
        let rho = clamp_finite(self.rho, 0.0, rho_max);
        let p_r = clamp_finite(self.p_r, -rho_max, rho_max);
        let p_t = clamp_finite(self.p_t, -rho_max, rho_max);
        let w = if rho.abs() > 1e-30 { Some(p_r / rho) } else { None };
        Self {
            rho,
            p_r,
            p_t,
            delta: self.delta,
            w,
        }
    }

    /// Mean pressure (p_r + 2p_t)/3.
    #[inline]
    pub fn mean_pressure(&self) -> f64 {
        (self.p_r + 2.0 * self.p_t) / 3.0
    }
}

/// Stress-energy tagged with its derivation path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "path", content = "tensor", rename_all = "snake_case")]
pub enum StressEnergySource {
    /// Derived from the scalar-field action.
    ActionDerived(StressEnergyTensor),
    /// Degraded: read back from the geometric tensor.
    GeometricFallback(StressEnergyTensor),
}

impl StressEnergySource {
    pub fn tensor(&self) -> &StressEnergyTensor {
        match self {
            StressEnergySource::ActionDerived(t) | StressEnergySource::GeometricFallback(t) => t,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, StressEnergySource::GeometricFallback(_))
    }

    /// The tensor only if it came from the action model.
    pub fn action_derived(&self) -> Option<&StressEnergyTensor> {
        match self {
            StressEnergySource::ActionDerived(t) => Some(t),
            StressEnergySource::GeometricFallback(_) => None,
        }
    }
}

/// Classical energy conditions plus exotic-matter flag (NEC violated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyConditionVerdict {
    pub wec: bool,
    pub nec: bool,
    pub dec: bool,
    pub sec: bool,
    pub exotic: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_finite_nan_inf() {
        assert_eq!(clamp_finite(f64::NAN, -1.0, 1.0), -1.0);
        assert_eq!(clamp_finite(f64::INFINITY, -1.0, 1.0), 1.0);
        assert_eq!(clamp_finite(f64::NEG_INFINITY, -1.0, 1.0), -1.0);
        assert_eq!(clamp_finite(0.25, -1.0, 1.0), 0.25);
    }

    #[test]
    fn test_delta_survives_clamp() {
        let t = StressEnergyTensor::from_components(5.0, 4.0, -6.0);
        assert!((t.delta + 10.0).abs() < 1e-15);
        let c = t.clamped(2.0);
        assert_eq!(c.rho, 2.0);
        assert_eq!(c.p_r, 2.0);
        assert_eq!(c.p_t, -2.0);
        assert!((c.delta + 10.0).abs() < 1e-15, "pre-clamp delta kept");
        assert_eq!(c.w, Some(1.0));
    }

    #[test]
    fn test_negative_density_clamped_to_zero() {
        let c = StressEnergyTensor::from_components(-3.0, 1.0, 1.0).clamped(10.0);
        assert_eq!(c.rho, 0.0);
        assert_eq!(c.w, None);
    }

    #[test]
    fn test_source_tagging() {
        let t = StressEnergyTensor::from_components(1.0, 0.0, 0.0);
        let a = StressEnergySource::ActionDerived(t);
        let g = StressEnergySource::GeometricFallback(t);
        assert!(!a.is_degraded());
        assert!(g.is_degraded());
        assert!(a.action_derived().is_some());
        assert!(g.action_derived().is_none());
        assert_eq!(a.tensor(), g.tensor());
    }

    #[test]
    fn test_metric_tensor_equator() {
        let c = MetricCoefficients { a: 0.5, b: 2.0 };
        let g = c.tensor(3.0, std::f64::consts::FRAC_PI_2);
        assert_eq!(g[0], -0.5);
        assert_eq!(g[1], 2.0);
        assert!((g[2] - 9.0).abs() < 1e-12);
        assert!((g[3] - 9.0).abs() < 1e-12);
    }
}
