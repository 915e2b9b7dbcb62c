// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Per-Radius Evaluation Record
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use ssz_physics::constants::BOUND_HEADROOM;
use ssz_types::{
    ConnectionSet, CurvatureBundle, EnergyConditionVerdict, FundamentalScales, MetricCoefficients,
    ScalarFieldProfile, SszError, SszResult, StressEnergySource,
};

/// Regularity checks on one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingularityCheck {
    pub a_positive: bool,
    /// Curvature invariant below 1.1·K_max.
    pub curvature_bounded: bool,
    /// |ρ| within 1.1·ρ_max.
    pub density_bounded: bool,
    pub all_clear: bool,
}

impl SingularityCheck {
    pub fn assess(a: f64, kretschmann: f64, rho: f64, scales: &FundamentalScales) -> Self {
        let a_positive = a > 0.0;
        let curvature_bounded = kretschmann < BOUND_HEADROOM * scales.k_max;
        let density_bounded = rho.abs() <= BOUND_HEADROOM * scales.rho_max;
        Self {
            a_positive,
            curvature_bounded,
            density_bounded,
            all_clear: a_positive && curvature_bounded && density_bounded,
        }
    }
}

/// Everything the facade derives at one (r, θ).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEvaluation {
    pub r: f64,
    pub theta: f64,
    pub scales: FundamentalScales,
    /// Scalar-field profile the stress-energy was derived from.
    pub profile: ScalarFieldProfile,
    pub mass_correction_percent: f64,
    /// Ξ(r).
    pub segment_density: f64,
    pub coefficients: MetricCoefficients,
    /// diag(g_tt, g_rr, g_θθ, g_φφ).
    pub metric_tensor: [f64; 4],
    /// U = GM/(c²r).
    pub weak_field_parameter: f64,
    /// Truncated series value before saturation and floor.
    pub series_value: f64,
    pub connections: ConnectionSet,
    pub curvature: CurvatureBundle,
    pub stress_energy: StressEnergySource,
    pub energy_conditions: EnergyConditionVerdict,
    /// √A.
    pub time_dilation: f64,
    /// 1/√A − 1.
    pub redshift: f64,
    /// Local Hubble rate (s⁻¹), absent when cosmology is disabled.
    pub hubble: Option<f64>,
    pub hawking_temperature: f64,
    pub entropy: f64,
    pub classical_photon_sphere: f64,
    pub classical_isco: f64,
    pub singularity: SingularityCheck,
}

impl MetricEvaluation {
    pub fn to_json(&self) -> SszResult<String> {
        serde_json::to_string(self)
            .map_err(|e| SszError::Numerical(format!("evaluation not serialisable: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssz_physics::fundamental_scales;
    use ssz_types::MetricConfig;

    fn scales() -> FundamentalScales {
        fundamental_scales(&MetricConfig::default())
    }

    #[test]
    fn test_all_clear_requires_every_check() {
        let s = scales();
        let ok = SingularityCheck::assess(0.5, 0.5 * s.k_max, 0.5 * s.rho_max, &s);
        assert!(ok.all_clear);

        let bad_a = SingularityCheck::assess(0.0, 0.0, 0.0, &s);
        assert!(!bad_a.a_positive && !bad_a.all_clear);

        let bad_k = SingularityCheck::assess(0.5, 1.1 * s.k_max, 0.0, &s);
        assert!(!bad_k.curvature_bounded && !bad_k.all_clear);

        let bad_rho = SingularityCheck::assess(0.5, 0.0, -1.2 * s.rho_max, &s);
        assert!(!bad_rho.density_bounded && !bad_rho.all_clear);
    }

    #[test]
    fn test_density_bound_inclusive() {
        let s = scales();
        let edge = SingularityCheck::assess(1.0, 0.0, BOUND_HEADROOM * s.rho_max, &s);
        assert!(edge.density_bounded);
    }
}
