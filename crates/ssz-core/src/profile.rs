// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Scalar-Field Profile Provider
// ─────────────────────────────────────────────────────────────────────
//! Supplies (φ, φ′) at a radius. The provider is a value handed to the
//! stress-energy derivation for one evaluation; the facade never keeps
//! a "current" profile between calls.

use std::sync::Arc;

use ssz_tov::TovSolution;
use ssz_types::{ProfileSource, ScalarFieldProfile};

/// φ(r) = φ₀·e^(−r/r_φ), decaying outward from the inner φ-radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosedFormProfile {
    amplitude: f64,
    r_phi: f64,
}

impl ClosedFormProfile {
    pub fn new(amplitude: f64, r_phi: f64) -> Self {
        Self { amplitude, r_phi }
    }

    #[inline]
    pub fn phi(&self, r: f64) -> f64 {
        self.amplitude * (-r / self.r_phi).exp()
    }

    /// φ′(r) = −(φ₀/r_φ)·e^(−r/r_φ).
    #[inline]
    pub fn phi_prime(&self, r: f64) -> f64 {
        -self.phi(r) / self.r_phi
    }

    pub fn profile_at(&self, r: f64) -> ScalarFieldProfile {
        ScalarFieldProfile {
            phi: self.phi(r),
            phi_prime: self.phi_prime(r),
            source: ProfileSource::ClosedForm,
        }
    }
}

/// Where the profile for one evaluation comes from.
#[derive(Debug, Clone)]
pub enum ProfileProvider {
    ClosedForm(ClosedFormProfile),
    /// Interpolated from the cached structure integration. Outside the
    /// integrated range the end values are held.
    Integrated(Arc<TovSolution>),
}

impl ProfileProvider {
    pub fn profile_at(&self, r: f64) -> ScalarFieldProfile {
        match self {
            ProfileProvider::ClosedForm(p) => p.profile_at(r),
            ProfileProvider::Integrated(solution) => solution.profile_at(r),
        }
    }

    pub fn source(&self) -> ProfileSource {
        match self {
            ProfileProvider::ClosedForm(_) => ProfileSource::ClosedForm,
            ProfileProvider::Integrated(_) => ProfileSource::Integrated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssz_tov::solve_structure;
    use ssz_types::config::{C_LIGHT, G_NEWTON, M_SUN};
    use ssz_types::TovConfig;

    #[test]
    fn test_closed_form_values() {
        let p = ClosedFormProfile::new(0.1, 2.0);
        assert!((p.phi(0.0) - 0.1).abs() < 1e-15);
        assert!((p.phi(2.0) - 0.1 / std::f64::consts::E).abs() < 1e-15);
        assert!((p.phi_prime(0.0) + 0.05).abs() < 1e-15);
        let s = p.profile_at(1.0);
        assert_eq!(s.source, ProfileSource::ClosedForm);
        assert!(s.phi > 0.0 && s.phi_prime < 0.0);
    }

    #[test]
    fn test_closed_form_derivative_matches_difference() {
        let p = ClosedFormProfile::new(0.1, 3000.0);
        let r = 4500.0;
        let h = 1e-3;
        let fd = (p.phi(r + h) - p.phi(r - h)) / (2.0 * h);
        assert!((fd - p.phi_prime(r)).abs() < 1e-12, "fd={fd:.6e}");
    }

    #[test]
    fn test_integrated_provider_reads_solution() {
        let sol = solve_structure(M_SUN, G_NEWTON, C_LIGHT, &TovConfig::default()).unwrap();
        let r = 0.5 * (sol.r_min() + sol.r_max());
        let expect = sol.profile_at(r);
        let provider = ProfileProvider::Integrated(Arc::new(sol));
        assert_eq!(provider.source(), ProfileSource::Integrated);
        assert_eq!(provider.profile_at(r), expect);
    }
}
