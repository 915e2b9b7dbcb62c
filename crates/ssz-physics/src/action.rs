// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Scalar-Field Action & Stress-Energy
// ─────────────────────────────────────────────────────────────────────
//! Matter sector from an action with anisotropic kinetics:
//!
//!   Z(φ) = clip(Z0·(1 + α·φ_s + β·φ_s²), Z_min, Z_max)
//!   U(φ) = ½ m² φ_s² + λ φ_s⁴
//!   X    = (1 − 2m/r) · sat(φ′)²
//!
//!   ρ   =  ½ZX + U
//!   p_r =  ½ZX − U
//!   p_t = −½ZX − U
//!   Δ   = p_t − p_r = −ZX
//!
//! φ_s and sat(φ′) are tanh-saturated with their own caps. Matter is
//! derived here from the field alone and never from the geometric tensor.

use ssz_types::{ActionParams, StressEnergyTensor};

use crate::stability::{sat_tanh, sat_tanh_deriv};

/// All scalar-sector quantities at one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarSector {
    pub phi_s: f64,
    pub phi_prime_s: f64,
    pub z: f64,
    pub dz_dphi: f64,
    pub u: f64,
    pub du_dphi: f64,
    pub x: f64,
    pub rho: f64,
    pub p_r: f64,
    pub p_t: f64,
    pub delta: f64,
    /// Field-equation source dU/dφ + ½(dZ/dφ)X.
    pub source: f64,
}

impl ScalarSector {
    pub fn stress_energy(&self) -> StressEnergyTensor {
        StressEnergyTensor {
            rho: self.rho,
            p_r: self.p_r,
            p_t: self.p_t,
            delta: self.delta,
            w: None,
        }
    }
}

/// Action-based scalar-field model.
#[derive(Debug, Clone, Copy)]
pub struct ScalarAction {
    params: ActionParams,
}

impl ScalarAction {
    pub fn new(params: ActionParams) -> Self {
        Self { params }
    }

    /// Facade defaults.
    pub fn default_params() -> Self {
        Self::new(ActionParams::default())
    }

    pub fn params(&self) -> &ActionParams {
        &self.params
    }

    #[inline]
    fn saturated_phi(&self, phi: f64) -> f64 {
        sat_tanh(phi, self.params.phi_cap)
    }

    #[inline]
    fn raw_coupling(&self, phi_s: f64) -> f64 {
        let p = &self.params;
        p.z0 * (1.0 + p.alpha * phi_s + p.beta * phi_s * phi_s)
    }

    /// Z(φ), clipped into [Z_min, Z_max].
    pub fn kinetic_coupling(&self, phi: f64) -> f64 {
        let raw = self.raw_coupling(self.saturated_phi(phi));
        raw.clamp(self.params.z_min, self.params.z_max)
    }

    /// dZ/dφ; zero where the clip is active.
    pub fn kinetic_coupling_derivative(&self, phi: f64) -> f64 {
        let p = &self.params;
        let phi_s = self.saturated_phi(phi);
        let raw = self.raw_coupling(phi_s);
        if raw <= p.z_min || raw >= p.z_max {
            return 0.0;
        }
        p.z0 * (p.alpha + 2.0 * p.beta * phi_s) * sat_tanh_deriv(phi, p.phi_cap)
    }

    /// U(φ) = ½m²φ_s² + λφ_s⁴.
    pub fn potential(&self, phi: f64) -> f64 {
        let p = &self.params;
        let s = self.saturated_phi(phi);
        let s2 = s * s;
        0.5 * p.m_phi * p.m_phi * s2 + p.lambda * s2 * s2
    }

    pub fn potential_derivative(&self, phi: f64) -> f64 {
        let p = &self.params;
        let s = self.saturated_phi(phi);
        (p.m_phi * p.m_phi * s + 4.0 * p.lambda * s * s * s) * sat_tanh_deriv(phi, p.phi_cap)
    }

    /// X = (1 − 2m/r)·sat(φ′)².
    #[inline]
    pub fn kinetic_term(&self, phi_prime: f64, one_minus_2m_over_r: f64) -> f64 {
        let s = sat_tanh(phi_prime, self.params.phi_prime_cap);
        one_minus_2m_over_r * s * s
    }

    /// Evaluate every scalar-sector quantity at (φ, φ′, 1 − 2m/r).
    pub fn sector(&self, phi: f64, phi_prime: f64, one_minus_2m_over_r: f64) -> ScalarSector {
        let z = self.kinetic_coupling(phi);
        let dz_dphi = self.kinetic_coupling_derivative(phi);
        let u = self.potential(phi);
        let du_dphi = self.potential_derivative(phi);
        let x = self.kinetic_term(phi_prime, one_minus_2m_over_r);
        let half_zx = 0.5 * z * x;
        let rho = half_zx + u;
        let p_r = half_zx - u;
        let p_t = -half_zx - u;
        ScalarSector {
            phi_s: self.saturated_phi(phi),
            phi_prime_s: sat_tanh(phi_prime, self.params.phi_prime_cap),
            z,
            dz_dphi,
            u,
            du_dphi,
            x,
            rho,
            p_r,
            p_t,
            delta: p_t - p_r,
            source: du_dphi + 0.5 * dz_dphi * x,
        }
    }

    /// Unclamped stress-energy.
    pub fn stress_energy(
        &self,
        phi: f64,
        phi_prime: f64,
        one_minus_2m_over_r: f64,
    ) -> StressEnergyTensor {
        self.sector(phi, phi_prime, one_minus_2m_over_r).stress_energy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anisotropy_identity() {
        let action = ScalarAction::default_params();
        for (phi, dphi, om) in [(0.1, 0.2, 0.9), (3.0, -0.5, 0.3), (0.0, 1.0, 1.0)] {
            let s = action.sector(phi, dphi, om);
            assert!((s.delta - (s.p_t - s.p_r)).abs() < 1e-15);
            assert!((s.delta + s.z * s.x).abs() < 1e-14, "Δ = −ZX");
            assert!(s.delta <= 0.0, "Δ ≤ 0 when Z, X ≥ 0");
        }
    }

    #[test]
    fn test_density_nonnegative_outside() {
        let action = ScalarAction::default_params();
        let s = action.sector(0.5, 0.3, 0.8);
        assert!(s.rho >= 0.0);
        assert!((s.rho - (0.5 * s.z * s.x + s.u)).abs() < 1e-15);
    }

    #[test]
    fn test_coupling_clipped() {
        let params = ActionParams {
            alpha: 100.0,
            phi_cap: 0.0,
            ..ActionParams::default()
        };
        let action = ScalarAction::new(params);
        assert_eq!(action.kinetic_coupling(10.0), params.z_max);
        assert_eq!(action.kinetic_coupling_derivative(10.0), 0.0);
        assert_eq!(action.kinetic_coupling(-10.0), params.z_min);
        assert_eq!(action.kinetic_coupling_derivative(-10.0), 0.0);
    }

    #[test]
    fn test_coupling_derivative_matches_fd() {
        let action = ScalarAction::default_params();
        let phi = 0.7;
        let h = 1e-6;
        let fd = (action.kinetic_coupling(phi + h) - action.kinetic_coupling(phi - h)) / (2.0 * h);
        assert!((fd - action.kinetic_coupling_derivative(phi)).abs() < 1e-8);
        let fd_u = (action.potential(phi + h) - action.potential(phi - h)) / (2.0 * h);
        assert!((fd_u - action.potential_derivative(phi)).abs() < 1e-8);
    }

    #[test]
    fn test_saturation_bounds_potential() {
        let action = ScalarAction::new(ActionParams::integrator_defaults());
        assert_eq!(action.potential(1.0), 0.0, "m_φ = λ = 0");
        let capped = ScalarAction::new(ActionParams {
            m_phi: 1.0,
            phi_cap: 2.0,
            ..ActionParams::default()
        });
        let huge = capped.potential(1e12);
        assert!((huge - (0.5 * 4.0 + 0.001 * 16.0)).abs() < 1e-9);
    }

    #[test]
    fn test_source_term() {
        let action = ScalarAction::default_params();
        let s = action.sector(0.4, 0.2, 0.9);
        assert!((s.source - (s.du_dphi + 0.5 * s.dz_dphi * s.x)).abs() < 1e-18);
    }
}
