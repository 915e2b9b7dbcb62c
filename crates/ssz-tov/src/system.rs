// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Structure Equations
// ─────────────────────────────────────────────────────────────────────
//! Right-hand side of the coupled structure equations for a static
//! star threaded by the scalar field. State y = (m, Φ, p_r^fl, φ, φ′):
//!
//!   dm/dr  = 4πr²ρ_tot
//!   dΦ/dr  = (m + 4πr³p_tot) / (r(r − 2m))
//!   dp/dr  = −(ρ_fl + p_fl)·Φ′ + (2/r)(p_t^fl − p_r^fl + Δ_φ)
//!   dφ/dr  = φ′
//!   dφ′/dr = (ℬ − 𝒜′φ′)/𝒜,  𝒜 = e^(Φ−Λ)r²Z,  ℬ = e^(Φ+Λ)r²·source
//!
//! with e^(−2Λ) = 1 − 2m/r. Lengths and masses are geometric metres.

use std::f64::consts::PI;

use nalgebra::SVector;

use ssz_physics::stability::exp_clip;
use ssz_physics::{ScalarAction, ScalarSector};
use ssz_types::{FluidParams, GuardParams, IntegrationCoordinate, SszError, SszResult};

/// Integration state (m, Φ, p_r^fl, φ, φ′).
pub type State = SVector<f64, 5>;

pub const IDX_MASS: usize = 0;
pub const IDX_LAPSE: usize = 1;
pub const IDX_PRESSURE: usize = 2;
pub const IDX_FIELD: usize = 3;
pub const IDX_FIELD_PRIME: usize = 4;

/// Lower clip of 1 − 2m/r once the guard has passed (or is disabled).
const ONE_MINUS_FLOOR: f64 = 1e-16;
const RADIUS_FLOOR: f64 = 1e-30;

/// Column names of [`StructureRow::values`].
pub const COLUMNS: [&str; 20] = [
    "r_over_rs",
    "r_m",
    "m_geom_m",
    "Phi",
    "rho_fl",
    "pr_fl",
    "pt_fl",
    "phi",
    "phip",
    "Zpar",
    "U",
    "X",
    "rho_phi",
    "pr_phi",
    "pt_phi",
    "Delta_phi",
    "rho_tot",
    "pr_tot",
    "pt_tot",
    "one_minus_2m_over_r",
];

/// All derived quantities at one output radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructureRow {
    pub r_over_rs: f64,
    pub r: f64,
    pub m: f64,
    pub lapse: f64,
    pub rho_fl: f64,
    pub pr_fl: f64,
    pub pt_fl: f64,
    pub phi: f64,
    pub phi_prime: f64,
    pub z: f64,
    pub u: f64,
    pub x: f64,
    pub rho_phi: f64,
    pub pr_phi: f64,
    pub pt_phi: f64,
    pub delta_phi: f64,
    pub rho_tot: f64,
    pub pr_tot: f64,
    pub pt_tot: f64,
    pub one_minus_2m_over_r: f64,
}

impl StructureRow {
    /// Values in [`COLUMNS`] order.
    pub fn values(&self) -> [f64; 20] {
        [
            self.r_over_rs,
            self.r,
            self.m,
            self.lapse,
            self.rho_fl,
            self.pr_fl,
            self.pt_fl,
            self.phi,
            self.phi_prime,
            self.z,
            self.u,
            self.x,
            self.rho_phi,
            self.pr_phi,
            self.pt_phi,
            self.delta_phi,
            self.rho_tot,
            self.pr_tot,
            self.pt_tot,
            self.one_minus_2m_over_r,
        ]
    }
}

/// Structure equations with their matter model and horizon guard.
#[derive(Debug, Clone)]
pub struct StructureSystem {
    action: ScalarAction,
    fluid: FluidParams,
    guard: GuardParams,
    coordinate: IntegrationCoordinate,
}

impl StructureSystem {
    pub fn new(
        action: ScalarAction,
        fluid: FluidParams,
        guard: GuardParams,
        coordinate: IntegrationCoordinate,
    ) -> Self {
        Self {
            action,
            fluid,
            guard,
            coordinate,
        }
    }

    pub fn coordinate(&self) -> IntegrationCoordinate {
        self.coordinate
    }

    pub fn action(&self) -> &ScalarAction {
        &self.action
    }

    /// Independent variable for radius `r`.
    #[inline]
    pub fn to_coordinate(&self, r: f64) -> f64 {
        match self.coordinate {
            IntegrationCoordinate::Radius => r,
            IntegrationCoordinate::LogRadius => r.ln(),
        }
    }

    /// Radius for independent variable `t`.
    #[inline]
    pub fn to_radius(&self, t: f64) -> f64 {
        match self.coordinate {
            IntegrationCoordinate::Radius => t,
            IntegrationCoordinate::LogRadius => t.exp(),
        }
    }

    /// 1 − 2m/r, checked against the guard margin and then clipped.
    fn guarded_one_minus(&self, r: f64, m: f64) -> SszResult<f64> {
        let value = 1.0 - 2.0 * m / r;
        if self.guard.enabled && value <= self.guard.margin {
            return Err(SszError::HorizonGuard {
                r,
                margin: self.guard.margin,
                value,
            });
        }
        Ok(value.max(ONE_MINUS_FLOOR))
    }

    #[inline]
    fn fluid_density(&self, pr_fl: f64) -> f64 {
        pr_fl / self.fluid.cs2.max(1e-16) + self.fluid.rho0
    }

    /// dy/dr at radius r.
    pub fn rhs_radius(&self, r: f64, y: &State) -> SszResult<State> {
        let m = y[IDX_MASS];
        let lapse = y[IDX_LAPSE];
        let pr_fl = y[IDX_PRESSURE];
        let phi = y[IDX_FIELD];
        let phi_prime = y[IDX_FIELD_PRIME];

        let r = r.max(RADIUS_FLOOR);
        let one_minus = self.guarded_one_minus(r, m)?;
        let lambda = -0.5 * one_minus.ln();

        let s: ScalarSector = self.action.sector(phi, phi_prime, one_minus);

        let rho_fl = self.fluid_density(pr_fl);
        let pt_fl = pr_fl;
        let rho_tot = rho_fl + s.rho;
        let pr_tot = pr_fl + s.p_r;

        let mut denom = r * (r - 2.0 * m);
        let denom_floor = 1e-18 * r * r;
        if denom.abs() < denom_floor {
            denom = denom_floor.copysign(denom);
        }

        let r2 = r * r;
        let r3 = r2 * r;
        let dlapse = (m + 4.0 * PI * r3 * pr_tot) / denom;
        let dm = 4.0 * PI * r2 * rho_tot;
        let dp = -(rho_fl + pr_fl) * dlapse + (2.0 / r) * (pt_fl - pr_fl + s.delta);

        let e_minus = exp_clip(lapse - lambda);
        let e_plus = exp_clip(lapse + lambda);
        let kinetic = e_minus * r2 * s.z.max(1e-16);
        let source = e_plus * r2 * s.source;
        let dlambda = (m + 4.0 * PI * r3 * rho_tot) / denom;
        let kinetic_prime =
            kinetic * (dlapse - dlambda + 2.0 / r) + e_minus * r2 * s.dz_dphi * s.phi_prime_s;
        let dphi_prime = (source - kinetic_prime * phi_prime) / kinetic.max(1e-30);

        Ok(State::new(dm, dlapse, dp, phi_prime, dphi_prime))
    }

    /// dy/dt in the configured coordinate.
    pub fn rhs(&self, t: f64, y: &State) -> SszResult<State> {
        match self.coordinate {
            IntegrationCoordinate::Radius => self.rhs_radius(t, y),
            IntegrationCoordinate::LogRadius => {
                let r = t.exp();
                Ok(self.rhs_radius(r, y)? * r)
            }
        }
    }

    /// Output row at radius r. Never guarded: rows are built from an
    /// already accepted trajectory.
    pub fn row(&self, r: f64, r_s: f64, y: &State) -> StructureRow {
        let m = y[IDX_MASS];
        let pr_fl = y[IDX_PRESSURE];
        let one_minus = (1.0 - 2.0 * m / r.max(RADIUS_FLOOR)).max(ONE_MINUS_FLOOR);
        let s = self
            .action
            .sector(y[IDX_FIELD], y[IDX_FIELD_PRIME], one_minus);
        let rho_fl = self.fluid_density(pr_fl);
        let pt_fl = pr_fl;
        StructureRow {
            r_over_rs: r / r_s,
            r,
            m,
            lapse: y[IDX_LAPSE],
            rho_fl,
            pr_fl,
            pt_fl,
            phi: y[IDX_FIELD],
            phi_prime: y[IDX_FIELD_PRIME],
            z: s.z,
            u: s.u,
            x: s.x,
            rho_phi: s.rho,
            pr_phi: s.p_r,
            pt_phi: s.p_t,
            delta_phi: s.delta,
            rho_tot: rho_fl + s.rho,
            pr_tot: pr_fl + s.p_r,
            pt_tot: pt_fl + s.p_t,
            one_minus_2m_over_r: one_minus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssz_types::ActionParams;

    fn exterior(coordinate: IntegrationCoordinate) -> StructureSystem {
        StructureSystem::new(
            ScalarAction::new(ActionParams::integrator_defaults()),
            FluidParams { cs2: 0.3, rho0: 0.0 },
            GuardParams::default(),
            coordinate,
        )
    }

    #[test]
    fn test_vacuum_exterior_is_schwarzschild() {
        let sys = exterior(IntegrationCoordinate::Radius);
        let r_s = 2953.339;
        let r = 2.0 * r_s;
        let y = State::new(0.5 * r_s, 0.0, 0.0, 1e-4, 0.0);
        let dy = sys.rhs_radius(r, &y).unwrap();
        assert_eq!(dy[IDX_MASS], 0.0);
        let expect = 0.5 * r_s / (r * (r - r_s));
        assert!((dy[IDX_LAPSE] - expect).abs() / expect < 1e-14);
        assert_eq!(dy[IDX_PRESSURE], 0.0);
        assert_eq!(dy[IDX_FIELD], 0.0);
        assert_eq!(dy[IDX_FIELD_PRIME], 0.0);
    }

    #[test]
    fn test_log_coordinate_scales_by_radius() {
        let lin = exterior(IntegrationCoordinate::Radius);
        let log = exterior(IntegrationCoordinate::LogRadius);
        let r = 5000.0;
        let y = State::new(1000.0, 0.1, 0.0, 1e-4, 1e-6);
        let a = lin.rhs(r, &y).unwrap() * r;
        let b = log.rhs(r.ln(), &y).unwrap();
        assert!((a - b).amax() <= 1e-12 * a.amax().max(1e-300));
    }

    #[test]
    fn test_guard_trips_inside_margin() {
        let sys = exterior(IntegrationCoordinate::Radius);
        let r = 1000.0;
        let y = State::new(0.5 * r * (1.0 - 1e-7), 0.0, 0.0, 0.0, 0.0);
        match sys.rhs_radius(r, &y) {
            Err(SszError::HorizonGuard { r: at, margin, value }) => {
                assert_eq!(at, r);
                assert_eq!(margin, 1e-6);
                assert!(value < margin);
            }
            other => panic!("expected HorizonGuard, got {other:?}"),
        }
    }

    #[test]
    fn test_guard_disabled_clips() {
        let sys = StructureSystem::new(
            ScalarAction::new(ActionParams::integrator_defaults()),
            FluidParams::default(),
            GuardParams {
                enabled: false,
                margin: 1e-6,
            },
            IntegrationCoordinate::Radius,
        );
        let y = State::new(600.0, 0.0, 0.0, 0.0, 0.0);
        let dy = sys.rhs_radius(1000.0, &y).unwrap();
        assert!(dy.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_row_columns_consistent() {
        let sys = exterior(IntegrationCoordinate::LogRadius);
        let y = State::new(1000.0, -0.2, 1e-12, 2e-4, 1e-7);
        let row = sys.row(4000.0, 2000.0, &y);
        assert_eq!(row.values().len(), COLUMNS.len());
        assert_eq!(row.r_over_rs, 2.0);
        assert!((row.delta_phi - (row.pt_phi - row.pr_phi)).abs() < 1e-30);
        assert!((row.rho_tot - (row.rho_fl + row.rho_phi)).abs() < 1e-30);
        assert_eq!(row.one_minus_2m_over_r, 0.5);
    }
}
