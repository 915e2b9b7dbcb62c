// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Physical and Empirical Constants
// ─────────────────────────────────────────────────────────────────────
//! CODATA constants, cosmological reference values, and the empirically
//! fixed coefficients of the SSZ model. The empirical values are
//! calibrated constants and are reproduced exactly.

pub use ssz_types::config::{C_LIGHT, G_NEWTON, M_SUN, PHI_GOLDEN};

/// Reduced Planck constant (J·s).
pub const HBAR: f64 = 1.054571817e-34;
/// Boltzmann constant (J/K).
pub const K_B: f64 = 1.380649e-23;
/// Hubble constant 67.4 km/s/Mpc in s⁻¹.
pub const H0: f64 = 67.4 * 1000.0 / 3.086e22;
/// Matter density parameter.
pub const OMEGA_M: f64 = 0.315;

/// Weak-field series coefficients of U⁰ … U⁶.
pub const SERIES_COEFFICIENTS: [f64; 7] = [
    1.0,
    -2.0,
    2.0,
    -24.0 / 5.0,
    16.0 / 3.0,
    -80.0 / 7.0,
    192.0 / 11.0,
];

/// Mass-correction law Δ% = A·exp(−k·r_s) + floor.
pub const DELTA_AMPLITUDE: f64 = 98.01;
pub const DELTA_DECAY: f64 = 27_000.0;
pub const DELTA_FLOOR: f64 = 2.01;

/// Headroom on K_max and ρ_max used by the singularity self-check.
pub const BOUND_HEADROOM: f64 = 1.1;

/// Segment-density gains on the weak-field observables.
pub const PERIHELION_XI_GAIN: f64 = 0.01;
pub const DEFLECTION_XI_GAIN: f64 = 0.06;

/// Default observer distance for the Shapiro delay (m).
pub const SHAPIRO_OBSERVER_M: f64 = 1e11;

pub const ARCSEC_PER_RAD: f64 = 206_265.0;
pub const MICROARCSEC_PER_RAD: f64 = 206_264.806_247_096_36e6;
/// Kiloparsec (m).
pub const KPC_M: f64 = 3.085_677_581e19;
/// Julian year (s).
pub const YEAR_S: f64 = 3.155_76e7;
