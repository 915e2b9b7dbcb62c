// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all SSZ kernel failures.
///
/// The stability layer has no variant here: bounded primitives never fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SszError {
    /// Caller misuse: non-positive radius, out-of-domain argument.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Numerical error (NaN/Inf in computation).
    #[error("numerical error: {0}")]
    Numerical(String),

    /// Bracketed root search found no sign change in any bracket tried.
    #[error("no intersection found in [{lo:.6e}, {hi:.6e}] after {attempts} bracket(s)")]
    NoIntersection { lo: f64, hi: f64, attempts: usize },

    /// Structure-equation integration reached 1 - 2m/r <= margin.
    #[error("horizon guard tripped at r = {r:.6e} m: 1-2m/r = {value:.3e} <= margin {margin:.1e}")]
    HorizonGuard { r: f64, margin: f64, value: f64 },

    /// Every integration strategy failed to converge.
    #[error("integrator did not converge: {0}")]
    NonConvergence(String),

    /// Integration exceeded its wall-clock deadline.
    #[error("timeout: integration exceeded {deadline_ms}ms deadline")]
    Timeout { deadline_ms: u64 },

    /// Output could not be written.
    #[error("io error: {0}")]
    Io(String),
}

impl SszError {
    /// Conditions that end an integration run outright instead of
    /// handing over to the next strategy.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SszError::HorizonGuard { .. } | SszError::Timeout { .. })
    }
}

pub type SszResult<T> = Result<T, SszError>;
