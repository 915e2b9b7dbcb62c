// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Integrated Structure Solution
// ─────────────────────────────────────────────────────────────────────
//! Accepted integrator nodes plus their linear interpolation onto the
//! evenly spaced output grid. Values between nodes are interpolated,
//! never re-integrated; outside [r_min, r_max] the end values are held.

use ssz_types::{ProfileSource, ScalarFieldProfile};

use crate::methods::{IntegrationStats, MethodKind, Trajectory};
use crate::system::{State, StructureRow, StructureSystem, IDX_FIELD, IDX_FIELD_PRIME};

/// Write-once result of one structure integration.
#[derive(Debug, Clone)]
pub struct TovSolution {
    r_s: f64,
    method: MethodKind,
    stats: IntegrationStats,
    node_r: Vec<f64>,
    node_y: Vec<State>,
    grid_r: Vec<f64>,
    grid_y: Vec<State>,
    system: StructureSystem,
}

/// Linear interpolation of `ys` over strictly increasing `xs`, holding
/// the end values outside the range. A NaN abscissa maps to the first
/// node.
pub(crate) fn interpolate_nodes(xs: &[f64], ys: &[State], x: f64) -> State {
    let n = xs.len();
    if n == 0 {
        return State::zeros();
    }
    // NaN fails the comparison and lands here
    if !(x > xs[0]) {
        return ys[0];
    }
    if x >= xs[n - 1] {
        return ys[n - 1];
    }
    let hi = xs.partition_point(|&v| v <= x);
    let lo = hi - 1;
    let w = (x - xs[lo]) / (xs[hi] - xs[lo]);
    ys[lo] * (1.0 - w) + ys[hi] * w
}

/// Evenly spaced output grid over [r_min, r_max].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputGrid {
    pub r_min: f64,
    pub r_max: f64,
    pub points: usize,
}

impl OutputGrid {
    pub fn radii(&self) -> Vec<f64> {
        let n = self.points.max(2);
        let step = (self.r_max - self.r_min) / (n - 1) as f64;
        (0..n)
            .map(|i| {
                if i + 1 == n {
                    self.r_max
                } else {
                    self.r_min + step * i as f64
                }
            })
            .collect()
    }
}

impl TovSolution {
    /// Assemble from the accepted trajectory of `method`.
    pub(crate) fn from_trajectory(
        system: StructureSystem,
        r_s: f64,
        method: MethodKind,
        trajectory: Trajectory,
        grid: OutputGrid,
    ) -> Self {
        let node_r: Vec<f64> = trajectory.t.iter().map(|&t| system.to_radius(t)).collect();
        let node_y = trajectory.y;
        let grid_r = grid.radii();
        let grid_y = grid_r
            .iter()
            .map(|&r| interpolate_nodes(&node_r, &node_y, r))
            .collect();
        Self {
            r_s,
            method,
            stats: trajectory.stats,
            node_r,
            node_y,
            grid_r,
            grid_y,
            system,
        }
    }

    pub fn r_s(&self) -> f64 {
        self.r_s
    }

    /// Method that produced the accepted nodes.
    pub fn method(&self) -> MethodKind {
        self.method
    }

    pub fn stats(&self) -> &IntegrationStats {
        &self.stats
    }

    pub fn node_count(&self) -> usize {
        self.node_r.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (f64, &State)> + '_ {
        self.node_r.iter().copied().zip(self.node_y.iter())
    }

    pub fn grid(&self) -> &[f64] {
        &self.grid_r
    }

    pub fn r_min(&self) -> f64 {
        self.grid_r.first().copied().unwrap_or(0.0)
    }

    pub fn r_max(&self) -> f64 {
        self.grid_r.last().copied().unwrap_or(0.0)
    }

    /// State at any radius, interpolated between accepted nodes.
    pub fn state_at(&self, r: f64) -> State {
        interpolate_nodes(&self.node_r, &self.node_y, r)
    }

    /// (φ, φ′) at r.
    pub fn profile_at(&self, r: f64) -> ScalarFieldProfile {
        let y = self.state_at(r);
        ScalarFieldProfile {
            phi: y[IDX_FIELD],
            phi_prime: y[IDX_FIELD_PRIME],
            source: ProfileSource::Integrated,
        }
    }

    /// Output rows on the evenly spaced grid.
    pub fn rows(&self) -> Vec<StructureRow> {
        self.grid_r
            .iter()
            .zip(&self.grid_y)
            .map(|(&r, y)| self.system.row(r, self.r_s, y))
            .collect()
    }
}
