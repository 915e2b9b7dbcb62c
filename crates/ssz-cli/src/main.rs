// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Structure Integrator CLI
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! `ssz-tov`: integrate the structure equations for one mass and write
//! the 20-column profile table as CSV.
//!
//! Exit status: 0 ok, 2 invalid input, 3 horizon guard, 4 non-convergence
//! or timeout, 5 I/O.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};

use ssz_tov::{TovSolver, COLUMNS};
use ssz_types::config::{C_LIGHT, G_NEWTON};
use ssz_types::{
    ActionParams, FluidParams, GuardParams, IntegrationCoordinate, IntegrationMode,
    SolverTolerances, SszError, SszResult, TovConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Vacuum exterior, m(r_min) = r_s/2
    Exterior,
    /// Fluid interior with a small seed mass
    Interior,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CoordArg {
    /// Plain radius
    R,
    /// Logarithmic radius
    Lnr,
}

#[derive(Parser, Debug)]
#[command(name = "ssz-tov")]
#[command(about = "SSZ structure equations: scalar field with anisotropic kinetics", long_about = None)]
struct Cli {
    /// Central mass in kg
    #[arg(long)]
    mass: f64,

    #[arg(long, value_enum, default_value_t = ModeArg::Exterior)]
    mode: ModeArg,

    /// Integration coordinate
    #[arg(long, value_enum, default_value_t = CoordArg::Lnr)]
    coord: CoordArg,

    /// r_min = mult·r_s
    #[arg(long, default_value_t = 1.05)]
    rmin_mult: f64,

    /// r_max = mult·r_s
    #[arg(long, default_value_t = 12.0)]
    rmax_mult: f64,

    /// Output grid points
    #[arg(long, default_value_t = 200)]
    grid: usize,

    #[arg(long, default_value_t = 1e-4, allow_negative_numbers = true)]
    phi0: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    phip0: f64,

    /// Initial fluid pressure (forced to 0 in exterior mode)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pr0: f64,

    /// Seed mass m(r_min) in geometric metres
    #[arg(long)]
    m0: Option<f64>,

    #[arg(long, default_value_t = 0.0)]
    mphi: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    lam: f64,

    #[arg(long, default_value_t = 1.0)]
    z0: f64,

    #[arg(long, default_value_t = 3e-3, allow_negative_numbers = true)]
    alpha: f64,

    #[arg(long, default_value_t = -8e-3, allow_negative_numbers = true)]
    beta: f64,

    #[arg(long, default_value_t = 1e-8)]
    zmin: f64,

    #[arg(long, default_value_t = 1e8)]
    zmax: f64,

    /// Saturation cap for φ (≤ 0 disables)
    #[arg(long, default_value_t = 1e-3, allow_negative_numbers = true)]
    phi_cap: f64,

    /// Saturation cap for φ′ (≤ 0 disables)
    #[arg(long, default_value_t = 1e-3, allow_negative_numbers = true)]
    phip_cap: f64,

    /// Fluid sound speed squared
    #[arg(long, default_value_t = 0.30)]
    cs2: f64,

    /// Fluid density offset (forced to 0 in exterior mode)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    rho0: f64,

    /// Maximum step as a fraction of r_s (0 = unlimited)
    #[arg(long, default_value_t = 0.02)]
    max_step_rs: f64,

    /// Keep integrating through 1 − 2m/r ≤ margin
    #[arg(long, action = ArgAction::SetTrue)]
    no_horizon_guard: bool,

    #[arg(long, default_value_t = 1e-6)]
    horizon_margin: f64,

    /// Wall-clock deadline for the whole run
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// CSV output path (stdout when absent)
    #[arg(long, value_name = "CSV")]
    export: Option<PathBuf>,
}

impl Cli {
    fn tov_config(&self) -> TovConfig {
        let tolerances = SolverTolerances::default();
        TovConfig {
            mode: match self.mode {
                ModeArg::Exterior => IntegrationMode::Exterior,
                ModeArg::Interior => IntegrationMode::Interior,
            },
            coordinate: match self.coord {
                CoordArg::R => IntegrationCoordinate::Radius,
                CoordArg::Lnr => IntegrationCoordinate::LogRadius,
            },
            r_min_rs: self.rmin_mult,
            r_max_rs: self.rmax_mult,
            grid: self.grid,
            phi0: self.phi0,
            phi_prime0: self.phip0,
            pr0: self.pr0,
            m0: self.m0,
            action: ActionParams {
                z0: self.z0,
                alpha: self.alpha,
                beta: self.beta,
                z_min: self.zmin,
                z_max: self.zmax,
                m_phi: self.mphi,
                lambda: self.lam,
                phi_cap: self.phi_cap,
                phi_prime_cap: self.phip_cap,
            },
            fluid: FluidParams {
                cs2: self.cs2,
                rho0: self.rho0,
            },
            guard: GuardParams {
                enabled: !self.no_horizon_guard,
                margin: self.horizon_margin,
            },
            max_step_rs: self.max_step_rs,
            tolerances: SolverTolerances {
                timeout_ms: self.timeout_ms.unwrap_or(tolerances.timeout_ms),
                ..tolerances
            },
        }
    }
}

/// Process exit status for each error class.
fn exit_status(err: &SszError) -> u8 {
    match err {
        SszError::Validation(_) | SszError::Config(_) => 2,
        SszError::HorizonGuard { .. } => 3,
        SszError::NonConvergence(_)
        | SszError::Timeout { .. }
        | SszError::Numerical(_)
        | SszError::NoIntersection { .. } => 4,
        SszError::Io(_) => 5,
    }
}

fn io_error(err: impl std::fmt::Display) -> SszError {
    SszError::Io(err.to_string())
}

/// Ten-digit scientific notation with a signed, two-digit exponent
/// (`1.0500000000e+00`), the layout other tools emit for `%.10e`.
fn format_scientific(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let text = format!("{v:.10e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => text,
    }
}

/// Write rows as CSV, values through [`format_scientific`].
fn write_csv<W: Write>(out: W, rows: &[[f64; 20]]) -> SszResult<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(COLUMNS).map_err(io_error)?;
    for row in rows {
        writer
            .write_record(row.iter().map(|&v| format_scientific(v)))
            .map_err(io_error)?;
    }
    writer.flush().map_err(io_error)
}

fn run(cli: &Cli) -> SszResult<()> {
    let config = cli.tov_config();
    let mut solver = TovSolver::new(cli.mass, G_NEWTON, C_LIGHT, config.clone())?;

    log::info!(
        "M = {:.6e} kg | r_s = {:.6e} m | r/r_s in [{:.2}, {:.2}] with {} points",
        cli.mass,
        solver.r_s(),
        config.r_min_rs,
        config.r_max_rs,
        config.grid
    );
    log::info!(
        "mode {:?} | coord {:?} | Z0={} alpha={} beta={} | caps phi={} phi'={} | Z in [{:e}, {:e}]",
        config.mode,
        config.coordinate,
        config.action.z0,
        config.action.alpha,
        config.action.beta,
        config.action.phi_cap,
        config.action.phi_prime_cap,
        config.action.z_min,
        config.action.z_max
    );
    log::info!(
        "fluid cs2={:.3} rho0={:.3e} | guard enabled={} margin={:.1e}",
        config.fluid.cs2,
        config.fluid.rho0,
        config.guard.enabled,
        config.guard.margin
    );

    let solution = solver.solve()?;
    let rows: Vec<[f64; 20]> = solution.rows().iter().map(|row| row.values()).collect();

    match &cli.export {
        Some(path) => {
            let file = File::create(path).map_err(io_error)?;
            write_csv(file, &rows)?;
            log::info!("wrote {} rows to {}", rows.len(), path.display());
        }
        None => write_csv(io::stdout().lock(), &rows)?,
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("ssz-tov: {err}");
            ExitCode::from(exit_status(&err))
        }
    }
}
