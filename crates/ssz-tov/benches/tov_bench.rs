// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Structure Integrator Benchmarks
// ─────────────────────────────────────────────────────────────────────

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ssz_physics::ScalarAction;
use ssz_tov::{solve_structure, State, StructureSystem};
use ssz_types::config::{C_LIGHT, G_NEWTON, M_SUN};
use ssz_types::{
    ActionParams, FluidParams, GuardParams, IntegrationCoordinate, IntegrationMode, TovConfig,
};

// ── right-hand side ─────────────────────────────────────────────────

fn bench_rhs(c: &mut Criterion) {
    let sys = StructureSystem::new(
        ScalarAction::new(ActionParams::integrator_defaults()),
        FluidParams::default(),
        GuardParams::default(),
        IntegrationCoordinate::LogRadius,
    );
    let y = State::new(1476.0, -0.3, 1e-12, 1e-4, 1e-7);
    let t = (4000.0f64).ln();
    c.bench_function("structure_rhs", |b| b.iter(|| sys.rhs(black_box(t), black_box(&y))));
}

// ── full runs ───────────────────────────────────────────────────────

fn bench_exterior_solar(c: &mut Criterion) {
    let cfg = TovConfig::default();
    c.bench_function("tov_exterior_solar", |b| {
        b.iter(|| solve_structure(black_box(M_SUN), G_NEWTON, C_LIGHT, &cfg))
    });
}

fn bench_interior_solar(c: &mut Criterion) {
    let cfg = TovConfig {
        mode: IntegrationMode::Interior,
        r_min_rs: 0.1,
        r_max_rs: 1.0,
        pr0: 1e-12,
        ..TovConfig::default()
    };
    c.bench_function("tov_interior_solar", |b| {
        b.iter(|| solve_structure(black_box(M_SUN), G_NEWTON, C_LIGHT, &cfg))
    });
}

criterion_group!(benches, bench_rhs, bench_exterior_solar, bench_interior_solar);
criterion_main!(benches);
