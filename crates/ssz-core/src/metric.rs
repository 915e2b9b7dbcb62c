// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Segmented Metric Facade
// ─────────────────────────────────────────────────────────────────────
//! Per-radius evaluation of the segmented metric plus the derived
//! observables of one central mass.
//!
//! Thread-safe: the only mutable state is the write-once integration
//! cache behind a `parking_lot::RwLock`. Construction takes the write
//! lock and re-checks, so the integrator runs at most once per instance;
//! afterwards every reader shares the same `Arc<TovSolution>` (or the
//! same error).

use std::f64::consts::PI;
use std::sync::Arc;

use num_complex::Complex64;
use parking_lot::RwLock;

use ssz_physics::energy::evaluate_energy_conditions;
use ssz_physics::geometry::{curvature_bundle, FiniteDifferenceGeometry};
use ssz_physics::mirror::MirrorBlendMetric;
use ssz_physics::observables::{self, ShadowComparison, SHADOW_TOLERANCE};
use ssz_physics::thermo;
use ssz_physics::{GeodesicSolver, PpnParameters, ScalarAction, SeriesMetric};
use ssz_tov::{TovSolution, TovSolver};
use ssz_types::{
    FundamentalScales, GeometricTensor, MetricConfig, ProfileMode, ScalarFieldProfile, SszError,
    SszResult, StressEnergySource, StressEnergyTensor,
};

use crate::evaluation::{MetricEvaluation, SingularityCheck};
use crate::profile::{ClosedFormProfile, ProfileProvider};

/// Floor on sin θ when projecting the tangential geometric pressure.
const SIN_THETA_FLOOR: f64 = 1e-10;

type TovCache = RwLock<Option<SszResult<Arc<TovSolution>>>>;

/// Singularity-free segmented metric of one central mass.
pub struct SegmentedMetric {
    config: MetricConfig,
    series: SeriesMetric,
    action: Option<ScalarAction>,
    tov: TovCache,
}

impl SegmentedMetric {
    /// Default theory parameters for `mass_kg`.
    pub fn new(mass_kg: f64) -> SszResult<Self> {
        Self::with_config(MetricConfig::for_mass(mass_kg))
    }

    pub fn with_config(config: MetricConfig) -> SszResult<Self> {
        let series = SeriesMetric::new(&config)?;
        let action = config.action.map(ScalarAction::new);
        if action.is_none() {
            log::info!("no action model configured: stress-energy will use the geometric fallback");
        }
        Ok(Self {
            config,
            series,
            action,
            tov: RwLock::new(None),
        })
    }

    pub fn config(&self) -> &MetricConfig {
        &self.config
    }

    pub fn scales(&self) -> &FundamentalScales {
        self.series.scales()
    }

    /// Underlying series + saturation engine.
    pub fn series(&self) -> &SeriesMetric {
        &self.series
    }

    fn check_radius(r: f64) -> SszResult<()> {
        if !(r > 0.0) || !r.is_finite() {
            return Err(SszError::Validation(format!(
                "radius must be finite and > 0, got {r}"
            )));
        }
        Ok(())
    }

    /// Structure-equation solution, integrated on first use.
    ///
    /// A failed integration is cached too; later calls return the same
    /// error without re-running the solver.
    pub fn tov_solution(&self) -> SszResult<Arc<TovSolution>> {
        if let Some(cached) = self.tov.read().as_ref() {
            return cached.clone();
        }

        let mut slot = self.tov.write();
        if let Some(cached) = slot.as_ref() {
            return cached.clone();
        }

        log::debug!(
            "integrating structure equations for M = {:.4e} kg",
            self.config.mass_kg
        );
        let outcome = TovSolver::new(
            self.config.mass_kg,
            self.config.g,
            self.config.c,
            self.config.tov.clone(),
        )
        .and_then(|mut solver| solver.solve())
        .map(Arc::new);
        if let Err(e) = &outcome {
            log::error!("structure integration failed, exact profile unavailable: {e}");
        }
        *slot = Some(outcome.clone());
        outcome
    }

    /// Provider for the configured profile mode.
    pub fn profile_provider(&self) -> SszResult<ProfileProvider> {
        match self.config.profile_mode {
            ProfileMode::Approximate => Ok(ProfileProvider::ClosedForm(ClosedFormProfile::new(
                self.config.phi_amplitude,
                self.scales().r_phi,
            ))),
            ProfileMode::Exact => self.tov_solution().map(ProfileProvider::Integrated),
        }
    }

    /// Stress-energy at r from the action model, or from the geometric
    /// tensor when no action is configured. Always clamped.
    ///
    /// The action path weights the kinetic term by 1 − 2GM/(c²r) = 1 − r_s/r,
    /// the same lapse factor the structure equations use, with r floored at
    /// r_φ/10. Outside the horizon X stays non-negative, so between r_s and
    /// 2r_s the field satisfies the null condition rather than turning exotic.
    pub fn stress_energy(
        &self,
        r: f64,
        theta: f64,
        profile: &ScalarFieldProfile,
        einstein: &GeometricTensor,
    ) -> StressEnergySource {
        let scales = self.scales();
        match &self.action {
            Some(action) => {
                let m = self.series.geometric_mass();
                let one_minus = 1.0 - 2.0 * m / r.max(scales.r_phi / 10.0);
                let tensor = action
                    .stress_energy(profile.phi, profile.phi_prime, one_minus)
                    .clamped(scales.rho_max);
                StressEnergySource::ActionDerived(tensor)
            }
            None => {
                log::warn!("r = {r:.6e} m: stress-energy read back from the geometric tensor");
                let g = self.config.g;
                let c = self.config.c;
                let coupling = c.powi(4) / (8.0 * PI * g);
                let rho = c * c / (8.0 * PI * g) * einstein.tt;
                let p_r = coupling * einstein.rr;
                let r2 = r * r;
                let s = theta.sin().abs().max(SIN_THETA_FLOOR);
                let p_t = 0.5 * coupling * (einstein.thth / r2 + einstein.phph / (r2 * s * s));
                let tensor =
                    StressEnergyTensor::from_components(rho, p_r, p_t).clamped(scales.rho_max);
                StressEnergySource::GeometricFallback(tensor)
            }
        }
    }

    /// Full evaluation at (r, θ).
    pub fn evaluate(&self, r: f64, theta: f64) -> SszResult<MetricEvaluation> {
        Self::check_radius(r)?;
        if !theta.is_finite() {
            return Err(SszError::Validation(format!(
                "polar angle must be finite, got {theta}"
            )));
        }

        let cfg = &self.config;
        let scales = *self.scales();
        let profile = self.profile_provider()?.profile_at(r);

        let coefficients = self.series.coefficients(r);
        let geometry =
            FiniteDifferenceGeometry::new(&self.series, cfg.finite_difference, scales.r_phi);
        let curvature = curvature_bundle(&geometry, r, theta, &scales, cfg.phi, cfg.segments);
        let stress_energy = self.stress_energy(r, theta, &profile, &curvature.einstein);
        let energy_conditions = evaluate_energy_conditions(stress_energy.tensor());
        let rho = stress_energy.tensor().rho;

        let segment_density = self.series.segment_density(r);
        let time_dilation = coefficients.a.sqrt();

        Ok(MetricEvaluation {
            r,
            theta,
            scales,
            profile,
            mass_correction_percent: scales.delta_percent,
            segment_density,
            coefficients,
            metric_tensor: coefficients.tensor(r, theta),
            weak_field_parameter: self.series.weak_field_parameter(r),
            series_value: self.series.unsaturated(r),
            connections: geometry.connections(r, theta),
            curvature,
            stress_energy,
            energy_conditions,
            time_dilation,
            redshift: 1.0 / time_dilation - 1.0,
            hubble: cfg
                .include_hubble
                .then(|| thermo::hubble_parameter(segment_density)),
            hawking_temperature: thermo::hawking_temperature(cfg.mass_kg, cfg.g, cfg.c),
            entropy: thermo::black_hole_entropy(&scales),
            classical_photon_sphere: observables::classical_photon_sphere(scales.r_s),
            classical_isco: observables::classical_isco(scales.r_s),
            singularity: SingularityCheck::assess(
                coefficients.a,
                curvature.kretschmann,
                rho,
                &scales,
            ),
        })
    }

    /// [`evaluate`](Self::evaluate) on the equator.
    pub fn evaluate_equatorial(&self, r: f64) -> SszResult<MetricEvaluation> {
        self.evaluate(r, std::f64::consts::FRAC_PI_2)
    }

    // ── observables ─────────────────────────────────────────────────

    /// Photon-sphere radius of the segmented metric (m).
    pub fn photon_sphere_radius(&self) -> SszResult<f64> {
        observables::photon_sphere_radius(&self.series, self.scales().r_s)
    }

    /// Innermost stable circular orbit of the segmented metric (m).
    pub fn isco_radius(&self) -> SszResult<f64> {
        observables::isco_radius(&self.series, self.scales().r_s)
    }

    pub fn shadow_impact_parameter(&self) -> SszResult<f64> {
        observables::shadow_impact_parameter(&self.series, self.scales().r_s)
    }

    /// Shadow angular diameter seen from `distance_m` (μas).
    pub fn shadow_diameter_microarcsec(&self, distance_m: f64) -> SszResult<f64> {
        let b = self.shadow_impact_parameter()?;
        observables::angular_diameter_microarcsec(b, distance_m)
    }

    /// Predicted shadow against an observed diameter, 15% tolerance.
    pub fn compare_shadow(
        &self,
        distance_m: f64,
        observed_uas: f64,
    ) -> SszResult<ShadowComparison> {
        let predicted = self.shadow_diameter_microarcsec(distance_m)?;
        Ok(observables::compare_shadow(predicted, observed_uas, SHADOW_TOLERANCE))
    }

    /// Quasi-normal mode ω (rad/s).
    pub fn quasi_normal_mode(&self, l: u32, n: u32) -> SszResult<Complex64> {
        observables::quasi_normal_mode(&self.series, self.scales().r_s, self.config.c, l, n)
    }

    /// Perihelion advance per orbit (rad).
    pub fn perihelion_advance(&self, semi_major_m: f64, eccentricity: f64) -> SszResult<f64> {
        observables::perihelion_advance(self.scales(), semi_major_m, eccentricity)
    }

    /// Light deflection at impact parameter `impact_m` (rad).
    pub fn light_deflection(&self, impact_m: f64) -> SszResult<f64> {
        Self::check_radius(impact_m)?;
        Ok(observables::light_deflection(self.scales(), impact_m))
    }

    /// One-way Shapiro delay (s); observer at 1e11 m unless given.
    pub fn shapiro_delay(&self, r_closest: f64, r_observer: Option<f64>) -> SszResult<f64> {
        Self::check_radius(r_closest)?;
        Ok(observables::shapiro_delay(
            self.scales(),
            self.config.c,
            r_closest,
            r_observer,
        ))
    }

    /// PPN γ and β, read at `r_test` (100 r_s by default).
    pub fn ppn_parameters(&self, r_test: Option<f64>) -> SszResult<PpnParameters> {
        observables::extract_gamma_beta(&self.series, self.scales().r_s, r_test)
    }

    /// Geodesic integrator on this metric; connections are clamped below r_φ.
    pub fn geodesics(&self) -> GeodesicSolver<'_, SeriesMetric> {
        GeodesicSolver::new(&self.series, self.scales().r_phi)
    }

    /// Isotropic radius of the areal radius `r` (r ≥ r_s).
    pub fn isotropic_radius(&self, r: f64) -> SszResult<f64> {
        observables::isotropic_from_areal(r, self.scales().r_s)
    }

    pub fn areal_radius(&self, isotropic: f64) -> SszResult<f64> {
        Self::check_radius(isotropic)?;
        Ok(observables::areal_from_isotropic(isotropic, self.scales().r_s))
    }

    pub fn hawking_luminosity(&self) -> f64 {
        thermo::hawking_luminosity(self.config.mass_kg, self.config.g, self.config.c)
    }

    pub fn evaporation_time(&self) -> f64 {
        thermo::evaporation_time(self.config.mass_kg, self.config.g, self.config.c)
    }

    /// Black-hole-bomb energy trajectory at coupling `lambda`.
    pub fn black_hole_bomb(
        &self,
        e_initial: f64,
        lambda: f64,
        steps: usize,
    ) -> SszResult<Vec<f64>> {
        thermo::black_hole_bomb(
            e_initial,
            lambda,
            self.scales().lambda_crit,
            self.config.segments,
            self.config.phi,
            steps,
        )
    }

    /// Mirror-blend model for the same mass and floor.
    pub fn mirror_blend(&self) -> SszResult<MirrorBlendMetric> {
        MirrorBlendMetric::with_floor(
            self.scales().r_s,
            self.config.phi,
            self.config.floor_epsilon,
            self.config.floor_beta,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssz_physics::constants::KPC_M;
    use ssz_types::config::M_SUN;
    use ssz_types::ProfileSource;
    use std::f64::consts::FRAC_PI_2;

    fn solar() -> SegmentedMetric {
        SegmentedMetric::new(M_SUN).unwrap()
    }

    fn radii(r_s: f64) -> Vec<f64> {
        (0..=60).map(|i| r_s * 10f64.powf(-3.0 + 0.1 * i as f64)).collect()
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(matches!(
            SegmentedMetric::new(0.0),
            Err(SszError::Validation(_))
        ));
        let m = solar();
        for r in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(m.evaluate(r, FRAC_PI_2), Err(SszError::Validation(_))));
        }
        assert!(m.evaluate(3000.0, f64::NAN).is_err());
    }

    #[test]
    fn test_coefficients_positive_and_reciprocal() {
        let m = solar();
        for r in radii(m.scales().r_s) {
            let e = m.evaluate_equatorial(r).unwrap();
            let c = e.coefficients;
            assert!(c.a > 0.0, "A({r:.3e}) = {}", c.a);
            assert!((c.a * c.b - 1.0).abs() < 1e-12, "A·B at r={r:.3e}");
            assert!(e.time_dilation > 0.0 && e.redshift.is_finite());
        }
    }

    #[test]
    fn test_singularity_free_everywhere() {
        let m = solar();
        let s = *m.scales();
        for r in radii(s.r_s) {
            let e = m.evaluate_equatorial(r).unwrap();
            assert!(e.singularity.all_clear, "r = {r:.3e}: {:?}", e.singularity);
            assert!(e.curvature.kretschmann <= 1.1 * s.k_max);
            let rho = e.stress_energy.tensor().rho;
            assert!((0.0..=1.1 * s.rho_max).contains(&rho), "rho = {rho:.3e}");
        }
    }

    #[test]
    fn test_far_field_matches_classical() {
        let m = solar();
        let r_s = m.scales().r_s;
        for k in [50.0, 100.0, 1000.0] {
            let r = k * r_s;
            let a = m.evaluate_equatorial(r).unwrap().coefficients.a;
            assert!((a - (1.0 - r_s / r)).abs() < 2e-4, "A({k} r_s) = {a}");
        }
    }

    #[test]
    fn test_repeated_evaluation_identical() {
        let m = solar();
        let r = 3.0 * m.scales().r_s;
        let first = m.evaluate(r, 1.0).unwrap();
        let second = m.evaluate(r, 1.0).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }

    #[test]
    fn test_evaluation_contents() {
        let m = solar();
        let s = *m.scales();
        let r = 4.0 * s.r_s;
        let e = m.evaluate_equatorial(r).unwrap();
        assert_eq!(e.profile.source, ProfileSource::ClosedForm);
        assert!((e.profile.phi - 0.1 * (-r / s.r_phi).exp()).abs() < 1e-15);
        assert!(!e.stress_energy.is_degraded());
        assert_eq!(e.classical_photon_sphere, 1.5 * s.r_s);
        assert_eq!(e.classical_isco, 3.0 * s.r_s);
        assert_eq!(e.mass_correction_percent, s.delta_percent);
        assert!(e.hubble.is_some_and(|h| h > 0.0));
        assert!((e.metric_tensor[0] + e.coefficients.a).abs() < 1e-15);
        assert!((e.weak_field_parameter - 0.125).abs() < 1e-12);
        assert!((e.time_dilation * (1.0 + e.redshift) - 1.0).abs() < 1e-12);
        assert!(e.hawking_temperature > 0.0 && e.entropy > 0.0);
    }

    #[test]
    fn test_hubble_disabled() {
        let cfg = MetricConfig {
            include_hubble: false,
            ..MetricConfig::for_mass(M_SUN)
        };
        let e = SegmentedMetric::with_config(cfg)
            .unwrap()
            .evaluate_equatorial(1e6)
            .unwrap();
        assert_eq!(e.hubble, None);
    }

    #[test]
    fn test_geometric_fallback_is_tagged() {
        let cfg = MetricConfig {
            action: None,
            ..MetricConfig::for_mass(M_SUN)
        };
        let m = SegmentedMetric::with_config(cfg).unwrap();
        let s = *m.scales();
        for r in [0.5 * s.r_s, 2.0 * s.r_s, 20.0 * s.r_s] {
            let e = m.evaluate_equatorial(r).unwrap();
            assert!(e.stress_energy.is_degraded());
            assert!(e.stress_energy.action_derived().is_none());
            let t = e.stress_energy.tensor();
            assert!((0.0..=s.rho_max).contains(&t.rho));
            assert!(t.p_r.abs() <= s.rho_max && t.p_t.abs() <= s.rho_max);
        }
    }

    #[test]
    fn test_action_path_floors_radius() {
        let m = solar();
        let s = *m.scales();
        let profile = ScalarFieldProfile {
            phi: 0.05,
            phi_prime: 0.5,
            source: ProfileSource::ClosedForm,
        };
        let einstein = GeometricTensor::default();
        let deep = m.stress_energy(1e-9 * s.r_phi, FRAC_PI_2, &profile, &einstein);
        let floor = m.stress_energy(0.1 * s.r_phi, FRAC_PI_2, &profile, &einstein);
        assert_eq!(deep, floor);
    }

    #[test]
    fn test_exact_mode_uses_cached_integration() {
        let cfg = MetricConfig {
            profile_mode: ProfileMode::Exact,
            ..MetricConfig::for_mass(M_SUN)
        };
        let m = SegmentedMetric::with_config(cfg).unwrap();
        let r = 3.0 * m.scales().r_s;
        let e = m.evaluate_equatorial(r).unwrap();
        assert_eq!(e.profile.source, ProfileSource::Integrated);

        let first = m.tov_solution().unwrap();
        let second = m.tov_solution().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(e.profile, first.profile_at(r));

        // beyond r_max the last node is held
        let far = m.evaluate_equatorial(1e3 * m.scales().r_s).unwrap();
        assert_eq!(far.profile, first.profile_at(f64::INFINITY));
    }

    #[test]
    fn test_action_verdict_between_one_and_two_rs() {
        let m = solar();
        let s = *m.scales();
        let r = 1.5 * s.r_s;
        let profile = m.profile_provider().unwrap().profile_at(r);
        let e = m.evaluate_equatorial(r).unwrap();
        let t = e.stress_energy.action_derived().unwrap();

        // 1 − 2GM/(c²r) = 1/3 at this radius, so X > 0 and Δ = −ZX < 0
        let one_minus = 1.0 - 2.0 * m.series().geometric_mass() / r;
        assert!((one_minus - 1.0 / 3.0).abs() < 1e-12);
        let expected = ScalarAction::default_params()
            .stress_energy(profile.phi, profile.phi_prime, one_minus)
            .clamped(s.rho_max);
        assert_eq!(*t, expected);
        assert!(t.delta < 0.0, "Δ = {:e}", t.delta);
        assert!(e.energy_conditions.nec && e.energy_conditions.wec);
        assert!(!e.energy_conditions.exotic);
    }

    #[test]
    fn test_exact_mode_cache_shared_across_threads() {
        let cfg = MetricConfig {
            profile_mode: ProfileMode::Exact,
            ..MetricConfig::for_mass(M_SUN)
        };
        let m = SegmentedMetric::with_config(cfg).unwrap();
        let r = 2.0 * m.scales().r_s;

        let solutions: Vec<Arc<TovSolution>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        let e = m.evaluate_equatorial(r).unwrap();
                        assert_eq!(e.profile.source, ProfileSource::Integrated);
                        m.tov_solution().unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let first = &solutions[0];
        assert!(solutions.iter().all(|s| Arc::ptr_eq(s, first)));
        assert!(Arc::ptr_eq(first, &m.tov_solution().unwrap()));
    }

    #[test]
    fn test_exact_mode_failure_is_cached() {
        let mut cfg = MetricConfig {
            profile_mode: ProfileMode::Exact,
            ..MetricConfig::for_mass(M_SUN)
        };
        // 1 − r_s/r at 1.05 r_s is ≈ 0.048, well inside this margin
        cfg.tov.guard.margin = 0.5;
        let m = SegmentedMetric::with_config(cfg).unwrap();
        let err = m.evaluate_equatorial(4000.0).unwrap_err();
        assert!(matches!(err, SszError::HorizonGuard { .. }), "{err}");
        assert_eq!(m.tov_solution().unwrap_err(), err);
    }

    #[test]
    fn test_observables_solar() {
        let m = solar();
        let r_s = m.scales().r_s;
        let ps = m.photon_sphere_radius().unwrap() / r_s;
        let isco = m.isco_radius().unwrap() / r_s;
        assert!(ps > 1.2 && ps < 1.6, "photon sphere {ps} r_s");
        assert!(isco > 2.5 && isco < 3.5 && isco > ps, "ISCO {isco} r_s");

        let omega = m.quasi_normal_mode(2, 0).unwrap();
        assert!(omega.re > 0.0 && omega.im < 0.0);

        let au = 1.495_978_707e11;
        let per_orbit = m.perihelion_advance(0.387_098 * au, 0.205_630).unwrap();
        let century = observables::arcsec_per_century(per_orbit, 0.240_846);
        assert!((40.0..=45.0).contains(&century), "{century}″/century");

        assert!(m.light_deflection(6.957e8).unwrap() > 0.0);
        assert!(m.light_deflection(0.0).is_err());
        assert!(m.shapiro_delay(6.957e8, None).unwrap() > 0.0);
        assert_eq!(m.shapiro_delay(2e11, None).unwrap(), 0.0);
    }

    #[test]
    fn test_sgr_a_star_shadow() {
        let m = SegmentedMetric::new(4.154e6 * M_SUN).unwrap();
        let d = 8.178 * KPC_M;
        let size = m.shadow_diameter_microarcsec(d).unwrap();
        assert!((10.0..=100.0).contains(&size), "shadow {size} μas");
        let cmp = m.compare_shadow(d, 51.8).unwrap();
        assert!(cmp.within_tolerance, "{cmp:?}");
    }

    #[test]
    fn test_weak_field_ppn_and_orbits() {
        let m = solar();
        let r_s = m.scales().r_s;
        let ppn = m.ppn_parameters(None).unwrap();
        assert!((ppn.gamma - 1.0).abs() < 1e-6 && (ppn.beta - 1.0).abs() < 1e-6, "{ppn:?}");
        assert!(m.ppn_parameters(Some(r_s)).is_err());

        let geo = m.geodesics();
        let isco = m.isco_radius().unwrap();
        assert!(geo.circular_orbit(1.5 * isco, true).is_ok());
        let photon_sphere = m.photon_sphere_radius().unwrap();
        assert!(geo.circular_orbit(0.95 * photon_sphere, true).is_err());
    }

    #[test]
    fn test_isotropic_round_trip() {
        let m = solar();
        let r_s = m.scales().r_s;
        for k in [1.0, 1.5, 3.0, 10.0, 100.0] {
            let r = k * r_s;
            let rho = m.isotropic_radius(r).unwrap();
            let back = m.areal_radius(rho).unwrap();
            assert!((back - r).abs() / r < 1e-6, "k = {k}");
        }
        assert!(m.isotropic_radius(0.5 * r_s).is_err());
    }

    #[test]
    fn test_bomb_uses_segment_coupling() {
        let m = solar();
        let crit = m.scales().lambda_crit;
        assert!(m.black_hole_bomb(1.0, crit, 10).is_err());
        assert_eq!(m.black_hole_bomb(1.0, 0.5 * crit, 10).unwrap().len(), 10);
        assert!(m.hawking_luminosity() > 0.0 && m.evaporation_time() > 0.0);
    }

    #[test]
    fn test_mirror_blend_shares_mass() {
        let m = solar();
        let mirror = m.mirror_blend().unwrap();
        assert_eq!(mirror.r_s(), m.scales().r_s);
        assert!(mirror.r_star() > m.scales().r_s);
    }
}
