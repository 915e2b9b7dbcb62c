// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Energy-Condition Evaluator
// ─────────────────────────────────────────────────────────────────────
//! Weak, null, dominant and strong energy conditions evaluated with the
//! mean pressure p̄ = (p_r + 2p_t)/3. Matter violating the null
//! condition is flagged exotic.

use ssz_types::{EnergyConditionVerdict, StressEnergyTensor};

/// Classify a stress-energy tensor. Pure and total.
pub fn evaluate_energy_conditions(t: &StressEnergyTensor) -> EnergyConditionVerdict {
    let rho = t.rho;
    let p = t.mean_pressure();

    let nec = rho + p >= 0.0;
    let wec = rho >= 0.0 && nec;
    let dec = rho >= 0.0 && rho >= p.abs();
    let sec = nec && rho + 3.0 * p >= 0.0;

    EnergyConditionVerdict {
        wec,
        nec,
        dec,
        sec,
        exotic: !nec,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dust_satisfies_all() {
        let v = evaluate_energy_conditions(&StressEnergyTensor::from_components(1.0, 0.0, 0.0));
        assert!(v.wec && v.nec && v.dec && v.sec);
        assert!(!v.exotic);
    }

    #[test]
    fn test_vacuum_energy_violates_sec_only() {
        // p = −ρ
        let v = evaluate_energy_conditions(&StressEnergyTensor::from_components(1.0, -1.0, -1.0));
        assert!(v.wec && v.nec && v.dec);
        assert!(!v.sec);
        assert!(!v.exotic);
    }

    #[test]
    fn test_phantom_matter_is_exotic() {
        let v = evaluate_energy_conditions(&StressEnergyTensor::from_components(1.0, -2.0, -2.0));
        assert!(!v.nec && !v.wec && !v.sec);
        assert!(v.exotic);
    }

    #[test]
    fn test_stiff_matter_violates_dec() {
        let v = evaluate_energy_conditions(&StressEnergyTensor::from_components(1.0, 2.0, 2.0));
        assert!(v.wec && v.nec && v.sec);
        assert!(!v.dec);
    }

    #[test]
    fn test_negative_density_fails_wec() {
        let v = evaluate_energy_conditions(&StressEnergyTensor::from_components(-1.0, 3.0, 3.0));
        assert!(v.nec);
        assert!(!v.wec && !v.dec);
    }

    #[test]
    fn test_anisotropic_uses_mean_pressure() {
        // p̄ = (−3 + 2·0)/3 = −1 → ρ + p̄ = 0 is NEC-satisfying
        let v = evaluate_energy_conditions(&StressEnergyTensor::from_components(1.0, -3.0, 0.0));
        assert!(v.nec);
        assert!(!v.sec);
    }
}
