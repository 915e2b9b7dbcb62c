// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Numerical Stability Primitives
// ─────────────────────────────────────────────────────────────────────
//! Bounded replacements for `exp`, `sech²`, `sqrt` and division, the
//! tanh saturation maps, and the softplus floor that keeps the metric
//! coefficient strictly above ε.
//!
//! None of these functions fail or return NaN for finite input.

/// Argument bound of [`exp_clip`].
pub const EXP_CLIP_BOUND: f64 = 80.0;
/// Substitute for zero/negative arguments of [`safe_sqrt`] and [`safe_divide`].
pub const TINY: f64 = 1e-30;

/// exp(x) with x clipped to [−80, 80].
#[inline]
pub fn exp_clip(x: f64) -> f64 {
    x.clamp(-EXP_CLIP_BOUND, EXP_CLIP_BOUND).exp()
}

/// sech²(z), switching to 4e^(−2|z|) for |z| ≥ 20.
#[inline]
pub fn sech2_stable(z: f64) -> f64 {
    let az = z.abs();
    if az < 20.0 {
        let c = z.cosh();
        1.0 / (c * c)
    } else {
        4.0 * (-2.0 * az).exp()
    }
}

/// Symmetric saturation cap·tanh(x/cap). Identity when cap ≤ 0.
#[inline]
pub fn sat_tanh(x: f64, cap: f64) -> f64 {
    if cap > 0.0 {
        cap * (x / cap).tanh()
    } else {
        x
    }
}

/// Derivative of [`sat_tanh`] with respect to x.
#[inline]
pub fn sat_tanh_deriv(x: f64, cap: f64) -> f64 {
    if cap > 0.0 {
        sech2_stable(x / cap)
    } else {
        1.0
    }
}

/// Positive-only saturation: negative input maps to 0.
#[inline]
pub fn sat_pos_tanh(x: f64, cap: f64) -> f64 {
    sat_tanh(x.max(0.0), cap)
}

/// Logistic saturation x_max / (1 + e^(−x/x_max)).
pub fn sigmoid_saturation(x: f64, x_max: f64) -> Result<f64, &'static str> {
    if !(x_max > 0.0) {
        return Err("x_max must be positive");
    }
    Ok(x_max / (1.0 + exp_clip(-x / x_max)))
}

/// Stable softplus: log(1 + exp(x)) with overflow protection.
#[inline]
pub fn softplus(x: f64) -> f64 {
    if x > 50.0 {
        x
    } else if x < -50.0 {
        x.exp()
    } else {
        x.exp().ln_1p()
    }
}

/// Smallest f64 strictly greater than `x`.
#[inline]
fn next_up(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

/// Smooth floor ε + softplus(β(v − ε))/β.
///
/// Differentiable everywhere, ≈ v for v ≫ ε, and strictly greater than
/// ε for every input including −∞ and NaN.
#[inline]
pub fn smooth_floor(value: f64, epsilon: f64, beta: f64) -> f64 {
    let shifted = value - epsilon;
    let arg = beta * shifted;
    let out = if arg > 50.0 {
        shifted + epsilon
    } else {
        softplus(arg) / beta + epsilon
    };
    if out > epsilon {
        out
    } else {
        next_up(epsilon)
    }
}

/// √max(x, 1e-30).
#[inline]
pub fn safe_sqrt(x: f64) -> f64 {
    x.max(TINY).sqrt()
}

/// n / d with |d| raised to at least 1e-30, keeping the sign of d.
#[inline]
pub fn safe_divide(numerator: f64, denominator: f64) -> f64 {
    let d = if denominator.abs() < TINY {
        TINY.copysign(denominator)
    } else {
        denominator
    };
    numerator / d
}

/// 1 − e^(−x), accurate for small x.
#[inline]
pub fn one_minus_exp_neg(x: f64) -> f64 {
    -(-x).exp_m1()
}

/// Golden-ratio energy cap E₀(1 − e^(−φK)).
#[inline]
pub fn golden_ratio_saturation(e0: f64, segments: f64, phi: f64) -> f64 {
    e0 * one_minus_exp_neg(phi * segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exp_clip_bounded() {
        assert!(exp_clip(1e6).is_finite());
        assert!((exp_clip(1e6) - 80f64.exp()).abs() / 80f64.exp() < 1e-15);
        assert!(exp_clip(-1e6) > 0.0);
        assert!((exp_clip(1.5) - 1.5f64.exp()).abs() < 1e-15);
    }

    #[test]
    fn test_sech2_continuity_at_switch() {
        let below = sech2_stable(19.999_999);
        let above = sech2_stable(20.0);
        assert!((below - above).abs() / above < 1e-5, "{below} vs {above}");
        assert!((sech2_stable(0.0) - 1.0).abs() < 1e-15);
        assert!(sech2_stable(1e5) >= 0.0);
        assert_eq!(sech2_stable(-3.0), sech2_stable(3.0));
    }

    #[test]
    fn test_sat_tanh() {
        assert!((sat_tanh(1e9, 2.0) - 2.0).abs() < 1e-12);
        assert!((sat_tanh(-1e9, 2.0) + 2.0).abs() < 1e-12);
        assert!((sat_tanh(1e-6, 2.0) - 1e-6).abs() < 1e-15);
        assert_eq!(sat_tanh(123.0, 0.0), 123.0);
        assert_eq!(sat_tanh(123.0, -1.0), 123.0);
        assert_eq!(sat_pos_tanh(-5.0, 1.0), 0.0);
    }

    #[test]
    fn test_sigmoid_saturation() {
        assert!(sigmoid_saturation(1.0, 0.0).is_err());
        let v = sigmoid_saturation(0.0, 4.0).unwrap();
        assert!((v - 2.0).abs() < 1e-12);
        assert!(sigmoid_saturation(1e9, 4.0).unwrap() <= 4.0);
    }

    #[test]
    fn test_smooth_floor_strict() {
        let eps = 1e-6;
        for v in [-1e300, -1.0, 0.0, eps, f64::NEG_INFINITY, f64::NAN] {
            let out = smooth_floor(v, eps, 50.0);
            assert!(out > eps, "floor({v}) = {out} not above eps");
        }
    }

    #[test]
    fn test_smooth_floor_transparent_above() {
        let eps = 1e-6;
        for v in [0.5, 0.9, 1.0, 10.0] {
            let out = smooth_floor(v, eps, 50.0);
            assert!((out - v).abs() < 1e-12, "floor({v}) = {out}");
        }
    }

    #[test]
    fn test_smooth_floor_monotone() {
        let mut prev = 0.0;
        let mut v = -2.0;
        while v < 2.0 {
            let out = smooth_floor(v, 1e-6, 50.0);
            assert!(out >= prev, "not monotone at {v}");
            prev = out;
            v += 0.01;
        }
    }

    #[test]
    fn test_safe_ops() {
        assert!(safe_sqrt(-4.0) > 0.0);
        assert!((safe_sqrt(4.0) - 2.0).abs() < 1e-15);
        assert!(safe_divide(1.0, 0.0).is_finite());
        assert!(safe_divide(1.0, -1e-40) < 0.0);
        assert!((safe_divide(6.0, 3.0) - 2.0).abs() < 1e-15);
    }

    #[test]
    fn test_golden_ratio_saturation() {
        let e = golden_ratio_saturation(10.0, 100.0, 1.618);
        assert!((e - 10.0).abs() < 1e-12);
        let small = golden_ratio_saturation(10.0, 1e-3, 1.618);
        assert!((small - 10.0 * 1.618e-3).abs() < 1e-7);
    }
}
