// ─────────────────────────────────────────────────────────────────────
// SSZ Metric Kernel — Bracketed Root Finding
// ─────────────────────────────────────────────────────────────────────
//! Brent's method with an iteration budget, and an ordered list of
//! brackets tried in turn. A bracket without a sign change hands over
//! to the next one; when all are exhausted the caller gets
//! `SszError::NoIntersection`.

use ssz_types::{SszError, SszResult};

/// Default Brent iteration budget.
pub const MAX_ITERATIONS: usize = 200;

/// Closed search interval [lo, hi].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub lo: f64,
    pub hi: f64,
}

impl Bracket {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Bracket given as multiples of a length scale.
    pub fn scaled(lo: f64, hi: f64, scale: f64) -> Self {
        Self {
            lo: lo * scale,
            hi: hi * scale,
        }
    }
}

/// Brent's method on [lo, hi].
///
/// Returns `NoIntersection` when f(lo) and f(hi) share a sign,
/// `Numerical` on a non-finite function value, `NonConvergence` when
/// the iteration budget runs out.
pub fn brent<F>(f: F, lo: f64, hi: f64, xtol: f64, max_iter: usize) -> SszResult<f64>
where
    F: Fn(f64) -> f64,
{
    let mut a = lo;
    let mut b = hi;
    let mut fa = f(a);
    let mut fb = f(b);
    if !fa.is_finite() || !fb.is_finite() {
        return Err(SszError::Numerical(format!(
            "non-finite function value at bracket ends ({fa}, {fb})"
        )));
    }
    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }
    if (fa > 0.0) == (fb > 0.0) {
        return Err(SszError::NoIntersection { lo, hi, attempts: 1 });
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    for _ in 0..max_iter {
        if (fb > 0.0) == (fc > 0.0) {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * xtol;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol || fb == 0.0 {
            return Ok(b);
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            // Inverse quadratic interpolation, or secant when a == c
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let qa = fa / fc;
                let rb = fb / fc;
                (
                    s * (2.0 * xm * qa * (qa - rb) - (b - a) * (rb - 1.0)),
                    (qa - 1.0) * (rb - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let min1 = 3.0 * xm * q - (tol * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(xm) };
        fb = f(b);
        if !fb.is_finite() {
            return Err(SszError::Numerical(format!(
                "non-finite function value at x = {b:.6e}"
            )));
        }
    }

    Err(SszError::NonConvergence(format!(
        "Brent exceeded {max_iter} iterations on [{lo:.6e}, {hi:.6e}]"
    )))
}

/// Try each bracket in order; the first sign change wins.
pub fn solve_with_brackets<F>(f: F, brackets: &[Bracket], xtol: f64) -> SszResult<f64>
where
    F: Fn(f64) -> f64,
{
    let mut last = Bracket::new(f64::NAN, f64::NAN);
    for (i, bracket) in brackets.iter().enumerate() {
        match brent(&f, bracket.lo, bracket.hi, xtol, MAX_ITERATIONS) {
            Ok(root) => return Ok(root),
            Err(SszError::NoIntersection { .. }) => {
                log::debug!(
                    "bracket {} [{:.6e}, {:.6e}] holds no sign change, widening",
                    i + 1,
                    bracket.lo,
                    bracket.hi
                );
                last = *bracket;
            }
            Err(other) => return Err(other),
        }
    }
    Err(SszError::NoIntersection {
        lo: last.lo,
        hi: last.hi,
        attempts: brackets.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brent_sqrt2() {
        let root = brent(|x| x * x - 2.0, 0.0, 2.0, 1e-14, MAX_ITERATIONS).unwrap();
        assert!((root - 2f64.sqrt()).abs() < 1e-13, "root={root}");
    }

    #[test]
    fn test_brent_transcendental() {
        let root = brent(|x| x.cos() - x, 0.0, 1.0, 1e-14, MAX_ITERATIONS).unwrap();
        assert!((root - 0.739_085_133_215_160_6).abs() < 1e-12);
    }

    #[test]
    fn test_brent_no_sign_change() {
        let err = brent(|x| x * x + 1.0, -1.0, 1.0, 1e-12, MAX_ITERATIONS).unwrap_err();
        assert!(matches!(err, SszError::NoIntersection { .. }));
    }

    #[test]
    fn test_brent_budget() {
        let err = brent(|x| x - 0.3, 0.0, 1.0, 0.0, 1).unwrap_err();
        assert!(matches!(err, SszError::NonConvergence(_)), "{err}");
    }

    #[test]
    fn test_brackets_widen_once() {
        let f = |x: f64| x - 2.8;
        let brackets = [Bracket::new(1.01, 2.5), Bracket::new(1.001, 3.0)];
        let root = solve_with_brackets(f, &brackets, 1e-12).unwrap();
        assert!((root - 2.8).abs() < 1e-10);
    }

    #[test]
    fn test_brackets_exhausted() {
        let f = |x: f64| x - 10.0;
        let brackets = [Bracket::new(1.01, 2.5), Bracket::new(1.001, 3.0)];
        match solve_with_brackets(f, &brackets, 1e-12) {
            Err(SszError::NoIntersection { lo, hi, attempts }) => {
                assert_eq!(attempts, 2);
                assert_eq!(lo, 1.001);
                assert_eq!(hi, 3.0);
            }
            other => panic!("expected NoIntersection, got {other:?}"),
        }
    }
}
