use crate::WsError;

/// Floating point type used throughout system
pub type Real = f64;

/// Number of samples used when a curve segment is discretised.
pub const DEFAULT_SAMPLES: usize = 50;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, WsError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(WsError::NonFinite { what, value: v })
    }
}

/// `n` evenly spaced samples over `[start, end]`, both endpoints included.
///
/// A zero-width interval yields `n` copies of `start`.
pub fn linspace(start: Real, end: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as Real;
            let mut xs: Vec<Real> = (0..n).map(|i| start + step * i as Real).collect();
            // pin the last sample so rounding never overshoots the interval
            xs[n - 1] = end;
            xs
        }
    }
}

/// Composite trapezoidal rule over paired samples.
///
/// Returns 0 for fewer than two samples.
pub fn trapezoid(ys: &[Real], xs: &[Real]) -> Result<Real, WsError> {
    if ys.len() != xs.len() {
        return Err(WsError::InvalidArg {
            what: "trapezoid needs one x per y",
        });
    }
    let area = xs
        .windows(2)
        .zip(ys.windows(2))
        .map(|(x, y)| 0.5 * (y[0] + y[1]) * (x[1] - x[0]))
        .sum::<Real>();
    ensure_finite(area, "trapezoid area")
}

/// Trapezoid sum over `ys` where every interval is weighted by the full
/// span `end - start` instead of its own width.
///
/// For `n` samples this is `n - 1` times the composite rule over
/// `linspace(start, end, n)`.
pub fn trapezoid_over_span(ys: &[Real], start: Real, end: Real) -> Result<Real, WsError> {
    let span = end - start;
    let area = ys
        .windows(2)
        .map(|y| 0.5 * (y[0] + y[1]) * span)
        .sum::<Real>();
    ensure_finite(area, "trapezoid area")
}
