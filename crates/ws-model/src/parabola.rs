//! Parabolic pieces of the emission-rate curve.

use ws_core::Real;

/// `f(x) = a (x - vertex_x)^2 + vertex_y`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parabola {
    pub a: Real,
    pub vertex_x: Real,
    pub vertex_y: Real,
}

impl Parabola {
    /// Parabola with its vertex at `(vertex_x, vertex_y)` passing through
    /// `(anchor_x, anchor_y)`.
    ///
    /// When the anchor sits on the vertex column the domain is a single point
    /// and the curve is flat at `vertex_y`.
    pub fn through(anchor_x: Real, anchor_y: Real, vertex_x: Real, vertex_y: Real) -> Self {
        let dx = anchor_x - vertex_x;
        let a = if dx == 0.0 {
            0.0
        } else {
            (anchor_y - vertex_y) / (dx * dx)
        };
        Self {
            a,
            vertex_x,
            vertex_y,
        }
    }

    pub fn flat(y: Real) -> Self {
        Self {
            a: 0.0,
            vertex_x: 0.0,
            vertex_y: y,
        }
    }

    #[inline]
    pub fn eval(&self, x: Real) -> Real {
        let d = x - self.vertex_x;
        self.a * d * d + self.vertex_y
    }

    pub fn sample(&self, xs: &[Real]) -> Vec<Real> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_anchor_and_vertex() {
        let p = Parabola::through(16.0, 0.0, 17.0, 0.93);
        assert!((p.eval(16.0) - 0.0).abs() < 1e-12);
        assert!((p.eval(17.0) - 0.93).abs() < 1e-12);
        // opens downward: the vertex is the maximum
        assert!(p.a < 0.0);
        assert!(p.eval(16.5) < 0.93);
    }

    #[test]
    fn degenerate_anchor_is_flat() {
        let p = Parabola::through(22.0, 0.0, 22.0, 1.24);
        assert_eq!(p.a, 0.0);
        assert_eq!(p.eval(22.0), 1.24);
        assert_eq!(p.eval(30.0), 1.24);
    }

    #[test]
    fn flat_ignores_x() {
        let p = Parabola::flat(0.31);
        assert_eq!(p.sample(&[0.0, 5.0, 21.0]), vec![0.31, 0.31, 0.31]);
    }
}
