//! Linear interpolation.

use crate::error::MathResult;
use crate::interpolation::{Interpolator, Nodes};

/// Linear interpolation between data points.
///
/// Extrapolation, when enabled, extends the first and last segments.
///
/// # Example
///
/// ```rust
/// use tenor_math::interpolation::{LinearInterpolator, Interpolator};
///
/// let xs = vec![0.0, 1.0, 2.0, 3.0];
/// let ys = vec![0.0, 1.0, 4.0, 9.0];
///
/// let interp = LinearInterpolator::new(xs, ys).unwrap();
/// assert_eq!(interp.interpolate(1.5).unwrap(), 2.5);
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    nodes: Nodes,
    allow_extrapolation: bool,
}

impl LinearInterpolator {
    /// Creates a new linear interpolator.
    ///
    /// # Arguments
    ///
    /// * `xs` - X coordinates (strictly increasing)
    /// * `ys` - Y coordinates
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 2 points, if lengths differ
    /// or if `xs` is not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        Ok(Self {
            nodes: Nodes::new(xs, ys)?,
            allow_extrapolation: false,
        })
    }

    /// Enables extrapolation beyond the data range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    fn slope(&self, i: usize) -> f64 {
        let Nodes { xs, ys } = &self.nodes;
        (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i])
    }

    fn value_on(&self, i: usize, x: f64) -> f64 {
        self.nodes.ys[i] + self.slope(i) * (x - self.nodes.xs[i])
    }
}

impl Interpolator for LinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        self.nodes.check(x, self.allow_extrapolation)?;
        Ok(self.value_on(self.nodes.segment(x), x))
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        self.nodes.check(x, self.allow_extrapolation)?;
        Ok(self.slope(self.nodes.segment(x)))
    }

    fn integral(&self, a: f64, b: f64) -> MathResult<f64> {
        self.nodes.check(a, self.allow_extrapolation)?;
        self.nodes.check(b, self.allow_extrapolation)?;
        Ok(self.nodes.integrate(a, b, |i, lo, hi| {
            0.5 * (self.value_on(i, lo) + self.value_on(i, hi)) * (hi - lo)
        }))
    }

    fn allows_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    fn min_x(&self) -> f64 {
        self.nodes.min_x()
    }

    fn max_x(&self) -> f64 {
        self.nodes.max_x()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_interpolation() {
        let interp = LinearInterpolator::new(vec![0.0, 1.0, 2.0], vec![0.0, 2.0, 4.0]).unwrap();

        assert_relative_eq!(interp.interpolate(0.0).unwrap(), 0.0, epsilon = 1e-10);
        assert_relative_eq!(interp.interpolate(1.0).unwrap(), 2.0, epsilon = 1e-10);
        assert_relative_eq!(interp.interpolate(2.0).unwrap(), 4.0, epsilon = 1e-10);
        assert_relative_eq!(interp.interpolate(0.5).unwrap(), 1.0, epsilon = 1e-10);
        assert_relative_eq!(interp.interpolate(1.5).unwrap(), 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_extrapolation_disabled() {
        let interp = LinearInterpolator::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0]).unwrap();

        assert!(interp.interpolate(-0.5).is_err());
        assert!(interp.interpolate(2.5).is_err());
        assert!(interp.integral(0.0, 2.5).is_err());
    }

    #[test]
    fn test_extrapolation_enabled() {
        let interp = LinearInterpolator::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 3.0])
            .unwrap()
            .with_extrapolation();

        assert_relative_eq!(interp.interpolate(-1.0).unwrap(), -1.0, epsilon = 1e-10);
        assert_relative_eq!(interp.interpolate(3.0).unwrap(), 5.0, epsilon = 1e-10);
        assert_relative_eq!(interp.derivative(3.0).unwrap(), 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_integral() {
        let interp = LinearInterpolator::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 3.0]).unwrap();

        // 0.5 over [0,1] plus 2.0 over [1,2]
        assert_relative_eq!(interp.integral(0.0, 2.0).unwrap(), 2.5, epsilon = 1e-12);
        assert_relative_eq!(interp.integral(2.0, 0.0).unwrap(), -2.5, epsilon = 1e-12);
        assert_relative_eq!(interp.integral(0.5, 0.5).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_derivative_per_segment() {
        let interp = LinearInterpolator::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 3.0]).unwrap();

        assert_relative_eq!(interp.derivative(0.5).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(interp.derivative(1.5).unwrap(), 2.0, epsilon = 1e-12);
    }
}
