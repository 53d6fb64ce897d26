//! Log-linear interpolation.
//!
//! Interpolates the logarithm of values. On discount factors this gives
//! positive values and piecewise constant forward rates.

use crate::error::{MathError, MathResult};
use crate::interpolation::{Interpolator, Nodes};

/// Log-linear interpolation between data points.
///
/// ```text
/// y(x) = exp(linear_interpolate(x, ln(y)))
/// ```
///
/// # Example
///
/// ```rust
/// use tenor_math::interpolation::{LogLinearInterpolator, Interpolator};
///
/// let times = vec![0.0, 1.0, 2.0, 3.0];
/// let discount_factors = vec![1.0, 0.97, 0.94, 0.91];
///
/// let interp = LogLinearInterpolator::new(times, discount_factors).unwrap();
/// let df = interp.interpolate(1.5).unwrap();
/// assert!(df > 0.94 && df < 0.97);
/// ```
#[derive(Debug, Clone)]
pub struct LogLinearInterpolator {
    nodes: Nodes,
    /// Precomputed ln(y) values
    log_ys: Vec<f64>,
    allow_extrapolation: bool,
}

impl LogLinearInterpolator {
    /// Creates a new log-linear interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - There are fewer than 2 points
    /// - Lengths differ
    /// - Any y value is non-positive
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        let nodes = Nodes::new(xs, ys)?;

        let mut log_ys = Vec::with_capacity(nodes.ys.len());
        for (i, &y) in nodes.ys.iter().enumerate() {
            if !(y > 0.0) {
                return Err(MathError::invalid_input(format!(
                    "y[{i}] = {y} is not positive; log-linear requires positive values"
                )));
            }
            log_ys.push(y.ln());
        }

        Ok(Self {
            nodes,
            log_ys,
            allow_extrapolation: false,
        })
    }

    /// Enables extrapolation beyond the data range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    /// Returns the original y values.
    #[must_use]
    pub fn y_values(&self) -> &[f64] {
        &self.nodes.ys
    }

    /// Slope of `ln y` on segment i.
    fn log_slope(&self, i: usize) -> f64 {
        let xs = &self.nodes.xs;
        (self.log_ys[i + 1] - self.log_ys[i]) / (xs[i + 1] - xs[i])
    }

    fn value_on(&self, i: usize, x: f64) -> f64 {
        (self.log_ys[i] + self.log_slope(i) * (x - self.nodes.xs[i])).exp()
    }
}

impl Interpolator for LogLinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        self.nodes.check(x, self.allow_extrapolation)?;
        Ok(self.value_on(self.nodes.segment(x), x))
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        self.nodes.check(x, self.allow_extrapolation)?;
        let i = self.nodes.segment(x);
        // d/dx exp(a + bx) = b * exp(a + bx)
        Ok(self.log_slope(i) * self.value_on(i, x))
    }

    fn integral(&self, a: f64, b: f64) -> MathResult<f64> {
        self.nodes.check(a, self.allow_extrapolation)?;
        self.nodes.check(b, self.allow_extrapolation)?;
        Ok(self.nodes.integrate(a, b, |i, lo, hi| {
            let slope = self.log_slope(i);
            if slope.abs() < 1e-14 {
                self.value_on(i, lo) * (hi - lo)
            } else {
                (self.value_on(i, hi) - self.value_on(i, lo)) / slope
            }
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
