//! Backward-flat interpolation.

use crate::error::MathResult;
use crate::interpolation::{Interpolator, Nodes};

/// Piecewise-constant interpolation taking each node's value on the
/// interval that ends at it.
///
/// The value on `(x[i-1], x[i]]` is `y[i]`. At `x[0]` and to its left the
/// value is `y[0]`; to the right of the last node it is the last value.
/// Used on instantaneous forwards this gives piecewise flat forward curves.
#[derive(Debug, Clone)]
pub struct BackwardFlatInterpolator {
    nodes: Nodes,
    allow_extrapolation: bool,
}

impl BackwardFlatInterpolator {
    /// Creates a new backward-flat interpolator.
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

    fn value(&self, x: f64) -> f64 {
        let Nodes { xs, ys } = &self.nodes;
        let i = xs.partition_point(|probe| *probe < x);
        ys[i.min(ys.len() - 1)]
    }
}

impl Interpolator for BackwardFlatInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        self.nodes.check(x, self.allow_extrapolation)?;
        Ok(self.value(x))
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        self.nodes.check(x, self.allow_extrapolation)?;
        Ok(0.0)
    }

    fn integral(&self, a: f64, b: f64) -> MathResult<f64> {
        self.nodes.check(a, self.allow_extrapolation)?;
        self.nodes.check(b, self.allow_extrapolation)?;
        // Each piece lies between consecutive nodes, so its midpoint picks the level
        Ok(self
            .nodes
            .integrate(a, b, |_, lo, hi| self.value(0.5 * (lo + hi)) * (hi - lo)))
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
