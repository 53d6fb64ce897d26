//! Interpolation over curve nodes.
//!
//! # Available Methods
//!
//! - [`LinearInterpolator`]: straight lines between nodes
//! - [`LogLinearInterpolator`]: linear in `ln y`, for discount factors
//! - [`BackwardFlatInterpolator`]: piecewise constant, each node's value
//!   holding back to the previous node
//!
//! | Method | Continuity | Typical quantity |
//! |--------|------------|------------------|
//! | Linear | C0 | Zero rates |
//! | Log-Linear | C0 | Discount factors (piecewise flat forwards) |
//! | Backward-Flat | none | Instantaneous forwards |
//!
//! [`Interpolation`] names a method and builds it from node data, which is
//! how curves pick their interpolation from configuration.

mod backward_flat;
mod linear;
mod log_linear;

pub use backward_flat::BackwardFlatInterpolator;
pub use linear::LinearInterpolator;
pub use log_linear::LogLinearInterpolator;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};

/// Trait for interpolation methods.
pub trait Interpolator: Send + Sync + fmt::Debug {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// Returns the first derivative at x.
    fn derivative(&self, x: f64) -> MathResult<f64>;

    /// Returns the integral of the interpolant over `[a, b]`.
    ///
    /// Reversed limits give the negated integral.
    fn integral(&self, a: f64, b: f64) -> MathResult<f64>;

    /// Returns true if extrapolation is allowed.
    fn allows_extrapolation(&self) -> bool {
        false
    }

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}

/// Interpolation method selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Interpolation {
    /// Linear interpolation.
    #[default]
    Linear,
    /// Linear interpolation of `ln y`.
    LogLinear,
    /// Piecewise constant, right-continuous at nodes from the left.
    BackwardFlat,
}

impl Interpolation {
    /// Builds an interpolator of this kind over the given nodes.
    ///
    /// # Errors
    ///
    /// Fails for fewer than two points, mismatched lengths, abscissae that
    /// are not strictly increasing, or non-positive values under
    /// [`Interpolation::LogLinear`].
    pub fn build(
        self,
        xs: Vec<f64>,
        ys: Vec<f64>,
        extrapolate: bool,
    ) -> MathResult<Box<dyn Interpolator>> {
        Ok(match self {
            Interpolation::Linear => {
                let interp = LinearInterpolator::new(xs, ys)?;
                Box::new(if extrapolate { interp.with_extrapolation() } else { interp })
            }
            Interpolation::LogLinear => {
                let interp = LogLinearInterpolator::new(xs, ys)?;
                Box::new(if extrapolate { interp.with_extrapolation() } else { interp })
            }
            Interpolation::BackwardFlat => {
                let interp = BackwardFlatInterpolator::new(xs, ys)?;
                Box::new(if extrapolate { interp.with_extrapolation() } else { interp })
            }
        })
    }

    /// Returns the name of the method.
    pub fn name(&self) -> &'static str {
        match self {
            Interpolation::Linear => "Linear",
            Interpolation::LogLinear => "LogLinear",
            Interpolation::BackwardFlat => "BackwardFlat",
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Validated node abscissae and ordinates shared by the interpolators.
#[derive(Debug, Clone)]
pub(crate) struct Nodes {
    pub(crate) xs: Vec<f64>,
    pub(crate) ys: Vec<f64>,
}

impl Nodes {
    pub(crate) fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        if xs.len() < 2 {
            return Err(MathError::insufficient_data(2, xs.len()));
        }
        if xs.len() != ys.len() {
            return Err(MathError::invalid_input(format!(
                "xs and ys must have same length: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }
        if xs.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(MathError::invalid_input(
                "x values must be strictly increasing",
            ));
        }
        Ok(Self { xs, ys })
    }

    pub(crate) fn min_x(&self) -> f64 {
        self.xs[0]
    }

    pub(crate) fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }

    /// Fails unless `x` is in range or extrapolation is allowed.
    pub(crate) fn check(&self, x: f64, allow_extrapolation: bool) -> MathResult<()> {
        if !allow_extrapolation && (x < self.min_x() || x > self.max_x()) {
            return Err(MathError::ExtrapolationNotAllowed {
                x,
                min: self.min_x(),
                max: self.max_x(),
            });
        }
        Ok(())
    }

    /// Finds the index i such that xs[i] <= x < xs[i+1], clamped to the
    /// first and last segments.
    pub(crate) fn segment(&self, x: f64) -> usize {
        let i = self.xs.partition_point(|probe| *probe <= x);
        i.saturating_sub(1).min(self.xs.len() - 2)
    }

    /// Integrates piecewise, calling `piece(i, lo, hi)` for each part of
    /// `[a, b]` that lies within a single segment `i`.
    pub(crate) fn integrate<G>(&self, a: f64, b: f64, piece: G) -> f64
    where
        G: Fn(usize, f64, f64) -> f64,
    {
        if b < a {
            return -self.integrate(b, a, piece);
        }
        let mut total = 0.0;
        let mut lo = a;
        for &x in self.xs.iter().filter(|x| **x > a && **x < b) {
            total += piece(self.segment(0.5 * (lo + x)), lo, x);
            lo = x;
        }
        if b > lo {
            total += piece(self.segment(0.5 * (lo + b)), lo, b);
        }
        total
    }
}
