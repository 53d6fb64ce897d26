//! Error types for mathematical operations.

use thiserror::Error;

/// A specialized Result type for mathematical operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur during mathematical operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// The evaluation budget ran out before the requested accuracy was met.
    #[error(
        "{algorithm} did not converge: {evaluations} evaluations exceed the budget of {max_evaluations} \
         (bracket [{x_min}, {x_max}], last residual {last_residual:.2e})"
    )]
    ConvergenceFailed {
        /// Name of the algorithm.
        algorithm: &'static str,
        /// Function evaluations performed.
        evaluations: usize,
        /// The evaluation budget.
        max_evaluations: usize,
        /// Lower end of the last bracket.
        x_min: f64,
        /// Upper end of the last bracket.
        x_max: f64,
        /// Last function value observed.
        last_residual: f64,
    },

    /// No sign change was found while expanding outward from a guess.
    #[error(
        "Unable to bracket a root from guess {guess} in {evaluations} evaluations \
         (last interval [{x_min}, {x_max}], f = [{fx_min:.2e}, {fx_max:.2e}])"
    )]
    BracketNotFound {
        /// The starting guess.
        guess: f64,
        /// Function evaluations performed.
        evaluations: usize,
        /// Lower end of the last interval tried.
        x_min: f64,
        /// Upper end of the last interval tried.
        x_max: f64,
        /// Function value at `x_min`.
        fx_min: f64,
        /// Function value at `x_max`.
        fx_max: f64,
    },

    /// Invalid bracket for root-finding.
    #[error("Invalid bracket: f({a}) = {fa:.2e} and f({b}) = {fb:.2e} have same sign")]
    InvalidBracket {
        /// Lower bound of bracket.
        a: f64,
        /// Upper bound of bracket.
        b: f64,
        /// Function value at a.
        fa: f64,
        /// Function value at b.
        fb: f64,
    },

    /// Interpolation point is outside the valid range.
    #[error("Extrapolation not allowed: {x} is outside [{min}, {max}]")]
    ExtrapolationNotAllowed {
        /// The query point.
        x: f64,
        /// Minimum valid value.
        min: f64,
        /// Maximum valid value.
        max: f64,
    },

    /// Insufficient data points for operation.
    #[error("Insufficient data: need at least {required}, got {actual}")]
    InsufficientData {
        /// Minimum required points.
        required: usize,
        /// Actual number of points.
        actual: usize,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl MathError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates an insufficient data error.
    #[must_use]
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }

    /// Number of function evaluations spent, for solver failures.
    #[must_use]
    pub fn evaluations(&self) -> Option<usize> {
        match self {
            Self::ConvergenceFailed { evaluations, .. } | Self::BracketNotFound { evaluations, .. } => {
                Some(*evaluations)
            }
            _ => None,
        }
    }
}
