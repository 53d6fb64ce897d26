//! Bootstrap configuration.

use serde::{Deserialize, Serialize};
use tenor_math::interpolation::Interpolation;
use tenor_math::solvers::{Solver1D, SolverAlgorithm, SolverConfig};

use crate::curves::CurveQuantity;
use crate::error::{CurveError, CurveResult};

/// Default solver accuracy for bootstrapped nodes.
pub const DEFAULT_BOOTSTRAP_ACCURACY: f64 = 1e-12;

/// Smallest discount factor the bracket search will try.
pub const MIN_DISCOUNT: f64 = 1e-8;

/// First guess for a rate node when none is configured.
const DEFAULT_RATE_GUESS: f64 = 0.02;

/// Settings for a [`PiecewiseCurve`](super::PiecewiseCurve).
///
/// # Example
///
/// ```rust
/// use tenor_curves::prelude::*;
/// use tenor_math::interpolation::Interpolation;
/// use tenor_math::solvers::SolverAlgorithm;
///
/// let config = BootstrapConfig::default()
///     .with_quantity(CurveQuantity::ZeroRate)
///     .with_interpolation(Interpolation::Linear)
///     .with_algorithm(SolverAlgorithm::Ridder);
///
/// let json = serde_json::to_string(&config).unwrap();
/// let back: BootstrapConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, back);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// What the nodes hold.
    pub quantity: CurveQuantity,
    /// How nodes are interpolated.
    pub interpolation: Interpolation,
    /// Root-finding algorithm used per node.
    pub algorithm: SolverAlgorithm,
    /// Solver accuracy on the node value.
    pub accuracy: f64,
    /// Evaluation budget per node, including bracketing.
    pub max_evaluations: usize,
    /// Guess for the first node. Defaults to `1.0` for discount factors
    /// and `0.02` for rates.
    pub first_guess: Option<f64>,
    /// First bracket-expansion step.
    pub initial_step: f64,
    /// Whether the finished curve extrapolates past its last node.
    pub allow_extrapolation: bool,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            quantity: CurveQuantity::Discount,
            interpolation: Interpolation::LogLinear,
            algorithm: SolverAlgorithm::default(),
            accuracy: DEFAULT_BOOTSTRAP_ACCURACY,
            max_evaluations: 100,
            first_guess: None,
            initial_step: 0.01,
            allow_extrapolation: false,
        }
    }
}

impl BootstrapConfig {
    /// Sets the node quantity.
    #[must_use]
    pub fn with_quantity(mut self, quantity: CurveQuantity) -> Self {
        self.quantity = quantity;
        self
    }

    /// Sets the interpolation.
    #[must_use]
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Sets the solver algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: SolverAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the solver accuracy.
    #[must_use]
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Sets the per-node evaluation budget.
    #[must_use]
    pub fn with_max_evaluations(mut self, max_evaluations: usize) -> Self {
        self.max_evaluations = max_evaluations;
        self
    }

    /// Copies algorithm, accuracy and budget from a solver configuration.
    #[must_use]
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.algorithm = solver.algorithm;
        self.accuracy = solver.accuracy;
        self.max_evaluations = solver.max_evaluations;
        self
    }

    /// Sets the first-node guess.
    #[must_use]
    pub fn with_first_guess(mut self, guess: f64) -> Self {
        self.first_guess = Some(guess);
        self
    }

    /// Sets the first bracket-expansion step.
    #[must_use]
    pub fn with_initial_step(mut self, step: f64) -> Self {
        self.initial_step = step;
        self
    }

    /// Enables or disables extrapolation on the finished curve.
    #[must_use]
    pub fn with_extrapolation(mut self, enabled: bool) -> Self {
        self.allow_extrapolation = enabled;
        self
    }

    /// The solver settings as a [`SolverConfig`].
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig::new(self.algorithm, self.accuracy, self.max_evaluations)
    }

    /// Guess for the first node.
    pub fn first_guess_value(&self) -> f64 {
        self.first_guess.unwrap_or(if self.quantity.is_rate() {
            DEFAULT_RATE_GUESS
        } else {
            1.0
        })
    }

    /// Checks the numeric settings.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Configuration` for a non-positive accuracy or
    /// step, a zero budget, or a non-finite first guess.
    pub fn validate(&self) -> CurveResult<()> {
        if !(self.accuracy > 0.0) {
            return Err(CurveError::configuration(format!(
                "accuracy must be positive, got {}",
                self.accuracy
            )));
        }
        if !(self.initial_step > 0.0) {
            return Err(CurveError::configuration(format!(
                "initial step must be positive, got {}",
                self.initial_step
            )));
        }
        if self.max_evaluations == 0 {
            return Err(CurveError::configuration("max evaluations must be at least 1"));
        }
        if !self.first_guess_value().is_finite() {
            return Err(CurveError::configuration("first guess must be finite"));
        }
        Ok(())
    }

    /// Builds the per-node solver. Discount nodes are kept positive.
    pub(crate) fn solver(&self) -> Solver1D {
        let solver = self.solver_config().solver();
        match self.quantity {
            CurveQuantity::Discount => solver.with_lower_bound(MIN_DISCOUNT),
            CurveQuantity::ZeroRate | CurveQuantity::Forward => solver,
        }
    }
}
