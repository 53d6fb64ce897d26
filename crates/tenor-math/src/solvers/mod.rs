//! One-dimensional root finding.
//!
//! [`Solver1D`] runs every algorithm through the same bookkeeping: an
//! evaluation counter checked against a budget, a target accuracy, and a
//! bracket `[x_min, x_max]` with its function values. Only the convergence
//! step differs between algorithms.
//!
//! - [`SolverAlgorithm::Bisection`]: halves the bracket, always converges
//! - [`SolverAlgorithm::Brent`]: inverse quadratic / secant / bisection
//! - [`SolverAlgorithm::Secant`]: derivative-free, superlinear, may leave the bracket
//! - [`SolverAlgorithm::Newton`]: safeguarded Newton-Raphson
//! - [`SolverAlgorithm::FalsePosition`]: regula falsi
//! - [`SolverAlgorithm::Ridder`]: exponential fit through three points
//!
//! # Budget
//!
//! Every algorithm keeps iterating while `evaluations <= max_evaluations`.
//! Running out of budget is an error; no unconverged value is ever returned.
//!
//! # Example
//!
//! ```rust
//! use tenor_math::solvers::{Solver1D, SolverAlgorithm};
//!
//! let solver = Solver1D::new(SolverAlgorithm::Brent);
//! let result = solver
//!     .solve(|x: f64| x * x * x - x - 2.0, 1e-10, 1.0, 0.1)
//!     .unwrap();
//! assert!((result.root - 1.521_379_706_8).abs() < 1e-9);
//! ```

mod bisection;
mod brent;
mod false_position;
mod newton;
mod ridder;
mod secant;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};

/// Default accuracy for root-finding algorithms.
pub const DEFAULT_ACCURACY: f64 = 1e-10;

/// Default evaluation budget.
pub const DEFAULT_MAX_EVALUATIONS: usize = 100;

/// The convergence step used by a [`Solver1D`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SolverAlgorithm {
    /// Bisection.
    Bisection,
    /// Brent's method.
    #[default]
    Brent,
    /// Secant method.
    Secant,
    /// Newton-Raphson kept inside the bracket.
    Newton,
    /// False position (regula falsi).
    FalsePosition,
    /// Ridder's method.
    Ridder,
}

impl SolverAlgorithm {
    /// Returns the name of the algorithm.
    pub fn name(&self) -> &'static str {
        match self {
            SolverAlgorithm::Bisection => "Bisection",
            SolverAlgorithm::Brent => "Brent",
            SolverAlgorithm::Secant => "Secant",
            SolverAlgorithm::Newton => "Newton",
            SolverAlgorithm::FalsePosition => "False position",
            SolverAlgorithm::Ridder => "Ridder",
        }
    }
}

impl fmt::Display for SolverAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Serializable solver settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Target accuracy on the root.
    pub accuracy: f64,
    /// Maximum number of function evaluations.
    pub max_evaluations: usize,
    /// Convergence step.
    pub algorithm: SolverAlgorithm,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            accuracy: DEFAULT_ACCURACY,
            max_evaluations: DEFAULT_MAX_EVALUATIONS,
            algorithm: SolverAlgorithm::default(),
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(algorithm: SolverAlgorithm, accuracy: f64, max_evaluations: usize) -> Self {
        Self {
            accuracy,
            max_evaluations,
            algorithm,
        }
    }

    /// Sets the accuracy.
    #[must_use]
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Sets the evaluation budget.
    #[must_use]
    pub fn with_max_evaluations(mut self, max_evaluations: usize) -> Self {
        self.max_evaluations = max_evaluations;
        self
    }

    /// Sets the algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: SolverAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Builds a solver from these settings.
    #[must_use]
    pub fn solver(&self) -> Solver1D {
        Solver1D::new(self.algorithm).with_max_evaluations(self.max_evaluations)
    }
}

/// Result of a successful solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Function evaluations used, including bracketing.
    pub evaluations: usize,
}

/// Bracket and budget shared by all algorithms during one solve.
#[derive(Debug, Clone)]
pub(crate) struct Bracket {
    pub(crate) x_min: f64,
    pub(crate) x_max: f64,
    pub(crate) fx_min: f64,
    pub(crate) fx_max: f64,
    pub(crate) root: f64,
    pub(crate) accuracy: f64,
    algorithm: SolverAlgorithm,
    evaluations: usize,
    max_evaluations: usize,
    last_residual: f64,
}

impl Bracket {
    fn new(algorithm: SolverAlgorithm, accuracy: f64, max_evaluations: usize) -> Self {
        Self {
            x_min: f64::NAN,
            x_max: f64::NAN,
            fx_min: f64::NAN,
            fx_max: f64::NAN,
            root: f64::NAN,
            accuracy,
            algorithm,
            evaluations: 0,
            max_evaluations,
            last_residual: f64::NAN,
        }
    }

    /// Evaluates `f` at `x`, counting the evaluation.
    pub(crate) fn evaluate<F, E>(&mut self, f: &mut F, x: f64) -> Result<f64, E>
    where
        F: FnMut(f64) -> Result<f64, E>,
    {
        self.evaluations += 1;
        let fx = f(x)?;
        self.last_residual = fx;
        Ok(fx)
    }

    /// True while the budget allows another iteration.
    pub(crate) fn has_budget(&self) -> bool {
        self.evaluations <= self.max_evaluations
    }

    pub(crate) fn convergence_failed(&self) -> MathError {
        log::debug!(
            "{} exhausted {} evaluations in [{}, {}]",
            self.algorithm,
            self.max_evaluations,
            self.x_min,
            self.x_max
        );
        MathError::ConvergenceFailed {
            algorithm: self.algorithm.name(),
            evaluations: self.evaluations,
            max_evaluations: self.max_evaluations,
            x_min: self.x_min.min(self.x_max),
            x_max: self.x_max.max(self.x_min),
            last_residual: self.last_residual,
        }
    }

    fn result(&self, root: f64) -> SolverResult {
        SolverResult {
            root,
            evaluations: self.evaluations,
        }
    }
}

/// `|a|` carrying the sign of `b`.
pub(crate) fn sign(a: f64, b: f64) -> f64 {
    if b >= 0.0 {
        a.abs()
    } else {
        -a.abs()
    }
}

/// A fallible derivative of the objective.
pub(crate) type Derivative<'a, E> = Option<&'a mut dyn FnMut(f64) -> Result<f64, E>>;

enum Start {
    Step(f64),
    Bracket(f64, f64),
}

/// One-dimensional solver.
///
/// Holds the algorithm, the evaluation budget and optional hard bounds on
/// the points tried while expanding a bracket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solver1D {
    algorithm: SolverAlgorithm,
    max_evaluations: usize,
    lower_bound: Option<f64>,
    upper_bound: Option<f64>,
}

impl Default for Solver1D {
    fn default() -> Self {
        Self::new(SolverAlgorithm::default())
    }
}

impl Solver1D {
    /// Creates a solver with the default budget of 100 evaluations.
    #[must_use]
    pub fn new(algorithm: SolverAlgorithm) -> Self {
        Self {
            algorithm,
            max_evaluations: DEFAULT_MAX_EVALUATIONS,
            lower_bound: None,
            upper_bound: None,
        }
    }

    /// Sets the evaluation budget.
    #[must_use]
    pub fn with_max_evaluations(mut self, max_evaluations: usize) -> Self {
        self.max_evaluations = max_evaluations;
        self
    }

    /// Keeps every bracket-expansion point at or above `bound`.
    #[must_use]
    pub fn with_lower_bound(mut self, bound: f64) -> Self {
        self.lower_bound = Some(bound);
        self
    }

    /// Keeps every bracket-expansion point at or below `bound`.
    #[must_use]
    pub fn with_upper_bound(mut self, bound: f64) -> Self {
        self.upper_bound = Some(bound);
        self
    }

    /// The convergence step in use.
    pub fn algorithm(&self) -> SolverAlgorithm {
        self.algorithm
    }

    /// The evaluation budget.
    pub fn max_evaluations(&self) -> usize {
        self.max_evaluations
    }

    /// Finds a root of `f`, bracketing it first by expanding from `guess`.
    ///
    /// The first interval is `[guess - step, guess]` or `[guess, guess + step]`
    /// depending on the sign of `f(guess)`. While no sign change is found, the
    /// end with the smaller `|f|` moves outward and the step doubles.
    ///
    /// # Errors
    ///
    /// - `MathError::BracketNotFound` if the budget runs out while bracketing
    /// - `MathError::ConvergenceFailed` if it runs out while converging
    /// - `MathError::InvalidInput` for a non-positive accuracy or step
    pub fn solve<F>(&self, mut f: F, accuracy: f64, guess: f64, step: f64) -> MathResult<SolverResult>
    where
        F: FnMut(f64) -> f64,
    {
        self.try_solve(|x| Ok::<f64, MathError>(f(x)), accuracy, guess, step)
    }

    /// Finds a root of `f` inside `[x_min, x_max]`, starting from `guess`.
    ///
    /// # Errors
    ///
    /// - `MathError::InvalidBracket` if `f` has the same sign at both ends
    /// - `MathError::ConvergenceFailed` if the budget runs out
    /// - `MathError::InvalidInput` for an empty interval, a guess outside it,
    ///   or an interval that violates the solver's bounds
    pub fn solve_bracketed<F>(
        &self,
        mut f: F,
        accuracy: f64,
        guess: f64,
        x_min: f64,
        x_max: f64,
    ) -> MathResult<SolverResult>
    where
        F: FnMut(f64) -> f64,
    {
        self.try_solve_bracketed(|x| Ok::<f64, MathError>(f(x)), accuracy, guess, x_min, x_max)
    }

    /// [`Solver1D::solve`] for an objective that can fail.
    ///
    /// An error from `f` aborts the solve and is returned unchanged.
    pub fn try_solve<F, E>(&self, mut f: F, accuracy: f64, guess: f64, step: f64) -> Result<SolverResult, E>
    where
        F: FnMut(f64) -> Result<f64, E>,
        E: From<MathError>,
    {
        self.run(&mut f, None, accuracy, guess, Start::Step(step))
    }

    /// [`Solver1D::solve_bracketed`] for an objective that can fail.
    pub fn try_solve_bracketed<F, E>(
        &self,
        mut f: F,
        accuracy: f64,
        guess: f64,
        x_min: f64,
        x_max: f64,
    ) -> Result<SolverResult, E>
    where
        F: FnMut(f64) -> Result<f64, E>,
        E: From<MathError>,
    {
        self.run(&mut f, None, accuracy, guess, Start::Bracket(x_min, x_max))
    }

    /// [`Solver1D::solve`] with an analytic derivative.
    ///
    /// Only [`SolverAlgorithm::Newton`] uses the derivative; without one it
    /// falls back to central differences, which count against the budget.
    pub fn solve_with_derivative<F, D>(
        &self,
        mut f: F,
        mut df: D,
        accuracy: f64,
        guess: f64,
        step: f64,
    ) -> MathResult<SolverResult>
    where
        F: FnMut(f64) -> f64,
        D: FnMut(f64) -> f64,
    {
        let mut objective = |x: f64| Ok::<f64, MathError>(f(x));
        let mut slope = |x: f64| Ok::<f64, MathError>(df(x));
        self.run(&mut objective, Some(&mut slope), accuracy, guess, Start::Step(step))
    }

    fn enforce_bounds(&self, x: f64) -> f64 {
        let x = self.lower_bound.map_or(x, |lo| x.max(lo));
        self.upper_bound.map_or(x, |hi| x.min(hi))
    }

    fn run<F, E>(
        &self,
        f: &mut F,
        derivative: Derivative<'_, E>,
        accuracy: f64,
        guess: f64,
        start: Start,
    ) -> Result<SolverResult, E>
    where
        F: FnMut(f64) -> Result<f64, E>,
        E: From<MathError>,
    {
        if !(accuracy > 0.0) {
            return Err(MathError::invalid_input(format!("accuracy must be positive, got {accuracy}")).into());
        }
        let accuracy = accuracy.max(f64::EPSILON);
        let mut state = Bracket::new(self.algorithm, accuracy, self.max_evaluations);

        match start {
            Start::Step(step) => {
                if !(step > 0.0) {
                    return Err(MathError::invalid_input(format!("step must be positive, got {step}")).into());
                }
                if let Some(root) = self.bracket_from_guess(&mut state, f, guess, step)? {
                    return Ok(state.result(root));
                }
            }
            Start::Bracket(x_min, x_max) => {
                if let Some(root) = self.check_bracket(&mut state, f, guess, x_min, x_max)? {
                    return Ok(state.result(root));
                }
            }
        }

        let root = match self.algorithm {
            SolverAlgorithm::Bisection => bisection::solve(&mut state, f)?,
            SolverAlgorithm::Brent => brent::solve(&mut state, f)?,
            SolverAlgorithm::Secant => secant::solve(&mut state, f)?,
            SolverAlgorithm::Newton => newton::solve(&mut state, f, derivative)?,
            SolverAlgorithm::FalsePosition => false_position::solve(&mut state, f)?,
            SolverAlgorithm::Ridder => ridder::solve(&mut state, f)?,
        };
        Ok(state.result(root))
    }

    /// Expands outward from `guess` until `f` changes sign.
    ///
    /// Returns `Some(x)` if a root was hit exactly on the way.
    fn bracket_from_guess<F, E>(
        &self,
        state: &mut Bracket,
        f: &mut F,
        guess: f64,
        step: f64,
    ) -> Result<Option<f64>, E>
    where
        F: FnMut(f64) -> Result<f64, E>,
        E: From<MathError>,
    {
        let mut step = step;
        let f_guess = state.evaluate(f, guess)?;
        if f_guess == 0.0 {
            return Ok(Some(guess));
        }

        if f_guess > 0.0 {
            state.x_min = self.enforce_bounds(guess - step);
            state.fx_min = state.evaluate(f, state.x_min)?;
            state.x_max = guess;
            state.fx_max = f_guess;
        } else {
            state.x_min = guess;
            state.fx_min = f_guess;
            state.x_max = self.enforce_bounds(guess + step);
            state.fx_max = state.evaluate(f, state.x_max)?;
        }

        while state.has_budget() {
            if state.fx_min * state.fx_max <= 0.0 {
                if state.fx_min == 0.0 {
                    return Ok(Some(state.x_min));
                }
                if state.fx_max == 0.0 {
                    return Ok(Some(state.x_max));
                }
                log::trace!(
                    "bracketed root in [{}, {}] after {} evaluations",
                    state.x_min,
                    state.x_max,
                    state.evaluations
                );
                state.root = 0.5 * (state.x_min + state.x_max);
                return Ok(None);
            }

            step *= 2.0;
            if state.fx_min.abs() < state.fx_max.abs() {
                state.x_min = self.enforce_bounds(state.x_min - step);
                state.fx_min = state.evaluate(f, state.x_min)?;
            } else {
                state.x_max = self.enforce_bounds(state.x_max + step);
                state.fx_max = state.evaluate(f, state.x_max)?;
            }
        }

        log::debug!(
            "no sign change from guess {} within {} evaluations",
            guess,
            self.max_evaluations
        );
        Err(MathError::BracketNotFound {
            guess,
            evaluations: state.evaluations,
            x_min: state.x_min,
            x_max: state.x_max,
            fx_min: state.fx_min,
            fx_max: state.fx_max,
        }
        .into())
    }

    /// Validates an explicit bracket and evaluates its ends.
    fn check_bracket<F, E>(
        &self,
        state: &mut Bracket,
        f: &mut F,
        guess: f64,
        x_min: f64,
        x_max: f64,
    ) -> Result<Option<f64>, E>
    where
        F: FnMut(f64) -> Result<f64, E>,
        E: From<MathError>,
    {
        if !(x_min < x_max) {
            return Err(MathError::invalid_input(format!("invalid range: [{x_min}, {x_max}]")).into());
        }
        if let Some(lo) = self.lower_bound.filter(|lo| x_min < *lo) {
            return Err(MathError::invalid_input(format!(
                "x_min ({x_min}) is below the lower bound ({lo})"
            ))
            .into());
        }
        if let Some(hi) = self.upper_bound.filter(|hi| x_max > *hi) {
            return Err(MathError::invalid_input(format!(
                "x_max ({x_max}) is above the upper bound ({hi})"
            ))
            .into());
        }

        state.x_min = x_min;
        state.x_max = x_max;
        state.fx_min = state.evaluate(f, x_min)?;
        if state.fx_min == 0.0 {
            return Ok(Some(x_min));
        }
        state.fx_max = state.evaluate(f, x_max)?;
        if state.fx_max == 0.0 {
            return Ok(Some(x_max));
        }

        if state.fx_min * state.fx_max > 0.0 {
            return Err(MathError::InvalidBracket {
                a: x_min,
                b: x_max,
                fa: state.fx_min,
                fb: state.fx_max,
            }
            .into());
        }
        if !(guess > x_min && guess < x_max) {
            return Err(MathError::invalid_input(format!(
                "guess ({guess}) must lie strictly inside [{x_min}, {x_max}]"
            ))
            .into());
        }

        state.root = guess;
        Ok(None)
    }
}
