//! Ridder's method.

use super::{sign, Bracket};
use crate::error::MathError;

/// Fits an exponential through the ends and the midpoint of the bracket.
///
/// Runs to a hundredth of the requested accuracy, since the step size
/// shrinks quadratically and the extra precision costs one or two
/// evaluations.
pub(crate) fn solve<F, E>(state: &mut Bracket, f: &mut F) -> Result<f64, E>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<MathError>,
{
    let accuracy = state.accuracy / 100.0;
    let mut previous: Option<f64> = None;

    while state.has_budget() {
        let x_mid = 0.5 * (state.x_min + state.x_max);
        let fx_mid = state.evaluate(f, x_mid)?;
        let s = (fx_mid * fx_mid - state.fx_min * state.fx_max).sqrt();
        if s == 0.0 {
            return Ok(previous.unwrap_or(x_mid));
        }

        let direction = if state.fx_min >= state.fx_max { 1.0 } else { -1.0 };
        let next = x_mid + (x_mid - state.x_min) * (direction * fx_mid / s);
        if previous.is_some_and(|root| (next - root).abs() <= accuracy) {
            return Ok(next);
        }
        previous = Some(next);
        state.root = next;

        let froot = state.evaluate(f, next)?;
        if froot == 0.0 {
            return Ok(next);
        }

        if sign(fx_mid, froot) != fx_mid {
            state.x_min = x_mid;
            state.fx_min = fx_mid;
            state.x_max = next;
            state.fx_max = froot;
        } else if sign(state.fx_min, froot) != state.fx_min {
            state.x_max = next;
            state.fx_max = froot;
        } else if sign(state.fx_max, froot) != state.fx_max {
            state.x_min = next;
            state.fx_min = froot;
        } else {
            return Err(MathError::invalid_input(format!(
                "Ridder lost the sign change at {next} (f = {froot})"
            ))
            .into());
        }

        if (state.x_max - state.x_min).abs() <= accuracy {
            return Ok(next);
        }
    }

    Err(state.convergence_failed().into())
}

#[cfg(test)]
mod tests {
    use crate::solvers::{Solver1D, SolverAlgorithm};
    use approx::assert_relative_eq;

    #[test]
    fn test_exponential() {
        let result = Solver1D::new(SolverAlgorithm::Ridder)
            .solve_bracketed(|x: f64| x.exp() - 2.0, 1e-10, 0.5, 0.0, 1.0)
            .unwrap();
        assert_relative_eq!(result.root, std::f64::consts::LN_2, epsilon = 1e-11);
    }

    #[test]
    fn test_steep_function() {
        let result = Solver1D::new(SolverAlgorithm::Ridder)
            .solve_bracketed(|x: f64| (10.0 * (x - 0.7)).tanh(), 1e-10, 0.5, -1.0, 2.0)
            .unwrap();
        assert_relative_eq!(result.root, 0.7, epsilon = 1e-10);
    }
}
