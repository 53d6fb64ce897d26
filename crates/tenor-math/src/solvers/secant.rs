//! Secant method.

use super::Bracket;

/// Secant iteration seeded from the bracket ends.
///
/// Starts from the end with the smaller `|f|`. Iterates are not kept inside
/// the bracket, so convergence is fast but not guaranteed.
pub(crate) fn solve<F, E>(state: &mut Bracket, f: &mut F) -> Result<f64, E>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<crate::MathError>,
{
    let (mut froot, mut xl, mut fl);
    if state.fx_min.abs() < state.fx_max.abs() {
        state.root = state.x_min;
        froot = state.fx_min;
        xl = state.x_max;
        fl = state.fx_max;
    } else {
        state.root = state.x_max;
        froot = state.fx_max;
        xl = state.x_min;
        fl = state.fx_min;
    }

    while state.has_budget() {
        let dx = (xl - state.root) * froot / (froot - fl);
        xl = state.root;
        fl = froot;
        state.root += dx;
        froot = state.evaluate(f, state.root)?;
        if dx.abs() < state.accuracy || froot == 0.0 {
            return Ok(state.root);
        }
    }

    Err(state.convergence_failed().into())
}

#[cfg(test)]
mod tests {
    use crate::solvers::{Solver1D, SolverAlgorithm};
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_two() {
        let result = Solver1D::new(SolverAlgorithm::Secant)
            .solve_bracketed(|x: f64| x * x - 2.0, 1e-12, 1.5, 1.0, 2.0)
            .unwrap();
        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-11);
    }

    #[test]
    fn test_linear_function_converges_in_one_step() {
        let result = Solver1D::new(SolverAlgorithm::Secant)
            .solve_bracketed(|x: f64| 2.0 * x - 1.0, 1e-12, 0.25, 0.0, 1.0)
            .unwrap();
        assert_relative_eq!(result.root, 0.5, epsilon = 1e-14);
        assert_eq!(result.evaluations, 3);
    }
}
