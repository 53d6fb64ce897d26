//! Bisection.

use super::Bracket;

/// Halves the bracket until its width drops below the accuracy.
///
/// The bracket ends follow the search, so a failed solve reports the
/// narrowed interval.
///
/// Walks from the end where `f < 0` so that `root` always sits on the
/// negative side of the sign change.
pub(crate) fn solve<F, E>(state: &mut Bracket, f: &mut F) -> Result<f64, E>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<crate::MathError>,
{
    let mut dx;
    if state.fx_min < 0.0 {
        dx = state.x_max - state.x_min;
        state.root = state.x_min;
    } else {
        dx = state.x_min - state.x_max;
        state.root = state.x_max;
    }

    while state.has_budget() {
        dx /= 2.0;
        let x_mid = state.root + dx;
        let f_mid = state.evaluate(f, x_mid)?;
        if f_mid <= 0.0 {
            state.root = x_mid;
        }
        // The sign change now lies between root and root + dx
        state.x_min = state.root.min(state.root + dx);
        state.x_max = state.root.max(state.root + dx);
        if dx.abs() < state.accuracy || f_mid == 0.0 {
            return Ok(state.root);
        }
    }

    Err(state.convergence_failed().into())
}
