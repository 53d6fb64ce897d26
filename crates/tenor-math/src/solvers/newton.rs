//! Safeguarded Newton-Raphson.

use super::{Bracket, Derivative};

/// Relative bump for central-difference derivatives.
const BUMP: f64 = 1e-6;

/// Newton-Raphson kept inside the bracket.
///
/// Takes a bisection step whenever the Newton step would leave the bracket
/// or fails to halve the step before last. Without an analytic derivative
/// the slope comes from central differences, and both bumped evaluations
/// count against the budget.
pub(crate) fn solve<F, E>(
    state: &mut Bracket,
    f: &mut F,
    mut derivative: Derivative<'_, E>,
) -> Result<f64, E>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<crate::MathError>,
{
    let (mut xl, mut xh) = if state.fx_min < 0.0 {
        (state.x_min, state.x_max)
    } else {
        (state.x_max, state.x_min)
    };

    let mut dxold = state.x_max - state.x_min;
    let mut dx = dxold;

    let mut dfroot = slope(state, f, &mut derivative, state.root)?;
    let mut froot = state.evaluate(f, state.root)?;

    while state.has_budget() {
        let out_of_range =
            ((state.root - xh) * dfroot - froot) * ((state.root - xl) * dfroot - froot) > 0.0;
        let too_slow = (2.0 * froot).abs() > (dxold * dfroot).abs();
        dxold = dx;
        if out_of_range || too_slow {
            dx = (xh - xl) / 2.0;
            state.root = xl + dx;
        } else {
            dx = froot / dfroot;
            state.root -= dx;
        }

        if dx.abs() < state.accuracy {
            return Ok(state.root);
        }

        dfroot = slope(state, f, &mut derivative, state.root)?;
        froot = state.evaluate(f, state.root)?;
        if froot < 0.0 {
            xl = state.root;
        } else {
            xh = state.root;
        }
        state.x_min = xl.min(xh);
        state.x_max = xl.max(xh);
    }

    Err(state.convergence_failed().into())
}

fn slope<F, E>(
    state: &mut Bracket,
    f: &mut F,
    derivative: &mut Derivative<'_, E>,
    x: f64,
) -> Result<f64, E>
where
    F: FnMut(f64) -> Result<f64, E>,
{
    if let Some(df) = derivative.as_deref_mut() {
        return df(x);
    }
    let h = BUMP * x.abs().max(1.0);
    let up = state.evaluate(f, x + h)?;
    let down = state.evaluate(f, x - h)?;
    Ok((up - down) / (2.0 * h))
}
