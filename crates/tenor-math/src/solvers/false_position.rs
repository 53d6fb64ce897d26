//! False position (regula falsi).

use super::Bracket;

/// Replaces one end of the bracket with the chord's zero crossing.
///
/// Converges once the end that moves stops moving by more than the accuracy.
pub(crate) fn solve<F, E>(state: &mut Bracket, f: &mut F) -> Result<f64, E>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<crate::MathError>,
{
    let (mut xl, mut fl, mut xh, mut fh);
    if state.fx_min < 0.0 {
        xl = state.x_min;
        fl = state.fx_min;
        xh = state.x_max;
        fh = state.fx_max;
    } else {
        xl = state.x_max;
        fl = state.fx_max;
        xh = state.x_min;
        fh = state.fx_min;
    }

    while state.has_budget() {
        state.root = xl + (xh - xl) * fl / (fl - fh);
        let froot = state.evaluate(f, state.root)?;
        let del;
        if froot < 0.0 {
            del = xl - state.root;
            xl = state.root;
            fl = froot;
        } else {
            del = xh - state.root;
            xh = state.root;
            fh = froot;
        }
        state.x_min = xl.min(xh);
        state.x_max = xl.max(xh);
        if del.abs() < state.accuracy || froot == 0.0 {
            return Ok(state.root);
        }
    }

    Err(state.convergence_failed().into())
}
