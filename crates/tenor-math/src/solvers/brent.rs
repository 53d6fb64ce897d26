//! Brent's method.

use super::{sign, Bracket};

/// Inverse quadratic interpolation with secant and bisection fallbacks.
///
/// Starts from the upper end of the bracket. Each step keeps the root
/// between `root` and `x_max` and falls back to bisection whenever the
/// interpolated step would not shrink the bracket fast enough.
#[allow(clippy::many_single_char_names)]
pub(crate) fn solve<F, E>(state: &mut Bracket, f: &mut F) -> Result<f64, E>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<crate::MathError>,
{
    let mut d = 0.0;
    let mut e = 0.0;
    state.root = state.x_max;
    let mut froot = state.fx_max;

    while state.has_budget() {
        if (froot > 0.0 && state.fx_max > 0.0) || (froot < 0.0 && state.fx_max < 0.0) {
            state.x_max = state.x_min;
            state.fx_max = state.fx_min;
            d = state.root - state.x_min;
            e = d;
        }
        if state.fx_max.abs() < froot.abs() {
            state.x_min = state.root;
            state.root = state.x_max;
            state.x_max = state.x_min;
            state.fx_min = froot;
            froot = state.fx_max;
            state.fx_max = state.fx_min;
        }

        let x_acc1 = 2.0 * f64::EPSILON * state.root.abs() + 0.5 * state.accuracy;
        let x_mid = (state.x_max - state.root) / 2.0;
        if x_mid.abs() <= x_acc1 || froot == 0.0 {
            return Ok(state.root);
        }

        if e.abs() >= x_acc1 && state.fx_min.abs() > froot.abs() {
            let s = froot / state.fx_min;
            let (mut p, mut q);
            if state.x_min == state.x_max {
                p = 2.0 * x_mid * s;
                q = 1.0 - s;
            } else {
                let qq = state.fx_min / state.fx_max;
                let r = froot / state.fx_max;
                p = s * (2.0 * x_mid * qq * (qq - r) - (state.root - state.x_min) * (r - 1.0));
                q = (qq - 1.0) * (r - 1.0) * (s - 1.0);
            }
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let min1 = 3.0 * x_mid * q - (x_acc1 * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = x_mid;
                e = d;
            }
        } else {
            d = x_mid;
            e = d;
        }

        state.x_min = state.root;
        state.fx_min = froot;
        if d.abs() > x_acc1 {
            state.root += d;
        } else {
            state.root += sign(x_acc1, x_mid);
        }
        froot = state.evaluate(f, state.root)?;
    }

    Err(state.convergence_failed().into())
}
