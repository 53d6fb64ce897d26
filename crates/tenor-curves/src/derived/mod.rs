//! Curves defined on top of another curve.
//!
//! Each decorator reads its base curve through a
//! [`Handle`](tenor_core::handle::Handle), so the base can be relinked after
//! construction. Decorators register with their handles before they are
//! returned and pass every notification on to their own observers.
//!
//! - [`ImpliedTermStructure`]: the base curve seen from a later date
//! - [`ForwardSpreadedTermStructure`]: base plus a spread on forwards
//! - [`ZeroSpreadedTermStructure`]: base plus a spread on zero rates

mod forward_spreaded;
mod implied;
mod zero_spreaded;

pub use forward_spreaded::ForwardSpreadedTermStructure;
pub use implied::ImpliedTermStructure;
pub use zero_spreaded::ZeroSpreadedTermStructure;

use std::sync::Arc;

use tenor_core::handle::Handle;
use tenor_core::quote::Quote;

use crate::error::CurveResult;
use crate::term_structure::YieldTermStructure;

/// Handle to a yield curve.
pub type CurveHandle = Handle<dyn YieldTermStructure>;

fn base_curve(handle: &CurveHandle) -> CurveResult<Arc<dyn YieldTermStructure>> {
    Ok(handle.current()?)
}

fn spread_value(handle: &Handle<dyn Quote>) -> CurveResult<f64> {
    Ok(handle.current()?.value()?)
}
