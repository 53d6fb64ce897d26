//! Concrete yield curves.
//!
//! - [`FlatForward`]: a single rate read from a quote handle
//! - [`InterpolatedCurve`]: node values interpolated over time, the form a
//!   bootstrapped curve takes once solved

mod flat_forward;
mod interpolated;

pub use flat_forward::FlatForward;
pub use interpolated::{CurveQuantity, InterpolatedCurve};
