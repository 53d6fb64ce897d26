//! Piecewise curve bootstrapping.
//!
//! A [`PiecewiseCurve`] turns a set of [`RateHelper`](crate::helpers::RateHelper)s
//! into an [`InterpolatedCurve`](crate::curves::InterpolatedCurve) by solving
//! one node per helper, shortest maturity first:
//!
//! 1. Sort helpers by maturity and check every one matures after the
//!    reference date with a quote available.
//! 2. Anchor the curve at the reference date.
//! 3. For each helper, freeze the nodes already solved and find the node
//!    value at its maturity that makes the helper's quote error zero.
//! 4. Publish the finished curve.
//!
//! The result is kept until a quote, handle or evaluation-date change
//! invalidates it, after which the next query rebuilds every node.
//!
//! [`BootstrapConfig`] chooses what the nodes hold, how they are
//! interpolated and how each node is solved.

mod config;
mod piecewise;
mod report;

pub use config::{BootstrapConfig, DEFAULT_BOOTSTRAP_ACCURACY, MIN_DISCOUNT};
pub use piecewise::PiecewiseCurve;
pub use report::{BootstrapReport, NodeReport};
