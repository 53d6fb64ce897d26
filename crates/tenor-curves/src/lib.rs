//! # Tenor Curves
//!
//! Yield term structures that stay consistent with the market data they are
//! built from.
//!
//! This crate provides:
//!
//! - **Term structure trait**: [`YieldTermStructure`](term_structure::YieldTermStructure)
//!   with discount, zero and forward queries and range checks
//! - **Curves**: flat forward curves and node-interpolated curves
//! - **Rate helpers**: deposits, FRAs and par swaps as bootstrap targets
//! - **Bootstrap**: lazily built piecewise curves that rebuild when a quote,
//!   a handle or the evaluation date changes
//! - **Derived curves**: implied, forward-spreaded and zero-spreaded curves
//!   over relinkable handles
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use tenor_core::prelude::*;
//! use tenor_curves::prelude::*;
//!
//! let today = Date::from_ymd(2025, 1, 15).unwrap();
//! let quote = SimpleQuote::new(0.0450);
//! let deposit: Arc<dyn RateHelper> = Arc::new(
//!     DepositRateHelper::from_tenor(
//!         Handle::<dyn Quote>::new(quote.clone()),
//!         today,
//!         Period::months(6),
//!         2,
//!         &WeekendCalendar,
//!         BusinessDayConvention::ModifiedFollowing,
//!         DayCountConvention::Act360,
//!     )
//!     .unwrap(),
//! );
//!
//! let curve = PiecewiseCurve::new(
//!     today.into(),
//!     DayCountConvention::Act365Fixed,
//!     vec![deposit],
//!     BootstrapConfig::default(),
//! )
//! .unwrap();
//!
//! let before = curve.discount(Date::from_ymd(2025, 6, 1).unwrap()).unwrap();
//! quote.set_value(0.0475).unwrap();
//! let after = curve.discount(Date::from_ymd(2025, 6, 1).unwrap()).unwrap();
//! assert!(after < before);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::similar_names)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]
#![allow(clippy::float_cmp)]
#![allow(clippy::uninlined_format_args)]

pub mod bootstrap;
pub mod curves;
pub mod derived;
pub mod error;
pub mod helpers;
pub mod term_structure;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bootstrap::{BootstrapConfig, BootstrapReport, NodeReport, PiecewiseCurve};
    pub use crate::curves::{CurveQuantity, FlatForward, InterpolatedCurve};
    pub use crate::derived::{
        CurveHandle, ForwardSpreadedTermStructure, ImpliedTermStructure,
        ZeroSpreadedTermStructure,
    };
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::helpers::{
        DepositRateHelper, FraRateHelper, HelperKind, RateHelper, SwapRateHelper,
    };
    pub use crate::term_structure::{ReferenceDate, YieldTermStructure};
}

pub use error::{CurveError, CurveResult};
