//! # Tenor Core
//!
//! Core types and the change-propagation machinery for the Tenor term
//! structure library.
//!
//! - **Types**: `Date`, `Period`, `Frequency`, `Compounding`
//! - **Day Count Conventions**: ACT/360, ACT/365F, 30/360 US
//! - **Business Day Calendars**: weekend-only and null calendars with
//!   adjustment conventions and period arithmetic
//! - **Observer graph**: `Observable`/`Observer` with weak registration
//! - **Handles**: relinkable references that forward notifications
//! - **Quotes**: observable scalars that notify only on real changes
//! - **Evaluation context**: the shared "today" that floating curves follow
//!
//! ## Example
//!
//! ```rust
//! use tenor_core::prelude::*;
//!
//! let spread = SimpleQuote::new(0.0010);
//! let handle = Handle::<dyn Quote>::new(spread.clone());
//!
//! let flag = Flag::new();
//! flag.watch(&handle);
//!
//! spread.set_value(0.0015).unwrap();
//! assert!(flag.is_up());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]
#![allow(clippy::uninlined_format_args)]

pub mod calendars;
pub mod daycounts;
pub mod error;
pub mod handle;
pub mod patterns;
pub mod quote;
pub mod settings;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{BusinessDayConvention, Calendar, NullCalendar, WeekendCalendar};
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::handle::Handle;
    pub use crate::patterns::{AsObservable, Flag, Observable, Observer};
    pub use crate::quote::{Quote, SimpleQuote};
    pub use crate::settings::EvaluationContext;
    pub use crate::types::{Compounding, Date, Frequency, Period, TimeUnit};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use handle::Handle;
pub use quote::{Quote, SimpleQuote};
pub use settings::EvaluationContext;
pub use types::{Date, Period, TimeUnit};
