//! Rate helpers: market quotes a bootstrapped curve must reprice.
//!
//! Each helper wraps a quote handle and knows how to compute the quote a
//! given curve implies. The bootstrap drives [`RateHelper::quote_error`] to
//! zero one node at a time.
//!
//! # Available Helpers
//!
//! - [`DepositRateHelper`]: simple money-market rate from spot
//! - [`FraRateHelper`]: simple rate over a forward period
//! - [`SwapRateHelper`]: par rate of a fixed-for-floating swap, single curve
//!
//! # Example
//!
//! ```rust
//! use tenor_core::prelude::*;
//! use tenor_curves::prelude::*;
//!
//! let reference = Date::from_ymd(2025, 1, 15).unwrap();
//! let deposit = DepositRateHelper::from_tenor(
//!     Handle::<dyn Quote>::new(SimpleQuote::new(0.0458)),
//!     reference,
//!     Period::months(3),
//!     2,
//!     &WeekendCalendar,
//!     BusinessDayConvention::ModifiedFollowing,
//!     DayCountConvention::Act360,
//! )
//! .unwrap();
//!
//! assert_eq!(deposit.earliest_date(), Date::from_ymd(2025, 1, 17).unwrap());
//! assert_eq!(deposit.maturity_date(), Date::from_ymd(2025, 4, 17).unwrap());
//! ```

mod deposit;
mod fra;
mod swap;

pub use deposit::DepositRateHelper;
pub use fra::FraRateHelper;
pub use swap::SwapRateHelper;

use std::fmt;

use tenor_core::calendars::{BusinessDayConvention, Calendar};
use tenor_core::daycounts::DayCountConvention;
use tenor_core::handle::Handle;
use tenor_core::quote::Quote;
use tenor_core::types::{Date, TimeUnit};

use crate::error::{CurveError, CurveResult};
use crate::term_structure::YieldTermStructure;

/// Helper type for sorting and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HelperKind {
    /// Money market deposit
    Deposit,
    /// Forward rate agreement
    Fra,
    /// Fixed-for-floating swap
    Swap,
}

impl fmt::Display for HelperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => write!(f, "Deposit"),
            Self::Fra => write!(f, "FRA"),
            Self::Swap => write!(f, "Swap"),
        }
    }
}

/// A quoted instrument used to bootstrap a curve.
///
/// The implied quote must be continuous and monotone in the value of the
/// node at the helper's maturity, with all earlier nodes held fixed.
pub trait RateHelper: Send + Sync + fmt::Debug {
    /// The handle the market quote is read through.
    fn quote(&self) -> &Handle<dyn Quote>;

    /// Current market quote.
    ///
    /// # Errors
    ///
    /// Fails if the handle is empty or the quote has no value.
    fn quote_value(&self) -> CurveResult<f64> {
        Ok(self.quote().current()?.value()?)
    }

    /// First date whose discount factor the helper needs.
    fn earliest_date(&self) -> Date;

    /// Last date whose discount factor the helper needs. The bootstrap
    /// places a node here.
    fn maturity_date(&self) -> Date;

    /// The helper type.
    fn kind(&self) -> HelperKind;

    /// The quote implied by `curve`.
    fn implied_quote(&self, curve: &dyn YieldTermStructure) -> CurveResult<f64>;

    /// Market quote minus implied quote.
    fn quote_error(&self, curve: &dyn YieldTermStructure) -> CurveResult<f64> {
        Ok(self.quote_value()? - self.implied_quote(curve)?)
    }

    /// Short label such as `Deposit 2025-01-17/2025-04-17`.
    fn description(&self) -> String {
        format!(
            "{} {}/{}",
            self.kind(),
            self.earliest_date(),
            self.maturity_date()
        )
    }
}

/// Simple rate implied between two dates: `(D(start) / D(end) - 1) / tau`.
fn implied_simple_rate(
    curve: &dyn YieldTermStructure,
    start: Date,
    end: Date,
    day_count: DayCountConvention,
) -> CurveResult<f64> {
    let tau = day_count.year_fraction(start, end);
    let ratio = curve.discount(start)? / curve.discount(end)?;
    Ok((ratio - 1.0) / tau)
}

/// Spot date: `settlement_days` business days after the reference date.
fn spot_date(calendar: &dyn Calendar, reference: Date, settlement_days: i32) -> CurveResult<Date> {
    Ok(calendar.advance(
        reference,
        settlement_days,
        TimeUnit::Days,
        BusinessDayConvention::Following,
    )?)
}

fn check_period(start: Date, end: Date) -> CurveResult<()> {
    if end <= start {
        return Err(CurveError::configuration(format!(
            "maturity {end} must be after start {start}"
        )));
    }
    Ok(())
}
