//! Day count conventions.
//!
//! Day counts turn a pair of dates into a year fraction. Fractions are
//! computed exactly in [`Decimal`] and converted to `f64` at the curve
//! boundary through [`DayCountConvention::year_fraction`].
//!
//! # Supported Conventions
//!
//! - [`Act360`]: Actual/360, money market deposits and FRAs
//! - [`Act365Fixed`]: Actual/365 Fixed
//! - [`Thirty360US`]: 30/360 US bond basis, typical swap fixed leg
//!
//! # Usage
//!
//! ```rust
//! use tenor_core::daycounts::DayCountConvention;
//! use tenor_core::types::Date;
//!
//! let start = Date::from_ymd(2025, 1, 15).unwrap();
//! let end = Date::from_ymd(2025, 7, 15).unwrap();
//!
//! let yf = DayCountConvention::Thirty360US.year_fraction(start, end);
//! assert_eq!(yf, 0.5);
//! ```

mod act360;
mod act365;
mod thirty360;

pub use act360::Act360;
pub use act365::Act365Fixed;
pub use thirty360::Thirty360US;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Date;

/// Trait for day count conventions.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait DayCount: Send + Sync {
    /// Returns the name of the day count convention.
    fn name(&self) -> &'static str;

    /// Calculates the year fraction between two dates.
    ///
    /// Negative if `end < start`.
    fn year_fraction(&self, start: Date, end: Date) -> Decimal;

    /// Calculates the day count between two dates according to the convention.
    fn day_count(&self, start: Date, end: Date) -> i64;
}

/// Runtime selection of a day count convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DayCountConvention {
    /// Actual/360
    #[default]
    Act360,
    /// Actual/365 Fixed
    Act365Fixed,
    /// 30/360 US (Bond Basis)
    Thirty360US,
}

impl DayCountConvention {
    /// Creates a boxed day count implementation.
    #[must_use]
    pub fn to_day_count(&self) -> Box<dyn DayCount> {
        match self {
            DayCountConvention::Act360 => Box::new(Act360),
            DayCountConvention::Act365Fixed => Box::new(Act365Fixed),
            DayCountConvention::Thirty360US => Box::new(Thirty360US),
        }
    }

    /// Returns the market name of the convention.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act360 => "ACT/360",
            DayCountConvention::Act365Fixed => "ACT/365F",
            DayCountConvention::Thirty360US => "30/360 US",
        }
    }

    /// Exact year fraction between two dates.
    #[must_use]
    pub fn year_fraction_exact(&self, start: Date, end: Date) -> Decimal {
        match self {
            DayCountConvention::Act360 => Act360.year_fraction(start, end),
            DayCountConvention::Act365Fixed => Act365Fixed.year_fraction(start, end),
            DayCountConvention::Thirty360US => Thirty360US.year_fraction(start, end),
        }
    }

    /// Year fraction between two dates as `f64`.
    #[must_use]
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        self.year_fraction_exact(start, end)
            .to_f64()
            .unwrap_or(f64::NAN)
    }

    /// Day count between two dates according to the convention.
    #[must_use]
    pub fn day_count(&self, start: Date, end: Date) -> i64 {
        match self {
            DayCountConvention::Act360 => Act360.day_count(start, end),
            DayCountConvention::Act365Fixed => Act365Fixed.day_count(start, end),
            DayCountConvention::Thirty360US => Thirty360US.day_count(start, end),
        }
    }
}

impl std::fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DayCountConvention {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['_', ' '], "");
        match normalized.as_str() {
            "ACT/360" | "ACT360" | "A360" => Ok(DayCountConvention::Act360),
            "ACT/365F" | "ACT/365" | "ACT365F" | "ACT365FIXED" | "A365F" => {
                Ok(DayCountConvention::Act365Fixed)
            }
            "30/360" | "30/360US" | "30360" | "BONDBASIS" => Ok(DayCountConvention::Thirty360US),
            _ => Err(CoreError::invalid_input(format!(
                "unknown day count convention: {s}"
            ))),
        }
    }
}
