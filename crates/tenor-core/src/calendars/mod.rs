//! Business day calendars and conventions.
//!
//! This module provides:
//! - The [`Calendar`] trait with adjustment and period arithmetic
//! - [`WeekendCalendar`] (Saturdays and Sundays are holidays)
//! - [`NullCalendar`] (every day is a business day)

mod conventions;

pub use conventions::BusinessDayConvention;

use crate::error::CoreResult;
use crate::types::{Date, Period, TimeUnit};

/// Trait for business day calendars.
pub trait Calendar: Send + Sync + std::fmt::Debug {
    /// Returns the name of the calendar.
    fn name(&self) -> &'static str;

    /// Returns true if the date is a business day.
    fn is_business_day(&self, date: Date) -> bool;

    /// Returns true if the date is a holiday.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Adjusts a date according to the given business day convention.
    fn adjust(&self, date: Date, convention: BusinessDayConvention) -> Date {
        conventions::adjust(date, convention, self)
    }

    /// Moves a date by a number of business days.
    ///
    /// Zero returns the date unchanged, even on a holiday.
    fn add_business_days(&self, date: Date, days: i32) -> Date {
        let mut result = date;
        let mut remaining = days.unsigned_abs();
        let direction: i64 = if days >= 0 { 1 } else { -1 };

        while remaining > 0 {
            result = result.add_days(direction);
            if self.is_business_day(result) {
                remaining -= 1;
            }
        }

        result
    }

    /// Advances a date by `n` units.
    ///
    /// Days are counted as business days. Weeks, months and years are added
    /// on the calendar and the result is adjusted with `convention`. A zero
    /// length only adjusts.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if month arithmetic leaves the
    /// representable range.
    fn advance(
        &self,
        date: Date,
        n: i32,
        unit: TimeUnit,
        convention: BusinessDayConvention,
    ) -> CoreResult<Date> {
        if n == 0 {
            return Ok(self.adjust(date, convention));
        }
        match unit {
            TimeUnit::Days => Ok(self.add_business_days(date, n)),
            _ => {
                let unadjusted = date.add_period(Period::new(n, unit))?;
                Ok(self.adjust(unadjusted, convention))
            }
        }
    }

    /// Advances a date by a period. See [`Calendar::advance`].
    fn advance_by(
        &self,
        date: Date,
        period: Period,
        convention: BusinessDayConvention,
    ) -> CoreResult<Date> {
        self.advance(date, period.length, period.unit, convention)
    }
}

/// A weekend-only calendar (no holidays).
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendCalendar;

impl Calendar for WeekendCalendar {
    fn name(&self) -> &'static str {
        "Weekend Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend()
    }
}

/// A calendar on which every day is a business day.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCalendar;

impl Calendar for NullCalendar {
    fn name(&self) -> &'static str {
        "Null"
    }

    fn is_business_day(&self, _date: Date) -> bool {
        true
    }
}
