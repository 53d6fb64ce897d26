//! Money market deposit helper.

use tenor_core::calendars::{BusinessDayConvention, Calendar};
use tenor_core::daycounts::DayCountConvention;
use tenor_core::handle::Handle;
use tenor_core::quote::Quote;
use tenor_core::types::{Date, Period};

use super::{check_period, implied_simple_rate, spot_date, HelperKind, RateHelper};
use crate::error::CurveResult;
use crate::term_structure::YieldTermStructure;

/// A deposit quoted as a simple rate from spot to maturity.
///
/// # Pricing Formula
///
/// ```text
/// rate = (D(start) / D(end) - 1) / τ
/// ```
/// where τ is the year fraction under the deposit's day count.
#[derive(Debug, Clone)]
pub struct DepositRateHelper {
    quote: Handle<dyn Quote>,
    start_date: Date,
    maturity_date: Date,
    day_count: DayCountConvention,
}

impl DepositRateHelper {
    /// Creates a deposit between explicit dates.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Configuration` if maturity is not after start.
    pub fn new(
        quote: Handle<dyn Quote>,
        start_date: Date,
        maturity_date: Date,
        day_count: DayCountConvention,
    ) -> CurveResult<Self> {
        check_period(start_date, maturity_date)?;
        Ok(Self {
            quote,
            start_date,
            maturity_date,
            day_count,
        })
    }

    /// Creates a deposit for a tenor.
    ///
    /// The start is `settlement_days` business days after `reference`; the
    /// maturity is the start advanced by `tenor` and adjusted with
    /// `convention`.
    pub fn from_tenor(
        quote: Handle<dyn Quote>,
        reference: Date,
        tenor: Period,
        settlement_days: i32,
        calendar: &dyn Calendar,
        convention: BusinessDayConvention,
        day_count: DayCountConvention,
    ) -> CurveResult<Self> {
        let start = spot_date(calendar, reference, settlement_days)?;
        let maturity = calendar.advance_by(start, tenor, convention)?;
        Self::new(quote, start, maturity, day_count)
    }

    /// The deposit day count.
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }
}

impl RateHelper for DepositRateHelper {
    fn quote(&self) -> &Handle<dyn Quote> {
        &self.quote
    }

    fn earliest_date(&self) -> Date {
        self.start_date
    }

    fn maturity_date(&self) -> Date {
        self.maturity_date
    }

    fn kind(&self) -> HelperKind {
        HelperKind::Deposit
    }

    fn implied_quote(&self, curve: &dyn YieldTermStructure) -> CurveResult<f64> {
        implied_simple_rate(curve, self.start_date, self.maturity_date, self.day_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::FlatForward;
    use approx::assert_relative_eq;
    use tenor_core::calendars::WeekendCalendar;
    use tenor_core::quote::SimpleQuote;
    use tenor_core::types::Compounding;

    fn quote(value: f64) -> Handle<dyn Quote> {
        Handle::<dyn Quote>::new(SimpleQuote::new(value))
    }

    #[test]
    fn test_from_tenor_dates() {
        // Friday reference, T+2 lands on Tuesday
        let reference = Date::from_ymd(2025, 1, 17).unwrap();
        let deposit = DepositRateHelper::from_tenor(
            quote(0.045),
            reference,
            Period::months(1),
            2,
            &WeekendCalendar,
            BusinessDayConvention::ModifiedFollowing,
            DayCountConvention::Act360,
        )
        .unwrap();
        assert_eq!(deposit.earliest_date(), Date::from_ymd(2025, 1, 21).unwrap());
        assert_eq!(deposit.maturity_date(), Date::from_ymd(2025, 2, 21).unwrap());
        assert_eq!(deposit.kind(), HelperKind::Deposit);
    }

    #[test]
    fn test_implied_rate_on_continuous_curve() {
        let reference = Date::from_ymd(2025, 1, 15).unwrap();
        let maturity = reference.add_days(180);
        let deposit =
            DepositRateHelper::new(quote(0.04), reference, maturity, DayCountConvention::Act360)
                .unwrap();
        let curve = FlatForward::with_rate(
            reference.into(),
            0.04,
            DayCountConvention::Act365Fixed,
            Compounding::Continuous,
        );
        let expected = ((0.04_f64 * 180.0 / 365.0).exp() - 1.0) / (180.0 / 360.0);
        assert_relative_eq!(
            deposit.implied_quote(curve.as_ref()).unwrap(),
            expected,
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_rejects_inverted_dates() {
        let reference = Date::from_ymd(2025, 1, 15).unwrap();
        let err = DepositRateHelper::new(quote(0.04), reference, reference, DayCountConvention::Act360)
            .unwrap_err();
        assert!(err.is_configuration());
    }
}
