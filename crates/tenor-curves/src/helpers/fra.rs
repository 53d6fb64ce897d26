//! Forward rate agreement helper.

use tenor_core::calendars::{BusinessDayConvention, Calendar};
use tenor_core::daycounts::DayCountConvention;
use tenor_core::handle::Handle;
use tenor_core::quote::Quote;
use tenor_core::types::{Date, Period};

use super::{check_period, implied_simple_rate, spot_date, HelperKind, RateHelper};
use crate::error::{CurveError, CurveResult};
use crate::term_structure::YieldTermStructure;

/// An FRA quoted as the simple forward rate over `[start, maturity]`.
///
/// A `3x6` FRA starts three months after spot and matures six months after
/// spot.
#[derive(Debug, Clone)]
pub struct FraRateHelper {
    quote: Handle<dyn Quote>,
    start_date: Date,
    maturity_date: Date,
    day_count: DayCountConvention,
}

impl FraRateHelper {
    /// Creates an FRA over explicit dates.
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

    /// Creates an `m1 x m2` FRA.
    ///
    /// Both ends are measured in months from spot and adjusted with
    /// `convention`.
    #[allow(clippy::too_many_arguments)]
    pub fn from_months(
        quote: Handle<dyn Quote>,
        reference: Date,
        months_to_start: i32,
        months_to_end: i32,
        settlement_days: i32,
        calendar: &dyn Calendar,
        convention: BusinessDayConvention,
        day_count: DayCountConvention,
    ) -> CurveResult<Self> {
        if months_to_start < 0 || months_to_end <= months_to_start {
            return Err(CurveError::configuration(format!(
                "invalid FRA {months_to_start}x{months_to_end}"
            )));
        }
        let spot = spot_date(calendar, reference, settlement_days)?;
        let start = calendar.advance_by(spot, Period::months(months_to_start), convention)?;
        let end = calendar.advance_by(spot, Period::months(months_to_end), convention)?;
        Self::new(quote, start, end, day_count)
    }
}

impl RateHelper for FraRateHelper {
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
        HelperKind::Fra
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
    use tenor_core::calendars::NullCalendar;
    use tenor_core::quote::SimpleQuote;
    use tenor_core::types::Compounding;

    #[test]
    fn test_three_by_six() {
        let reference = Date::from_ymd(2025, 1, 15).unwrap();
        let fra = FraRateHelper::from_months(
            Handle::<dyn Quote>::new(SimpleQuote::new(0.045)),
            reference,
            3,
            6,
            0,
            &NullCalendar,
            BusinessDayConvention::Unadjusted,
            DayCountConvention::Act360,
        )
        .unwrap();
        assert_eq!(fra.earliest_date(), Date::from_ymd(2025, 4, 15).unwrap());
        assert_eq!(fra.maturity_date(), Date::from_ymd(2025, 7, 15).unwrap());

        let curve = FlatForward::with_rate(
            reference.into(),
            0.045,
            DayCountConvention::Act360,
            Compounding::Continuous,
        );
        let tau = 91.0 / 360.0;
        let expected = ((0.045_f64 * tau).exp() - 1.0) / tau;
        assert_relative_eq!(fra.implied_quote(curve.as_ref()).unwrap(), expected, epsilon = 1e-13);
    }

    #[test]
    fn test_rejects_inverted_months() {
        let reference = Date::from_ymd(2025, 1, 15).unwrap();
        let err = FraRateHelper::from_months(
            Handle::empty(),
            reference,
            6,
            3,
            2,
            &NullCalendar,
            BusinessDayConvention::Following,
            DayCountConvention::Act360,
        )
        .unwrap_err();
        assert!(err.is_configuration());
    }
}
