//! Fixed-for-floating swap helper.
//!
//! The floating leg is valued off the same curve, so it telescopes to
//! `D(start) - D(end)` and only the fixed-leg schedule matters.

use tenor_core::calendars::{BusinessDayConvention, Calendar};
use tenor_core::daycounts::DayCountConvention;
use tenor_core::handle::Handle;
use tenor_core::quote::Quote;
use tenor_core::types::{Date, Frequency, Period};

use super::{check_period, spot_date, HelperKind, RateHelper};
use crate::error::CurveResult;
use crate::term_structure::YieldTermStructure;

/// A swap quoted by its par fixed rate.
///
/// # Pricing Formula
///
/// ```text
/// par = (D(start) - D(end)) / Σ τᵢ D(tᵢ)
/// ```
/// over the fixed-leg payment dates `tᵢ` with accruals `τᵢ`.
#[derive(Debug, Clone)]
pub struct SwapRateHelper {
    quote: Handle<dyn Quote>,
    start_date: Date,
    maturity_date: Date,
    fixed_frequency: Frequency,
    fixed_day_count: DayCountConvention,
    payment_dates: Vec<Date>,
    accruals: Vec<f64>,
}

impl SwapRateHelper {
    /// Creates a swap between explicit dates.
    ///
    /// Fixed-leg dates roll from `start_date` in whole periods of
    /// `fixed_frequency`, adjusted with `fixed_convention`; a short final
    /// period ends at `maturity_date`.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Configuration` if maturity is not after start.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        quote: Handle<dyn Quote>,
        start_date: Date,
        maturity_date: Date,
        calendar: &dyn Calendar,
        fixed_frequency: Frequency,
        fixed_convention: BusinessDayConvention,
        fixed_day_count: DayCountConvention,
    ) -> CurveResult<Self> {
        check_period(start_date, maturity_date)?;
        let payment_dates = fixed_schedule(
            start_date,
            maturity_date,
            calendar,
            fixed_frequency,
            fixed_convention,
        )?;
        let accruals = std::iter::once(start_date)
            .chain(payment_dates.iter().copied())
            .zip(payment_dates.iter().copied())
            .map(|(from, to)| fixed_day_count.year_fraction(from, to))
            .collect();

        Ok(Self {
            quote,
            start_date,
            maturity_date,
            fixed_frequency,
            fixed_day_count,
            payment_dates,
            accruals,
        })
    }

    /// Creates a spot-starting swap for a tenor.
    ///
    /// The maturity is spot advanced by `tenor` under `fixed_convention`.
    #[allow(clippy::too_many_arguments)]
    pub fn from_tenor(
        quote: Handle<dyn Quote>,
        reference: Date,
        tenor: Period,
        settlement_days: i32,
        calendar: &dyn Calendar,
        fixed_frequency: Frequency,
        fixed_convention: BusinessDayConvention,
        fixed_day_count: DayCountConvention,
    ) -> CurveResult<Self> {
        let start = spot_date(calendar, reference, settlement_days)?;
        let maturity = calendar.advance_by(start, tenor, fixed_convention)?;
        Self::new(
            quote,
            start,
            maturity,
            calendar,
            fixed_frequency,
            fixed_convention,
            fixed_day_count,
        )
    }

    /// Fixed-leg payment dates, ending at maturity.
    pub fn payment_dates(&self) -> &[Date] {
        &self.payment_dates
    }

    /// Fixed-leg accrual fractions, one per payment date.
    pub fn accruals(&self) -> &[f64] {
        &self.accruals
    }

    /// Fixed-leg frequency.
    pub fn fixed_frequency(&self) -> Frequency {
        self.fixed_frequency
    }

    /// Fixed-leg day count.
    pub fn fixed_day_count(&self) -> DayCountConvention {
        self.fixed_day_count
    }

    /// Fixed-leg annuity `Σ τᵢ D(tᵢ)`.
    pub fn annuity(&self, curve: &dyn YieldTermStructure) -> CurveResult<f64> {
        self.payment_dates
            .iter()
            .zip(&self.accruals)
            .try_fold(0.0, |sum, (date, tau)| -> CurveResult<f64> {
                Ok(sum + tau * curve.discount(*date)?)
            })
    }
}

impl RateHelper for SwapRateHelper {
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
        HelperKind::Swap
    }

    fn implied_quote(&self, curve: &dyn YieldTermStructure) -> CurveResult<f64> {
        let floating = curve.discount(self.start_date)? - curve.discount(self.maturity_date)?;
        Ok(floating / self.annuity(curve)?)
    }
}

/// Generates fixed-leg payment dates after `start`, ending at `end`.
fn fixed_schedule(
    start: Date,
    end: Date,
    calendar: &dyn Calendar,
    frequency: Frequency,
    convention: BusinessDayConvention,
) -> CurveResult<Vec<Date>> {
    let Some(step) = frequency.period() else {
        return Ok(vec![end]);
    };

    let mut dates = Vec::new();
    for i in 1.. {
        // Roll from the start each time so month-end dates do not drift
        let unadjusted = start.add_months(step.length * i)?;
        let date = calendar.adjust(unadjusted, convention);
        if date >= end {
            break;
        }
        dates.push(date);
    }
    dates.push(end);
    Ok(dates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::FlatForward;
    use approx::assert_relative_eq;
    use tenor_core::calendars::{NullCalendar, WeekendCalendar};
    use tenor_core::quote::SimpleQuote;
    use tenor_core::types::Compounding;

    fn quote(value: f64) -> Handle<dyn Quote> {
        Handle::<dyn Quote>::new(SimpleQuote::new(value))
    }

    #[test]
    fn test_annual_schedule() {
        let start = Date::from_ymd(2025, 1, 15).unwrap();
        let swap = SwapRateHelper::new(
            quote(0.05),
            start,
            Date::from_ymd(2028, 1, 15).unwrap(),
            &NullCalendar,
            Frequency::Annual,
            BusinessDayConvention::Unadjusted,
            DayCountConvention::Thirty360US,
        )
        .unwrap();
        assert_eq!(
            swap.payment_dates(),
            &[
                Date::from_ymd(2026, 1, 15).unwrap(),
                Date::from_ymd(2027, 1, 15).unwrap(),
                Date::from_ymd(2028, 1, 15).unwrap(),
            ]
        );
        for tau in swap.accruals() {
            assert_relative_eq!(*tau, 1.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_short_final_stub() {
        let start = Date::from_ymd(2025, 1, 15).unwrap();
        let swap = SwapRateHelper::new(
            quote(0.05),
            start,
            Date::from_ymd(2026, 4, 15).unwrap(),
            &NullCalendar,
            Frequency::SemiAnnual,
            BusinessDayConvention::Unadjusted,
            DayCountConvention::Thirty360US,
        )
        .unwrap();
        assert_eq!(swap.payment_dates().len(), 3);
        assert_relative_eq!(swap.accruals()[2], 0.25, epsilon = 1e-15);
    }

    #[test]
    fn test_adjusted_payment_dates() {
        // 2025-07-19 is a Saturday
        let start = Date::from_ymd(2025, 1, 19).unwrap();
        let swap = SwapRateHelper::new(
            quote(0.05),
            start,
            Date::from_ymd(2026, 1, 19).unwrap(),
            &WeekendCalendar,
            Frequency::SemiAnnual,
            BusinessDayConvention::Following,
            DayCountConvention::Act360,
        )
        .unwrap();
        assert_eq!(swap.payment_dates()[0], Date::from_ymd(2025, 7, 21).unwrap());
    }

    #[test]
    fn test_single_payment() {
        let start = Date::from_ymd(2025, 1, 15).unwrap();
        let end = Date::from_ymd(2027, 1, 15).unwrap();
        let swap = SwapRateHelper::new(
            quote(0.05),
            start,
            end,
            &NullCalendar,
            Frequency::Once,
            BusinessDayConvention::Unadjusted,
            DayCountConvention::Thirty360US,
        )
        .unwrap();
        assert_eq!(swap.payment_dates(), &[end]);
        assert_relative_eq!(swap.accruals()[0], 2.0, epsilon = 1e-15);
    }

    #[test]
    fn test_par_rate_on_matching_flat_curve() {
        // Annual compounding on 30/360 matches annual 30/360 accruals exactly
        let reference = Date::from_ymd(2025, 1, 15).unwrap();
        let curve = FlatForward::with_rate(
            reference.into(),
            0.05,
            DayCountConvention::Thirty360US,
            Compounding::Annual,
        );
        let swap = SwapRateHelper::from_tenor(
            quote(0.05),
            reference,
            Period::years(5),
            0,
            &NullCalendar,
            Frequency::Annual,
            BusinessDayConvention::Unadjusted,
            DayCountConvention::Thirty360US,
        )
        .unwrap();
        assert_relative_eq!(swap.implied_quote(curve.as_ref()).unwrap(), 0.05, epsilon = 1e-13);
        assert_eq!(swap.kind(), HelperKind::Swap);
    }
}
