//! The yield term structure trait and its reference-date machinery.
//!
//! [`YieldTermStructure`] is the abstraction every curve in the library
//! implements: bootstrapped curves, flat curves and the decorators that sit on
//! top of other curves through handles. Implementors supply a reference date,
//! a day count and at least one of the `*_impl` hooks; the public date-based
//! queries are provided and perform the range checks.
//!
//! # Thread Safety
//!
//! All term structures are `Send + Sync` so curves can be shared read-only
//! across threads.

use std::cell::RefCell;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tenor_core::calendars::{BusinessDayConvention, Calendar};
use tenor_core::daycounts::DayCountConvention;
use tenor_core::patterns::{AsObservable, Observable, Observer};
use tenor_core::settings::EvaluationContext;
use tenor_core::types::{Compounding, Date, TimeUnit};

use crate::error::{CurveError, CurveResult};

/// Step used for numerical forward rates and for zero rates near `t = 0`.
pub const DT: f64 = 1e-4;

/// A yield (discount) curve.
///
/// The discount function satisfies `D(0) = 1`. Rates derived from it:
///
/// - zero yield `z(t) = -ln D(t) / t` (continuous)
/// - forward `f(t1, t2) = ln(D(t1) / D(t2)) / (t2 - t1)`
/// - instantaneous forward `-d ln D / dt`
///
/// The hooks `discount_impl`, `zero_yield_impl` and `forward_impl` default to
/// one another, so an implementor must override `discount_impl` or
/// `zero_yield_impl`. A curve that overrides neither gets a
/// `CurveError::Configuration` from either hook. Hooks take times in years
/// from the reference date and do no range checking.
pub trait YieldTermStructure: AsObservable + Send + Sync + fmt::Debug {
    /// Returns the date at which `t = 0` and `D = 1`.
    fn reference_date(&self) -> CurveResult<Date>;

    /// Returns the day count used to turn dates into times.
    fn day_count(&self) -> CurveResult<DayCountConvention>;

    /// Returns the latest date the curve covers.
    fn max_date(&self) -> CurveResult<Date> {
        Ok(Date::MAX)
    }

    /// Returns true if queries past [`YieldTermStructure::max_date`] are allowed.
    fn allows_extrapolation(&self) -> bool {
        false
    }

    /// Discount factor at time `t`.
    fn discount_impl(&self, t: f64) -> CurveResult<f64> {
        let _guard = DefaultHookGuard::enter((self as *const Self).cast())?;
        let z = self.zero_yield_impl(t)?;
        Ok((-z * t).exp())
    }

    /// Continuously compounded zero yield at time `t`.
    fn zero_yield_impl(&self, t: f64) -> CurveResult<f64> {
        let _guard = DefaultHookGuard::enter((self as *const Self).cast())?;
        let t = t.max(DT);
        let df = self.discount_impl(t)?;
        Ok(-df.ln() / t)
    }

    /// Instantaneous forward rate at time `t`.
    fn forward_impl(&self, t: f64) -> CurveResult<f64> {
        numerical_forward(self, t)
    }

    // ========================================================================
    // Provided queries
    // ========================================================================

    /// Year fraction from the reference date to `date`.
    fn time_from_reference(&self, date: Date) -> CurveResult<f64> {
        Ok(self
            .day_count()?
            .year_fraction(self.reference_date()?, date))
    }

    /// Time of the max date, infinite for unbounded curves.
    fn max_time(&self) -> CurveResult<f64> {
        let max_date = self.max_date()?;
        if max_date == Date::MAX {
            Ok(f64::INFINITY)
        } else {
            self.time_from_reference(max_date)
        }
    }

    /// Checks `date` against the curve's range and returns its time.
    fn checked_time(&self, date: Date) -> CurveResult<f64> {
        let reference = self.reference_date()?;
        if date < reference {
            return Err(CurveError::DateBeforeReference { date, reference });
        }
        if !self.allows_extrapolation() {
            let max_date = self.max_date()?;
            if date > max_date {
                return Err(CurveError::DateOutOfRange { date, max_date });
            }
        }
        self.time_from_reference(date)
    }

    /// Discount factor at `date`.
    fn discount(&self, date: Date) -> CurveResult<f64> {
        let t = self.checked_time(date)?;
        self.discount_impl(t)
    }

    /// Discount factor at time `t` in years.
    fn discount_at(&self, t: f64) -> CurveResult<f64> {
        if !(t >= 0.0) {
            return Err(CurveError::TimeOutOfRange { t, max: self.max_time()? });
        }
        if !self.allows_extrapolation() {
            let max = self.max_time()?;
            if t > max {
                return Err(CurveError::TimeOutOfRange { t, max });
            }
        }
        self.discount_impl(t)
    }

    /// Continuously compounded zero yield to `date`.
    fn zero_yield(&self, date: Date) -> CurveResult<f64> {
        let t = self.checked_time(date)?;
        self.zero_yield_impl(t)
    }

    /// Zero rate to `date` under `compounding`.
    fn zero_rate(&self, date: Date, compounding: Compounding) -> CurveResult<f64> {
        let t = self.checked_time(date)?;
        if compounding.is_continuous() {
            return self.zero_yield_impl(t);
        }
        let t = t.max(DT);
        Ok(compounding.zero_rate(self.discount_impl(t)?, t))
    }

    /// Instantaneous forward rate at `date`.
    fn instantaneous_forward(&self, date: Date) -> CurveResult<f64> {
        let t = self.checked_time(date)?;
        self.forward_impl(t)
    }

    /// Continuously compounded forward rate between two dates.
    ///
    /// Equal dates give the instantaneous forward.
    fn forward_rate(&self, start: Date, end: Date) -> CurveResult<f64> {
        if end < start {
            return Err(CurveError::InvalidForwardPeriod { start, end });
        }
        let t1 = self.checked_time(start)?;
        let t2 = self.checked_time(end)?;
        if t2 == t1 {
            return self.forward_impl(t1);
        }
        let d1 = self.discount_impl(t1)?;
        let d2 = self.discount_impl(t2)?;
        Ok((d1 / d2).ln() / (t2 - t1))
    }
}

thread_local! {
    // Curves on this thread currently inside a default discount or zero hook
    static DEFAULT_HOOKS: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Marks a curve as inside a default hook until dropped.
///
/// Entering twice for the same curve means the default discount and zero
/// hooks are calling each other.
struct DefaultHookGuard(usize);

impl DefaultHookGuard {
    fn enter(curve: *const ()) -> CurveResult<Self> {
        let key = curve as usize;
        DEFAULT_HOOKS.with(|active| {
            let mut active = active.borrow_mut();
            if active.contains(&key) {
                return Err(CurveError::configuration(
                    "term structure overrides neither discount_impl nor zero_yield_impl",
                ));
            }
            active.push(key);
            Ok(Self(key))
        })
    }
}

impl Drop for DefaultHookGuard {
    fn drop(&mut self) {
        DEFAULT_HOOKS.with(|active| {
            let mut active = active.borrow_mut();
            if let Some(pos) = active.iter().rposition(|key| *key == self.0) {
                active.remove(pos);
            }
        });
    }
}

/// Central difference of `-ln D` around `t`, one-sided at the origin.
pub fn numerical_forward<C: YieldTermStructure + ?Sized>(curve: &C, t: f64) -> CurveResult<f64> {
    let (t1, t2) = if t > DT / 2.0 {
        (t - DT / 2.0, t + DT / 2.0)
    } else {
        (0.0, DT)
    };
    let d1 = curve.discount_impl(t1)?;
    let d2 = curve.discount_impl(t2)?;
    Ok((d1 / d2).ln() / (t2 - t1))
}

/// How a curve determines its reference date.
#[derive(Debug, Clone)]
pub enum ReferenceDate {
    /// A fixed date.
    Fixed(Date),
    /// A number of business days after the context's evaluation date.
    Floating {
        /// The evaluation context to follow.
        context: Arc<EvaluationContext>,
        /// Business days from the evaluation date.
        settlement_days: i32,
        /// Calendar for counting business days.
        calendar: Arc<dyn Calendar>,
    },
}

impl ReferenceDate {
    /// A fixed reference date.
    #[must_use]
    pub fn fixed(date: Date) -> Self {
        Self::Fixed(date)
    }

    /// A reference date that moves with the evaluation date.
    #[must_use]
    pub fn floating<C: Calendar + 'static>(
        context: Arc<EvaluationContext>,
        settlement_days: i32,
        calendar: C,
    ) -> Self {
        Self::Floating {
            context,
            settlement_days,
            calendar: Arc::new(calendar),
        }
    }

    /// The context followed by a floating reference.
    pub fn context(&self) -> Option<&Arc<EvaluationContext>> {
        match self {
            Self::Fixed(_) => None,
            Self::Floating { context, .. } => Some(context),
        }
    }

    /// True if the reference follows an evaluation context.
    pub fn is_floating(&self) -> bool {
        matches!(self, Self::Floating { .. })
    }
}

impl From<Date> for ReferenceDate {
    fn from(date: Date) -> Self {
        Self::Fixed(date)
    }
}

/// Reference-date bookkeeping shared by concrete curves.
///
/// Holds the reference rule, the day count and the curve's observable. For
/// floating references the computed date is cached together with the
/// evaluation date it was computed from, so a stale entry is never served
/// even if a notification was missed.
pub struct TermStructureState {
    reference: ReferenceDate,
    day_count: DayCountConvention,
    cached: RwLock<Option<(Date, Date)>>,
    observable: Observable,
}

impl TermStructureState {
    /// Creates the state for a curve.
    #[must_use]
    pub fn new(reference: ReferenceDate, day_count: DayCountConvention) -> Self {
        Self {
            reference,
            day_count,
            cached: RwLock::new(None),
            observable: Observable::new(),
        }
    }

    /// The reference date in effect now.
    pub fn reference_date(&self) -> CurveResult<Date> {
        match &self.reference {
            ReferenceDate::Fixed(date) => Ok(*date),
            ReferenceDate::Floating {
                context,
                settlement_days,
                calendar,
            } => {
                let today = context.evaluation_date();
                if let Some((evaluation, reference)) = *self.cached.read() {
                    if evaluation == today {
                        return Ok(reference);
                    }
                }
                let reference = calendar.advance(
                    today,
                    *settlement_days,
                    TimeUnit::Days,
                    BusinessDayConvention::Following,
                )?;
                *self.cached.write() = Some((today, reference));
                Ok(reference)
            }
        }
    }

    /// The curve's day count.
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// The reference rule.
    pub fn reference(&self) -> &ReferenceDate {
        &self.reference
    }

    /// Drops the cached reference date.
    pub fn invalidate(&self) {
        self.cached.write().take();
    }

    /// Registers `observer` with the evaluation context, if floating.
    pub fn observe_context(&self, observer: Weak<dyn Observer>) {
        if let Some(context) = self.reference.context() {
            context.as_observable().register_observer(observer);
        }
    }

    /// The curve's observable.
    pub fn observable(&self) -> &Observable {
        &self.observable
    }
}

impl fmt::Debug for TermStructureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TermStructureState")
            .field("reference", &self.reference)
            .field("day_count", &self.day_count)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tenor_core::calendars::WeekendCalendar;

    /// A continuous 3% curve implemented through the discount hook only.
    #[derive(Debug, Default)]
    struct Exponential {
        observable: Observable,
    }

    impl AsObservable for Exponential {
        fn as_observable(&self) -> &Observable {
            &self.observable
        }
    }

    impl YieldTermStructure for Exponential {
        fn reference_date(&self) -> CurveResult<Date> {
            Ok(Date::from_ymd(2025, 1, 15)?)
        }

        fn day_count(&self) -> CurveResult<DayCountConvention> {
            Ok(DayCountConvention::Act365Fixed)
        }

        fn max_date(&self) -> CurveResult<Date> {
            Ok(Date::from_ymd(2035, 1, 15)?)
        }

        fn discount_impl(&self, t: f64) -> CurveResult<f64> {
            Ok((-0.03 * t).exp())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    /// Overrides none of the value hooks.
    #[derive(Debug, Default)]
    struct Hookless {
        observable: Observable,
    }

    impl AsObservable for Hookless {
        fn as_observable(&self) -> &Observable {
            &self.observable
        }
    }

    impl YieldTermStructure for Hookless {
        fn reference_date(&self) -> CurveResult<Date> {
            Ok(Date::from_ymd(2025, 1, 15)?)
        }

        fn day_count(&self) -> CurveResult<DayCountConvention> {
            Ok(DayCountConvention::Act365Fixed)
        }
    }

    #[test]
    fn test_missing_hooks_fail_instead_of_recursing() {
        let curve = Hookless::default();
        let d = date(2026, 1, 15);
        assert!(curve.discount(d).unwrap_err().is_configuration());
        assert!(curve.zero_yield(d).unwrap_err().is_configuration());
        assert!(curve.instantaneous_forward(d).unwrap_err().is_configuration());

        // The guard is released, so a well-formed curve still works
        let exponential = Exponential::default();
        assert_relative_eq!(exponential.zero_yield(d).unwrap(), 0.03, epsilon = 1e-12);
        assert!(curve.discount(d).unwrap_err().is_configuration());
    }

    #[test]
    fn test_default_hooks() {
        let curve = Exponential::default();
        let d = date(2030, 1, 15);
        assert_relative_eq!(curve.zero_yield(d).unwrap(), 0.03, epsilon = 1e-12);
        assert_relative_eq!(curve.instantaneous_forward(d).unwrap(), 0.03, epsilon = 1e-9);
        assert_relative_eq!(
            curve.forward_rate(date(2026, 1, 15), d).unwrap(),
            0.03,
            epsilon = 1e-12
        );
        assert_relative_eq!(curve.discount_at(0.0).unwrap(), 1.0);
        assert_relative_eq!(
            curve.instantaneous_forward(date(2025, 1, 15)).unwrap(),
            0.03,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_zero_rate_compounding() {
        let curve = Exponential::default();
        let d = date(2027, 1, 15);
        let annual = curve.zero_rate(d, Compounding::Annual).unwrap();
        assert_relative_eq!(annual, 0.03_f64.exp() - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_range_checks() {
        let curve = Exponential::default();
        assert!(matches!(
            curve.discount(date(2025, 1, 14)),
            Err(CurveError::DateBeforeReference { .. })
        ));
        assert!(matches!(
            curve.discount(date(2036, 1, 1)),
            Err(CurveError::DateOutOfRange { .. })
        ));
        assert!(matches!(
            curve.discount_at(-0.5),
            Err(CurveError::TimeOutOfRange { .. })
        ));
        assert!(matches!(
            curve.forward_rate(date(2027, 1, 1), date(2026, 1, 1)),
            Err(CurveError::InvalidForwardPeriod { .. })
        ));
    }

    #[test]
    fn test_floating_reference_follows_context() {
        let context = EvaluationContext::with_date(date(2025, 1, 17)); // Friday
        let state = TermStructureState::new(
            ReferenceDate::floating(context.clone(), 2, WeekendCalendar),
            DayCountConvention::Act360,
        );
        assert_eq!(state.reference_date().unwrap(), date(2025, 1, 21));

        context.set_evaluation_date(date(2025, 1, 20)).unwrap();
        assert_eq!(state.reference_date().unwrap(), date(2025, 1, 22));
    }

    #[test]
    fn test_fixed_reference() {
        let state = TermStructureState::new(date(2025, 1, 15).into(), DayCountConvention::Act360);
        assert!(!state.reference().is_floating());
        assert_eq!(state.reference_date().unwrap(), date(2025, 1, 15));
    }
}
