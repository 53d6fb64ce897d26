//! Flat forward curve.

use std::sync::{Arc, Weak};

use tenor_core::daycounts::DayCountConvention;
use tenor_core::handle::Handle;
use tenor_core::patterns::{AsObservable, Observable, Observer};
use tenor_core::quote::{Quote, SimpleQuote};
use tenor_core::types::{Compounding, Date};
use tenor_core::CoreResult;

use crate::error::CurveResult;
use crate::term_structure::{ReferenceDate, TermStructureState, YieldTermStructure, DT};

/// A curve with one rate at every maturity.
///
/// The rate is read from a quote handle at query time under the given
/// compounding. The curve observes the handle and, for a floating
/// reference, the evaluation context.
///
/// # Example
///
/// ```rust
/// use tenor_core::prelude::*;
/// use tenor_curves::prelude::*;
///
/// let reference = Date::from_ymd(2025, 1, 15).unwrap();
/// let curve = FlatForward::with_rate(
///     reference.into(),
///     0.05,
///     DayCountConvention::Act365Fixed,
///     Compounding::Continuous,
/// );
///
/// let df = curve.discount(reference.add_days(365)).unwrap();
/// assert!((df - (-0.05_f64).exp()).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct FlatForward {
    state: TermStructureState,
    rate: Handle<dyn Quote>,
    compounding: Compounding,
}

impl FlatForward {
    /// Creates a flat curve reading its rate from `rate`.
    #[must_use]
    pub fn new(
        reference: ReferenceDate,
        rate: Handle<dyn Quote>,
        day_count: DayCountConvention,
        compounding: Compounding,
    ) -> Arc<Self> {
        Arc::new_cyclic(|me: &Weak<Self>| {
            let observer: Weak<dyn Observer> = me.clone();
            rate.as_observable().register_observer(observer.clone());
            let state = TermStructureState::new(reference, day_count);
            state.observe_context(observer);
            Self {
                state,
                rate,
                compounding,
            }
        })
    }

    /// Creates a flat curve at a fixed rate.
    #[must_use]
    pub fn with_rate(
        reference: ReferenceDate,
        rate: f64,
        day_count: DayCountConvention,
        compounding: Compounding,
    ) -> Arc<Self> {
        Self::new(
            reference,
            Handle::<dyn Quote>::new(SimpleQuote::new(rate)),
            day_count,
            compounding,
        )
    }

    /// The rate handle.
    pub fn rate(&self) -> &Handle<dyn Quote> {
        &self.rate
    }

    /// The compounding the rate is quoted under.
    pub fn compounding(&self) -> Compounding {
        self.compounding
    }

    fn rate_value(&self) -> CurveResult<f64> {
        Ok(self.rate.current()?.value()?)
    }
}

impl YieldTermStructure for FlatForward {
    fn reference_date(&self) -> CurveResult<Date> {
        self.state.reference_date()
    }

    fn day_count(&self) -> CurveResult<DayCountConvention> {
        Ok(self.state.day_count())
    }

    fn allows_extrapolation(&self) -> bool {
        true
    }

    fn discount_impl(&self, t: f64) -> CurveResult<f64> {
        Ok(self.compounding.discount_factor(self.rate_value()?, t))
    }

    fn zero_yield_impl(&self, t: f64) -> CurveResult<f64> {
        let rate = self.rate_value()?;
        Ok(self
            .compounding
            .convert_to(rate, Compounding::Continuous, t.max(DT)))
    }

    fn forward_impl(&self, t: f64) -> CurveResult<f64> {
        let rate = self.rate_value()?;
        Ok(match self.compounding {
            Compounding::Continuous => rate,
            Compounding::Simple => rate / (1.0 + rate * t),
            periodic => {
                let n = f64::from(periodic.periods_per_year_opt().unwrap_or(1));
                n * (1.0 + rate / n).ln()
            }
        })
    }
}

impl Observer for FlatForward {
    fn update(&self) -> CoreResult<()> {
        self.state.invalidate();
        self.state.observable().notify_observers()
    }
}

impl AsObservable for FlatForward {
    fn as_observable(&self) -> &Observable {
        self.state.observable()
    }
}
