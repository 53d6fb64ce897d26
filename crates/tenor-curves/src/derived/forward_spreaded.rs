//! Base curve plus a spread on instantaneous forwards.

use std::sync::{Arc, Weak};

use tenor_core::daycounts::DayCountConvention;
use tenor_core::handle::Handle;
use tenor_core::patterns::{AsObservable, Observable, Observer};
use tenor_core::quote::Quote;
use tenor_core::types::Date;
use tenor_core::CoreResult;

use super::{base_curve, spread_value, CurveHandle};
use crate::error::CurveResult;
use crate::term_structure::YieldTermStructure;

/// Adds a continuous spread `s` to every instantaneous forward of the base.
///
/// Zero yields shift by the same `s`, so `D(t) = D_base(t) exp(-s t)`.
#[derive(Debug)]
pub struct ForwardSpreadedTermStructure {
    base: CurveHandle,
    spread: Handle<dyn Quote>,
    observable: Observable,
}

impl ForwardSpreadedTermStructure {
    /// Creates the spreaded curve and registers it with both handles.
    pub fn new(base: CurveHandle, spread: Handle<dyn Quote>) -> Arc<Self> {
        Arc::new_cyclic(|me: &Weak<Self>| {
            let observer: Weak<dyn Observer> = me.clone();
            base.as_observable().register_observer(observer.clone());
            spread.as_observable().register_observer(observer);
            Self {
                base,
                spread,
                observable: Observable::new(),
            }
        })
    }

    /// The base curve handle.
    pub fn base(&self) -> &CurveHandle {
        &self.base
    }

    /// The spread handle.
    pub fn spread(&self) -> &Handle<dyn Quote> {
        &self.spread
    }
}

impl YieldTermStructure for ForwardSpreadedTermStructure {
    fn reference_date(&self) -> CurveResult<Date> {
        base_curve(&self.base)?.reference_date()
    }

    fn day_count(&self) -> CurveResult<DayCountConvention> {
        base_curve(&self.base)?.day_count()
    }

    fn max_date(&self) -> CurveResult<Date> {
        base_curve(&self.base)?.max_date()
    }

    fn allows_extrapolation(&self) -> bool {
        self.base
            .current()
            .map_or(false, |base| base.allows_extrapolation())
    }

    fn zero_yield_impl(&self, t: f64) -> CurveResult<f64> {
        Ok(base_curve(&self.base)?.zero_yield_impl(t)? + spread_value(&self.spread)?)
    }

    fn forward_impl(&self, t: f64) -> CurveResult<f64> {
        Ok(base_curve(&self.base)?.forward_impl(t)? + spread_value(&self.spread)?)
    }
}

impl Observer for ForwardSpreadedTermStructure {
    fn update(&self) -> CoreResult<()> {
        self.observable.notify_observers()
    }
}

impl AsObservable for ForwardSpreadedTermStructure {
    fn as_observable(&self) -> &Observable {
        &self.observable
    }
}
