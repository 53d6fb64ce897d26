//! A curve seen from a later reference date.

use std::sync::{Arc, Weak};

use tenor_core::daycounts::DayCountConvention;
use tenor_core::patterns::{AsObservable, Observable, Observer};
use tenor_core::types::Date;
use tenor_core::CoreResult;

use super::{base_curve, CurveHandle};
use crate::error::{CurveError, CurveResult};
use crate::term_structure::YieldTermStructure;

/// The base curve rebased to a later reference date `d0`.
///
/// ```text
/// D(t) = D_base(t + t0) / D_base(t0),   t0 = τ(base reference, d0)
/// ```
///
/// Day count, max date and extrapolation come from the base.
#[derive(Debug)]
pub struct ImpliedTermStructure {
    base: CurveHandle,
    reference_date: Date,
    observable: Observable,
}

impl ImpliedTermStructure {
    /// Creates the implied curve and registers it with `base`.
    pub fn new(base: CurveHandle, reference_date: Date) -> Arc<Self> {
        Arc::new_cyclic(|me: &Weak<Self>| {
            let observer: Weak<dyn Observer> = me.clone();
            base.as_observable().register_observer(observer);
            Self {
                base,
                reference_date,
                observable: Observable::new(),
            }
        })
    }

    /// The base curve handle.
    pub fn base(&self) -> &CurveHandle {
        &self.base
    }

    fn shift(&self, base: &dyn YieldTermStructure) -> CurveResult<f64> {
        let base_reference = base.reference_date()?;
        if self.reference_date < base_reference {
            return Err(CurveError::DateBeforeReference {
                date: self.reference_date,
                reference: base_reference,
            });
        }
        base.time_from_reference(self.reference_date)
    }
}

impl YieldTermStructure for ImpliedTermStructure {
    fn reference_date(&self) -> CurveResult<Date> {
        Ok(self.reference_date)
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

    fn discount_impl(&self, t: f64) -> CurveResult<f64> {
        let base = base_curve(&self.base)?;
        let t0 = self.shift(base.as_ref())?;
        Ok(base.discount_impl(t + t0)? / base.discount_impl(t0)?)
    }

    fn forward_impl(&self, t: f64) -> CurveResult<f64> {
        let base = base_curve(&self.base)?;
        let t0 = self.shift(base.as_ref())?;
        base.forward_impl(t + t0)
    }
}

impl Observer for ImpliedTermStructure {
    fn update(&self) -> CoreResult<()> {
        self.observable.notify_observers()
    }
}

impl AsObservable for ImpliedTermStructure {
    fn as_observable(&self) -> &Observable {
        &self.observable
    }
}
