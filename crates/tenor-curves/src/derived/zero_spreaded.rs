//! Base curve plus a spread on zero rates.

use std::sync::{Arc, Weak};

use tenor_core::daycounts::DayCountConvention;
use tenor_core::handle::Handle;
use tenor_core::patterns::{AsObservable, Observable, Observer};
use tenor_core::quote::Quote;
use tenor_core::types::{Compounding, Date};
use tenor_core::CoreResult;

use super::{base_curve, spread_value, CurveHandle};
use crate::error::CurveResult;
use crate::term_structure::{numerical_forward, YieldTermStructure, DT};

/// Adds a spread `s` to every zero rate of the base.
///
/// With continuous compounding forwards shift by the same `s`. Under any
/// other compounding the base zero rate is converted, spread and converted
/// back, and forwards are taken numerically from the result.
#[derive(Debug)]
pub struct ZeroSpreadedTermStructure {
    base: CurveHandle,
    spread: Handle<dyn Quote>,
    compounding: Compounding,
    observable: Observable,
}

impl ZeroSpreadedTermStructure {
    /// Creates a curve with a continuously compounded spread.
    pub fn new(base: CurveHandle, spread: Handle<dyn Quote>) -> Arc<Self> {
        Self::with_compounding(base, spread, Compounding::Continuous)
    }

    /// Creates a curve whose spread applies to rates under `compounding`.
    pub fn with_compounding(
        base: CurveHandle,
        spread: Handle<dyn Quote>,
        compounding: Compounding,
    ) -> Arc<Self> {
        Arc::new_cyclic(|me: &Weak<Self>| {
            let observer: Weak<dyn Observer> = me.clone();
            base.as_observable().register_observer(observer.clone());
            spread.as_observable().register_observer(observer);
            Self {
                base,
                spread,
                compounding,
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

    /// Compounding the spread is quoted in.
    pub fn compounding(&self) -> Compounding {
        self.compounding
    }
}

impl YieldTermStructure for ZeroSpreadedTermStructure {
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
        let zero = base_curve(&self.base)?.zero_yield_impl(t)?;
        let spread = spread_value(&self.spread)?;
        if self.compounding.is_continuous() {
            return Ok(zero + spread);
        }
        let t = t.max(DT);
        let quoted = Compounding::Continuous.convert_to(zero, self.compounding, t) + spread;
        Ok(self.compounding.convert_to(quoted, Compounding::Continuous, t))
    }

    fn forward_impl(&self, t: f64) -> CurveResult<f64> {
        if self.compounding.is_continuous() {
            Ok(base_curve(&self.base)?.forward_impl(t)? + spread_value(&self.spread)?)
        } else {
            numerical_forward(self, t)
        }
    }
}

impl Observer for ZeroSpreadedTermStructure {
    fn update(&self) -> CoreResult<()> {
        self.observable.notify_observers()
    }
}

impl AsObservable for ZeroSpreadedTermStructure {
    fn as_observable(&self) -> &Observable {
        &self.observable
    }
}
