//! Curves interpolated between dated nodes.

use std::fmt;

use serde::{Deserialize, Serialize};
use tenor_core::daycounts::DayCountConvention;
use tenor_core::patterns::{AsObservable, Observable};
use tenor_core::types::Date;
use tenor_math::interpolation::{Interpolation, Interpolator};

use crate::error::{CurveError, CurveResult};
use crate::term_structure::{YieldTermStructure, DT};

/// What the node values of an [`InterpolatedCurve`] represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurveQuantity {
    /// Discount factors.
    #[default]
    Discount,
    /// Continuously compounded zero rates.
    ZeroRate,
    /// Instantaneous forward rates.
    Forward,
}

impl CurveQuantity {
    /// True for quantities quoted as rates.
    pub fn is_rate(&self) -> bool {
        !matches!(self, CurveQuantity::Discount)
    }
}

impl fmt::Display for CurveQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveQuantity::Discount => write!(f, "Discount"),
            CurveQuantity::ZeroRate => write!(f, "ZeroRate"),
            CurveQuantity::Forward => write!(f, "Forward"),
        }
    }
}

/// An immutable curve defined by values at node dates.
///
/// The first node sits at the reference date. Values are interpolated over
/// the time from the reference date and converted to discount factors
/// according to the [`CurveQuantity`]:
///
/// | Quantity | `D(t)` |
/// |----------|--------|
/// | Discount | `v(t)` |
/// | ZeroRate | `exp(-v(t) t)` |
/// | Forward | `exp(-∫₀ᵗ v(s) ds)` |
///
/// # Example
///
/// ```rust
/// use tenor_core::prelude::*;
/// use tenor_curves::prelude::*;
/// use tenor_math::interpolation::Interpolation;
///
/// let reference = Date::from_ymd(2025, 1, 15).unwrap();
/// let curve = InterpolatedCurve::new(
///     reference,
///     DayCountConvention::Act365Fixed,
///     vec![(reference, 1.0), (reference.add_days(365), 0.96), (reference.add_days(730), 0.92)],
///     CurveQuantity::Discount,
///     Interpolation::LogLinear,
///     false,
/// )
/// .unwrap();
///
/// assert!((curve.discount(reference.add_days(365)).unwrap() - 0.96).abs() < 1e-15);
/// ```
pub struct InterpolatedCurve {
    reference_date: Date,
    day_count: DayCountConvention,
    dates: Vec<Date>,
    times: Vec<f64>,
    values: Vec<f64>,
    quantity: CurveQuantity,
    interpolation: Interpolation,
    interpolator: Box<dyn Interpolator>,
    allow_extrapolation: bool,
    observable: Observable,
}

impl InterpolatedCurve {
    /// Creates a curve from `(date, value)` nodes.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Configuration` if the first node is not at the
    /// reference date, if dates are not strictly increasing, or if a discount
    /// node is not positive. Interpolator construction errors are passed
    /// through.
    pub fn new(
        reference_date: Date,
        day_count: DayCountConvention,
        nodes: Vec<(Date, f64)>,
        quantity: CurveQuantity,
        interpolation: Interpolation,
        allow_extrapolation: bool,
    ) -> CurveResult<Self> {
        match nodes.first() {
            Some((first, _)) if *first == reference_date => {}
            Some((first, _)) => {
                return Err(CurveError::configuration(format!(
                    "first node {first} must be at the reference date {reference_date}"
                )))
            }
            None => return Err(CurveError::configuration("a curve needs at least one node")),
        }
        if let Some(pair) = nodes.windows(2).find(|pair| pair[1].0 <= pair[0].0) {
            return Err(CurveError::configuration(format!(
                "node dates must be strictly increasing: {} then {}",
                pair[0].0, pair[1].0
            )));
        }
        if quantity == CurveQuantity::Discount {
            if let Some((date, value)) = nodes.iter().find(|(_, v)| !(*v > 0.0 && v.is_finite())) {
                return Err(CurveError::configuration(format!(
                    "discount factor {value} at {date} is not positive"
                )));
            }
        }

        let (dates, values): (Vec<Date>, Vec<f64>) = nodes.into_iter().unzip();
        let times: Vec<f64> = dates
            .iter()
            .map(|d| day_count.year_fraction(reference_date, *d))
            .collect();
        let interpolator = interpolation.build(times.clone(), values.clone(), allow_extrapolation)?;

        Ok(Self {
            reference_date,
            day_count,
            dates,
            times,
            values,
            quantity,
            interpolation,
            interpolator,
            allow_extrapolation,
            observable: Observable::new(),
        })
    }

    /// Node dates.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Node times in years from the reference date.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Node values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// `(date, value)` pairs.
    pub fn nodes(&self) -> Vec<(Date, f64)> {
        self.dates.iter().copied().zip(self.values.iter().copied()).collect()
    }

    /// What the node values represent.
    pub fn quantity(&self) -> CurveQuantity {
        self.quantity
    }

    /// The interpolation rule.
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }
}

impl YieldTermStructure for InterpolatedCurve {
    fn reference_date(&self) -> CurveResult<Date> {
        Ok(self.reference_date)
    }

    fn day_count(&self) -> CurveResult<DayCountConvention> {
        Ok(self.day_count)
    }

    fn max_date(&self) -> CurveResult<Date> {
        Ok(self.dates[self.dates.len() - 1])
    }

    fn allows_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    fn discount_impl(&self, t: f64) -> CurveResult<f64> {
        let df = match self.quantity {
            CurveQuantity::Discount => self.interpolator.interpolate(t)?,
            CurveQuantity::ZeroRate => (-self.interpolator.interpolate(t)? * t).exp(),
            CurveQuantity::Forward => (-self.interpolator.integral(0.0, t)?).exp(),
        };
        if !(df > 0.0 && df.is_finite()) {
            return Err(CurveError::InvalidDiscount { t, value: df });
        }
        Ok(df)
    }

    fn zero_yield_impl(&self, t: f64) -> CurveResult<f64> {
        match self.quantity {
            CurveQuantity::ZeroRate => Ok(self.interpolator.interpolate(t)?),
            CurveQuantity::Forward if t > 0.0 => Ok(self.interpolator.integral(0.0, t)? / t),
            CurveQuantity::Forward => Ok(self.interpolator.interpolate(0.0)?),
            CurveQuantity::Discount => {
                let t = t.max(DT);
                Ok(-self.discount_impl(t)?.ln() / t)
            }
        }
    }

    fn forward_impl(&self, t: f64) -> CurveResult<f64> {
        match self.quantity {
            CurveQuantity::Forward => Ok(self.interpolator.interpolate(t)?),
            // f = d(z t)/dt = z + t z'
            CurveQuantity::ZeroRate => {
                Ok(self.interpolator.interpolate(t)? + t * self.interpolator.derivative(t)?)
            }
            CurveQuantity::Discount => {
                Ok(-self.interpolator.derivative(t)? / self.interpolator.interpolate(t)?)
            }
        }
    }
}

impl AsObservable for InterpolatedCurve {
    fn as_observable(&self) -> &Observable {
        &self.observable
    }
}

impl fmt::Debug for InterpolatedCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterpolatedCurve")
            .field("reference_date", &self.reference_date)
            .field("day_count", &self.day_count)
            .field("quantity", &self.quantity)
            .field("interpolation", &self.interpolation)
            .field("nodes", &self.dates.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference() -> Date {
        Date::from_ymd(2025, 1, 15).unwrap()
    }

    fn dates() -> Vec<Date> {
        vec![
            reference(),
            reference().add_days(365),
            reference().add_days(730),
            reference().add_days(1825),
        ]
    }

    fn curve(quantity: CurveQuantity, values: &[f64], interpolation: Interpolation) -> InterpolatedCurve {
        InterpolatedCurve::new(
            reference(),
            DayCountConvention::Act365Fixed,
            dates().into_iter().zip(values.iter().copied()).collect(),
            quantity,
            interpolation,
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_discount_nodes_reproduced() {
        let c = curve(
            CurveQuantity::Discount,
            &[1.0, 0.97, 0.94, 0.85],
            Interpolation::LogLinear,
        );
        for (d, v) in c.nodes() {
            assert_relative_eq!(c.discount(d).unwrap(), v, epsilon = 1e-15);
        }
        assert_eq!(c.max_date().unwrap(), reference().add_days(1825));
    }

    #[test]
    fn test_log_linear_discount_gives_flat_forwards() {
        let c = curve(
            CurveQuantity::Discount,
            &[1.0, 0.97, 0.94, 0.85],
            Interpolation::LogLinear,
        );
        let expected = (0.97_f64 / 0.94).ln();
        for days in [400, 500, 700] {
            let fwd = c.instantaneous_forward(reference().add_days(days)).unwrap();
            assert_relative_eq!(fwd, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zero_rate_curve() {
        let c = curve(
            CurveQuantity::ZeroRate,
            &[0.02, 0.02, 0.03, 0.03],
            Interpolation::Linear,
        );
        let d = reference().add_days(365);
        assert_relative_eq!(c.discount(d).unwrap(), (-0.02_f64).exp(), epsilon = 1e-15);
        assert_relative_eq!(c.zero_yield(d).unwrap(), 0.02, epsilon = 1e-15);
        // Between year 1 and 2 the zero rate rises 1% per year
        let t = 1.5;
        let numeric = crate::term_structure::numerical_forward(&c, t).unwrap();
        assert_relative_eq!(c.forward_impl(t).unwrap(), numeric, epsilon = 1e-7);
    }

    #[test]
    fn test_forward_curve_integrates() {
        let c = curve(
            CurveQuantity::Forward,
            &[0.02, 0.02, 0.03, 0.04],
            Interpolation::BackwardFlat,
        );
        // 2% for one year then 3% for one year
        let d = reference().add_days(730);
        assert_relative_eq!(c.discount(d).unwrap(), (-0.05_f64).exp(), epsilon = 1e-14);
        assert_relative_eq!(c.zero_yield(d).unwrap(), 0.025, epsilon = 1e-14);
        assert_relative_eq!(c.forward_rate(reference().add_days(365), d).unwrap(), 0.03, epsilon = 1e-14);
        assert_relative_eq!(c.zero_yield(reference()).unwrap(), 0.02, epsilon = 1e-14);
    }

    #[test]
    fn test_validation() {
        let dc = DayCountConvention::Act365Fixed;
        let later = reference().add_days(10);
        let err = InterpolatedCurve::new(
            reference(),
            dc,
            vec![(later, 1.0), (later.add_days(10), 0.99)],
            CurveQuantity::Discount,
            Interpolation::Linear,
            false,
        )
        .unwrap_err();
        assert!(err.is_configuration());

        let err = InterpolatedCurve::new(
            reference(),
            dc,
            vec![(reference(), 1.0), (later, 0.99), (later, 0.98)],
            CurveQuantity::Discount,
            Interpolation::Linear,
            false,
        )
        .unwrap_err();
        assert!(err.is_configuration());

        let err = InterpolatedCurve::new(
            reference(),
            dc,
            vec![(reference(), 1.0), (later, -0.5)],
            CurveQuantity::Discount,
            Interpolation::Linear,
            false,
        )
        .unwrap_err();
        assert!(err.is_configuration());

        // A single node cannot be interpolated
        let err = InterpolatedCurve::new(
            reference(),
            dc,
            vec![(reference(), 1.0)],
            CurveQuantity::Discount,
            Interpolation::Linear,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, CurveError::Math(_)));
    }

    #[test]
    fn test_extrapolation_flag() {
        let c = curve(
            CurveQuantity::Discount,
            &[1.0, 0.97, 0.94, 0.85],
            Interpolation::LogLinear,
        );
        assert!(matches!(
            c.discount(reference().add_days(2000)),
            Err(CurveError::DateOutOfRange { .. })
        ));
    }
}
