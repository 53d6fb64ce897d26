//! Lazily bootstrapped piecewise curve.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tenor_core::daycounts::DayCountConvention;
use tenor_core::patterns::{AsObservable, Observable, Observer};
use tenor_core::types::Date;
use tenor_core::CoreResult;
use tenor_math::interpolation::Interpolation;
use tenor_math::MathError;
use tracing::{debug, trace, warn};

use super::config::BootstrapConfig;
use super::report::{BootstrapReport, NodeReport};
use crate::curves::{CurveQuantity, InterpolatedCurve};
use crate::error::{CurveError, CurveResult};
use crate::helpers::RateHelper;
use crate::term_structure::{ReferenceDate, TermStructureState, YieldTermStructure};

/// A finished bootstrap: the curve plus the work it took.
#[derive(Debug)]
struct Snapshot {
    curve: Arc<InterpolatedCurve>,
    evaluations: Vec<usize>,
}

/// A curve whose nodes are solved so that every helper reprices its quote.
///
/// Helpers are sorted by maturity and one node is placed at each maturity.
/// Node `k` is solved with nodes `0..k` frozen, so each solve is
/// one-dimensional. The curve bootstraps on first use and keeps the result
/// until a helper quote, a quote handle or the evaluation context notifies;
/// the next query then bootstraps again from scratch.
///
/// A failure at any node fails the whole bootstrap and leaves no curve
/// behind.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use tenor_core::prelude::*;
/// use tenor_curves::prelude::*;
///
/// let reference = Date::from_ymd(2025, 1, 15).unwrap();
/// let helper = |rate: f64, months: i32| -> Arc<dyn RateHelper> {
///     Arc::new(
///         DepositRateHelper::from_tenor(
///             Handle::<dyn Quote>::new(SimpleQuote::new(rate)),
///             reference,
///             Period::months(months),
///             0,
///             &WeekendCalendar,
///             BusinessDayConvention::ModifiedFollowing,
///             DayCountConvention::Act360,
///         )
///         .unwrap(),
///     )
/// };
///
/// let curve = PiecewiseCurve::new(
///     reference.into(),
///     DayCountConvention::Act365Fixed,
///     vec![helper(0.045, 3), helper(0.047, 6), helper(0.048, 12)],
///     BootstrapConfig::default(),
/// )
/// .unwrap();
///
/// assert!(curve.report().unwrap().is_within(1e-10));
/// ```
pub struct PiecewiseCurve {
    state: TermStructureState,
    helpers: Vec<Arc<dyn RateHelper>>,
    config: BootstrapConfig,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    // Bumped on every notification; a bootstrap overtaken by one is not kept
    generation: AtomicU64,
}

impl PiecewiseCurve {
    /// Creates a curve over `helpers`.
    ///
    /// The curve registers with every helper's quote handle and, for a
    /// floating reference, with the evaluation context. Nothing is solved
    /// until the first query.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Configuration` if `helpers` is empty or two
    /// helpers share a maturity.
    pub fn new(
        reference: ReferenceDate,
        day_count: DayCountConvention,
        mut helpers: Vec<Arc<dyn RateHelper>>,
        config: BootstrapConfig,
    ) -> CurveResult<Arc<Self>> {
        if helpers.is_empty() {
            return Err(CurveError::configuration("no rate helpers given"));
        }
        helpers.sort_by_key(|h| h.maturity_date());
        if let Some(pair) = helpers
            .windows(2)
            .find(|pair| pair[0].maturity_date() == pair[1].maturity_date())
        {
            return Err(CurveError::configuration(format!(
                "{} and {} share maturity {}",
                pair[0].description(),
                pair[1].description(),
                pair[0].maturity_date()
            )));
        }

        Ok(Arc::new_cyclic(|me: &Weak<Self>| {
            let observer: Weak<dyn Observer> = me.clone();
            for helper in &helpers {
                helper.quote().as_observable().register_observer(observer.clone());
            }
            let state = TermStructureState::new(reference, day_count);
            state.observe_context(observer);
            Self {
                state,
                helpers,
                config,
                snapshot: RwLock::new(None),
                generation: AtomicU64::new(0),
            }
        }))
    }

    /// Creates a curve of backward-flat instantaneous forwards.
    pub fn flat_forward(
        reference: ReferenceDate,
        day_count: DayCountConvention,
        helpers: Vec<Arc<dyn RateHelper>>,
        config: BootstrapConfig,
    ) -> CurveResult<Arc<Self>> {
        let config = config
            .with_quantity(CurveQuantity::Forward)
            .with_interpolation(Interpolation::BackwardFlat);
        Self::new(reference, day_count, helpers, config)
    }

    /// Helpers in maturity order.
    pub fn helpers(&self) -> &[Arc<dyn RateHelper>] {
        &self.helpers
    }

    /// The bootstrap settings.
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// True if a bootstrapped curve is currently held.
    pub fn is_calculated(&self) -> bool {
        self.snapshot.read().is_some()
    }

    /// The bootstrapped curve, solving it first if needed.
    pub fn snapshot(&self) -> CurveResult<Arc<InterpolatedCurve>> {
        Ok(Arc::clone(&self.calculate()?.curve))
    }

    /// Node dates and values, starting with the reference date.
    pub fn nodes(&self) -> CurveResult<Vec<(Date, f64)>> {
        Ok(self.calculate()?.curve.nodes())
    }

    /// Discards any held result and bootstraps again.
    pub fn recalculate(&self) -> CurveResult<()> {
        self.snapshot.write().take();
        self.calculate().map(|_| ())
    }

    /// Reprices every helper against the bootstrapped curve.
    pub fn report(&self) -> CurveResult<BootstrapReport> {
        let snapshot = self.calculate()?;
        let curve: &dyn YieldTermStructure = snapshot.curve.as_ref();
        let values = snapshot.curve.values();
        let nodes = self
            .helpers
            .iter()
            .enumerate()
            .map(|(k, helper)| {
                Ok(NodeReport {
                    node: k,
                    description: helper.description(),
                    kind: helper.kind(),
                    maturity: helper.maturity_date(),
                    value: values[k + 1],
                    evaluations: snapshot.evaluations[k],
                    market_quote: helper.quote_value()?,
                    implied_quote: helper.implied_quote(curve)?,
                })
            })
            .collect::<CurveResult<Vec<_>>>()?;
        Ok(BootstrapReport::new(nodes))
    }

    fn calculate(&self) -> CurveResult<Arc<Snapshot>> {
        if let Some(snapshot) = self.snapshot.read().as_ref() {
            return Ok(Arc::clone(snapshot));
        }
        let generation = self.generation.load(Ordering::SeqCst);
        let snapshot = Arc::new(self.bootstrap()?);
        let mut held = self.snapshot.write();
        if self.generation.load(Ordering::SeqCst) == generation {
            *held = Some(Arc::clone(&snapshot));
        } else {
            debug!("inputs changed during bootstrap, result not kept");
        }
        Ok(snapshot)
    }

    fn check_helpers(&self, reference: Date) -> CurveResult<()> {
        for helper in &self.helpers {
            if helper.maturity_date() <= reference {
                return Err(CurveError::configuration(format!(
                    "{} matures on or before the reference date {reference}",
                    helper.description()
                )));
            }
            if helper.earliest_date() < reference {
                return Err(CurveError::configuration(format!(
                    "{} starts before the reference date {reference}",
                    helper.description()
                )));
            }
            if let Err(err) = helper.quote_value() {
                return Err(CurveError::configuration(format!(
                    "{} has no usable quote: {err}",
                    helper.description()
                )));
            }
        }
        Ok(())
    }

    fn bootstrap(&self) -> CurveResult<Snapshot> {
        let reference = self.state.reference_date()?;
        let day_count = self.state.day_count();
        let config = &self.config;
        config.validate()?;
        self.check_helpers(reference)?;

        debug!(
            %reference,
            helpers = self.helpers.len(),
            quantity = %config.quantity,
            interpolation = %config.interpolation,
            "bootstrapping curve"
        );

        let solver = config.solver();
        let rate_nodes = config.quantity.is_rate();
        let mut dates = vec![reference];
        let mut values = vec![config.first_guess_value()];
        let mut evaluations = Vec::with_capacity(self.helpers.len());

        for (k, helper) in self.helpers.iter().enumerate() {
            let maturity = helper.maturity_date();
            let guess = values[k];

            // Oriented so the objective increases with the node value
            let objective = |x: f64| -> CurveResult<f64> {
                // Open-ended solvers may step past the lower bound
                if !rate_nodes && !(x > 0.0) {
                    return Err(MathError::invalid_input(format!(
                        "trial discount factor {x} is not positive"
                    ))
                    .into());
                }
                let mut nodes: Vec<(Date, f64)> =
                    dates.iter().copied().zip(values.iter().copied()).collect();
                if k == 0 && rate_nodes {
                    nodes[0].1 = x;
                }
                nodes.push((maturity, x));
                let trial = InterpolatedCurve::new(
                    reference,
                    day_count,
                    nodes,
                    config.quantity,
                    config.interpolation,
                    true,
                )?;
                let error = helper.quote_error(&trial)?;
                Ok(if rate_nodes { -error } else { error })
            };

            let result = solver
                .try_solve(objective, config.accuracy, guess, config.initial_step)
                .map_err(|err| match err {
                    CurveError::Math(source) => {
                        warn!(
                            instrument = %helper.description(),
                            node = k,
                            %maturity,
                            error = %source,
                            "bootstrap failed"
                        );
                        CurveError::BootstrapFailed {
                            instrument: helper.description(),
                            node: k,
                            maturity,
                            source,
                        }
                    }
                    other => other,
                })?;

            if k == 0 && rate_nodes {
                values[0] = result.root;
            }
            dates.push(maturity);
            values.push(result.root);
            evaluations.push(result.evaluations);
            trace!(
                node = k,
                %maturity,
                value = result.root,
                evaluations = result.evaluations,
                "node committed"
            );
        }

        let curve = InterpolatedCurve::new(
            reference,
            day_count,
            dates.into_iter().zip(values).collect(),
            config.quantity,
            config.interpolation,
            config.allow_extrapolation,
        )?;
        debug!(
            nodes = self.helpers.len(),
            evaluations = evaluations.iter().sum::<usize>(),
            "bootstrap complete"
        );
        Ok(Snapshot {
            curve: Arc::new(curve),
            evaluations,
        })
    }
}

impl YieldTermStructure for PiecewiseCurve {
    fn reference_date(&self) -> CurveResult<Date> {
        self.state.reference_date()
    }

    fn day_count(&self) -> CurveResult<DayCountConvention> {
        Ok(self.state.day_count())
    }

    fn max_date(&self) -> CurveResult<Date> {
        Ok(self
            .helpers
            .last()
            .map_or(Date::MAX, |helper| helper.maturity_date()))
    }

    fn allows_extrapolation(&self) -> bool {
        self.config.allow_extrapolation
    }

    fn discount_impl(&self, t: f64) -> CurveResult<f64> {
        self.calculate()?.curve.discount_impl(t)
    }

    fn zero_yield_impl(&self, t: f64) -> CurveResult<f64> {
        self.calculate()?.curve.zero_yield_impl(t)
    }

    fn forward_impl(&self, t: f64) -> CurveResult<f64> {
        self.calculate()?.curve.forward_impl(t)
    }
}

impl Observer for PiecewiseCurve {
    fn update(&self) -> CoreResult<()> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.invalidate();
        self.snapshot.write().take();
        self.state.observable().notify_observers()
    }
}

impl AsObservable for PiecewiseCurve {
    fn as_observable(&self) -> &Observable {
        self.state.observable()
    }
}

impl fmt::Debug for PiecewiseCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PiecewiseCurve")
            .field("state", &self.state)
            .field("helpers", &self.helpers.len())
            .field("config", &self.config)
            .field("calculated", &self.is_calculated())
            .finish()
    }
}
