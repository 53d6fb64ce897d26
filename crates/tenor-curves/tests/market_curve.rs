//! Integration test: bootstrap a deposit and swap curve and check the curves
//! derived from it.
//!
//! Market data, evaluation date 2025-01-15, spot T+2 on a weekend calendar:
//!
//! | Instrument | Tenor | Rate  | Conventions |
//! |------------|-------|-------|-------------|
//! | Deposit    | 1M    | 4.581 | ModFollowing, ACT/360 |
//! | Deposit    | 2M    | 4.573 | |
//! | Deposit    | 3M    | 4.557 | |
//! | Deposit    | 6M    | 4.496 | |
//! | Deposit    | 9M    | 4.490 | |
//! | Swap       | 1Y    | 4.54  | Annual fixed, Unadjusted, 30/360 |
//! | Swap       | 5Y    | 4.99  | |
//! | Swap       | 10Y   | 5.47  | |
//! | Swap       | 20Y   | 5.89  | |
//! | Swap       | 30Y   | 5.96  | |

use std::sync::Arc;

use approx::assert_relative_eq;
use proptest::prelude::*;
use tenor_core::prelude::*;
use tenor_curves::prelude::*;
use tenor_math::interpolation::Interpolation;
use tenor_math::solvers::SolverAlgorithm;
use tenor_math::MathError;
use tracing_subscriber::EnvFilter;

const DEPOSITS: [(i32, f64); 5] = [(1, 4.581), (2, 4.573), (3, 4.557), (6, 4.496), (9, 4.490)];
const SWAPS: [(i32, f64); 5] = [(1, 4.54), (5, 4.99), (10, 5.47), (20, 5.89), (30, 5.96)];
const SETTLEMENT_DAYS: i32 = 2;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn today() -> Date {
    Date::from_ymd(2025, 1, 15).unwrap()
}

struct Market {
    deposit_quotes: Vec<Arc<SimpleQuote>>,
    swap_quotes: Vec<Arc<SimpleQuote>>,
    helpers: Vec<Arc<dyn RateHelper>>,
}

fn market(deposits: &[f64], swaps: &[f64]) -> Market {
    let calendar = WeekendCalendar;
    let mut helpers: Vec<Arc<dyn RateHelper>> = Vec::new();
    let mut deposit_quotes = Vec::new();
    let mut swap_quotes = Vec::new();

    for ((months, _), rate) in DEPOSITS.iter().zip(deposits) {
        let quote = SimpleQuote::new(rate / 100.0);
        helpers.push(Arc::new(
            DepositRateHelper::from_tenor(
                Handle::<dyn Quote>::new(quote.clone()),
                today(),
                Period::months(*months),
                SETTLEMENT_DAYS,
                &calendar,
                BusinessDayConvention::ModifiedFollowing,
                DayCountConvention::Act360,
            )
            .unwrap(),
        ));
        deposit_quotes.push(quote);
    }
    for ((years, _), rate) in SWAPS.iter().zip(swaps) {
        let quote = SimpleQuote::new(rate / 100.0);
        helpers.push(Arc::new(
            SwapRateHelper::from_tenor(
                Handle::<dyn Quote>::new(quote.clone()),
                today(),
                Period::years(*years),
                SETTLEMENT_DAYS,
                &calendar,
                Frequency::Annual,
                BusinessDayConvention::Unadjusted,
                DayCountConvention::Thirty360US,
            )
            .unwrap(),
        ));
        swap_quotes.push(quote);
    }

    Market {
        deposit_quotes,
        swap_quotes,
        helpers,
    }
}

fn market_rates() -> (Vec<f64>, Vec<f64>) {
    (
        DEPOSITS.iter().map(|(_, r)| *r).collect(),
        SWAPS.iter().map(|(_, r)| *r).collect(),
    )
}

fn settlement() -> Date {
    WeekendCalendar
        .advance(today(), SETTLEMENT_DAYS, TimeUnit::Days, BusinessDayConvention::Following)
        .unwrap()
}

fn build(config: BootstrapConfig) -> (Market, Arc<PiecewiseCurve>) {
    let (deposits, swaps) = market_rates();
    let market = market(&deposits, &swaps);
    let curve = PiecewiseCurve::new(
        today().into(),
        DayCountConvention::Act365Fixed,
        market.helpers.clone(),
        config,
    )
    .unwrap();
    (market, curve)
}

#[test]
fn test_bootstrap_reprices_every_helper() {
    init_tracing();
    let (_market, curve) = build(BootstrapConfig::default());

    let report = curve.report().unwrap();
    assert_eq!(report.nodes().len(), 10);
    for node in report.nodes() {
        assert!(
            node.error().abs() < 1e-9,
            "{} reprices with error {:e}",
            node.description,
            node.error()
        );
    }

    let nodes = curve.nodes().unwrap();
    assert_eq!(nodes[0], (today(), 1.0));
    assert!(nodes.windows(2).all(|pair| pair[1].1 < pair[0].1));
    assert_eq!(curve.max_date().unwrap(), nodes[nodes.len() - 1].0);
}

#[test]
fn test_every_solver_reprices() {
    init_tracing();
    for algorithm in [
        SolverAlgorithm::Bisection,
        SolverAlgorithm::Brent,
        SolverAlgorithm::Secant,
        SolverAlgorithm::Newton,
        SolverAlgorithm::FalsePosition,
        SolverAlgorithm::Ridder,
    ] {
        let config = BootstrapConfig::default()
            .with_algorithm(algorithm)
            .with_accuracy(1e-12)
            .with_max_evaluations(200);
        let (_market, curve) = build(config);
        let report = curve.report().unwrap();
        assert!(report.is_within(1e-9), "{algorithm}: max error {:e}", report.max_error());
    }
}

#[test]
fn test_secant_overshoot_is_a_bootstrap_failure() {
    init_tracing();
    // Secant leaves the bracket and tries a negative discount factor
    for rate in [0.08, 0.12, 0.20] {
        let helper: Arc<dyn RateHelper> = Arc::new(
            DepositRateHelper::from_tenor(
                Handle::<dyn Quote>::new(SimpleQuote::new(rate)),
                today(),
                Period::years(30),
                SETTLEMENT_DAYS,
                &WeekendCalendar,
                BusinessDayConvention::ModifiedFollowing,
                DayCountConvention::Act360,
            )
            .unwrap(),
        );
        let curve = PiecewiseCurve::new(
            today().into(),
            DayCountConvention::Act365Fixed,
            vec![helper.clone()],
            BootstrapConfig::default().with_algorithm(SolverAlgorithm::Secant),
        )
        .unwrap();

        match curve.snapshot().unwrap_err() {
            CurveError::BootstrapFailed {
                instrument,
                node,
                maturity,
                source,
            } => {
                assert_eq!(node, 0);
                assert_eq!(instrument, helper.description());
                assert_eq!(maturity, helper.maturity_date());
                assert!(matches!(source, MathError::InvalidInput { .. }), "{source}");
            }
            other => panic!("{rate}: unexpected error {other:?}"),
        }
        assert!(!curve.is_calculated());
    }
}

#[test]
fn test_rate_quantity_curves_reprice() {
    init_tracing();
    let (_m1, zero) = build(
        BootstrapConfig::default()
            .with_quantity(CurveQuantity::ZeroRate)
            .with_interpolation(Interpolation::Linear),
    );
    let (_m2, forward) = build(
        BootstrapConfig::default()
            .with_quantity(CurveQuantity::Forward)
            .with_interpolation(Interpolation::BackwardFlat),
    );
    assert!(zero.report().unwrap().is_within(1e-9));
    assert!(forward.report().unwrap().is_within(1e-9));

    // Zero nodes read back as continuous zero yields
    for (date, rate) in zero.nodes().unwrap().into_iter().skip(1) {
        assert_relative_eq!(zero.zero_yield(date).unwrap(), rate, epsilon = 1e-14);
    }
    // Backward-flat forwards hold the node value over the preceding interval
    let nodes = forward.nodes().unwrap();
    let inside = nodes[2].0.add_days(-1);
    assert_relative_eq!(forward.instantaneous_forward(inside).unwrap(), nodes[2].1, epsilon = 1e-14);
}

#[test]
fn test_quote_change_rebuilds_later_nodes_only() {
    init_tracing();
    let (market, curve) = build(BootstrapConfig::default());
    let before = curve.nodes().unwrap();

    let flag = Flag::new();
    flag.watch(curve.as_ref());
    market.swap_quotes[1].set_value(0.0510).unwrap();
    assert_eq!(flag.notifications(), 1);
    assert!(!curve.is_calculated());

    let after = curve.nodes().unwrap();
    // Anchor, five deposits and the 1Y swap precede the 5Y node
    assert_eq!(&before[..7], &after[..7]);
    assert!(after[7].1 < before[7].1);

    let report = curve.report().unwrap();
    assert!(report.is_within(1e-9));
    assert_relative_eq!(report.nodes()[6].market_quote, 0.0510);

    // Same value: no notification, curve stays built
    market.swap_quotes[1].set_value(0.0510).unwrap();
    assert_eq!(flag.notifications(), 1);
    assert!(curve.is_calculated());

    // The shortest deposit moves every node
    market.deposit_quotes[0].set_value(0.0470).unwrap();
    assert_eq!(flag.notifications(), 2);
    let shifted = curve.nodes().unwrap();
    assert_eq!(shifted[0], after[0]);
    assert!(shifted[1..].iter().zip(&after[1..]).all(|(a, b)| a.1 != b.1));
}

#[test]
fn test_evaluation_date_change_rebuilds() {
    init_tracing();
    let (deposits, swaps) = market_rates();
    let market = market(&deposits, &swaps);
    let context = EvaluationContext::with_date(today());
    let curve = PiecewiseCurve::new(
        ReferenceDate::floating(context.clone(), 0, WeekendCalendar),
        DayCountConvention::Act365Fixed,
        market.helpers.clone(),
        BootstrapConfig::default(),
    )
    .unwrap();
    assert_eq!(curve.reference_date().unwrap(), today());
    assert!(curve.report().unwrap().is_within(1e-9));

    let flag = Flag::new();
    flag.watch(curve.as_ref());
    context.set_evaluation_date(today().add_days(1)).unwrap();
    assert!(flag.is_up());
    assert!(!curve.is_calculated());

    assert_eq!(curve.reference_date().unwrap(), today().add_days(1));
    assert_eq!(curve.nodes().unwrap()[0].0, today().add_days(1));
    assert!(curve.report().unwrap().is_within(1e-9));

    // Past spot every helper starts before the reference date
    context.set_evaluation_date(today().add_days(7)).unwrap();
    assert!(curve.snapshot().unwrap_err().is_configuration());
}

#[test]
fn test_implied_curve_consistency() {
    init_tracing();
    let (_market, curve) = build(BootstrapConfig::default());
    let base: Arc<dyn YieldTermStructure> = curve;

    let new_settlement = WeekendCalendar
        .advance(today(), 3, TimeUnit::Years, BusinessDayConvention::Following)
        .unwrap();
    let test_date = new_settlement.add_years(5).unwrap();

    let implied = ImpliedTermStructure::new(Handle::new(base.clone()), new_settlement);
    let base_discount = base.discount(new_settlement).unwrap();
    let discount = base.discount(test_date).unwrap();
    let implied_discount = implied.discount(test_date).unwrap();

    assert!((discount - base_discount * implied_discount).abs() < 1e-10);
}

#[test]
fn test_forward_spreaded_consistency() {
    init_tracing();
    let (_market, curve) = build(BootstrapConfig::default());
    let base: Arc<dyn YieldTermStructure> = curve;
    let spread = SimpleQuote::new(0.01);
    let spreaded = ForwardSpreadedTermStructure::new(
        Handle::new(base.clone()),
        Handle::<dyn Quote>::new(spread.clone()),
    );
    let test_date = settlement().add_years(5).unwrap();

    let forward = base.forward_rate(test_date, test_date).unwrap() + 0.01;
    let spreaded_forward = spreaded.forward_rate(test_date, test_date).unwrap();
    assert!((forward - spreaded_forward).abs() < 1e-10);

    spread.set_value(0.005).unwrap();
    let forward = base.forward_rate(test_date, test_date).unwrap() + 0.005;
    let spreaded_forward = spreaded.forward_rate(test_date, test_date).unwrap();
    assert!((forward - spreaded_forward).abs() < 1e-10);
}

#[test]
fn test_zero_spreaded_consistency() {
    init_tracing();
    let (_market, curve) = build(BootstrapConfig::default());
    let base: Arc<dyn YieldTermStructure> = curve;
    let spread = SimpleQuote::new(0.01);
    let spreaded = ZeroSpreadedTermStructure::new(
        Handle::new(base.clone()),
        Handle::<dyn Quote>::new(spread.clone()),
    );
    let test_date = settlement().add_years(5).unwrap();

    let zero = base.zero_rate(test_date, Compounding::Continuous).unwrap() + 0.01;
    let spreaded_zero = spreaded.zero_rate(test_date, Compounding::Continuous).unwrap();
    assert!((zero - spreaded_zero).abs() < 1e-10);

    spread.set_value(0.005).unwrap();
    let zero = base.zero_rate(test_date, Compounding::Continuous).unwrap() + 0.005;
    let spreaded_zero = spreaded.zero_rate(test_date, Compounding::Continuous).unwrap();
    assert!((zero - spreaded_zero).abs() < 1e-10);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_bootstrap_round_trip(
        level in 2.0f64..6.0,
        bumps in prop::collection::vec(-0.5f64..0.5, 10),
    ) {
        let deposits: Vec<f64> = bumps[..5].iter().map(|b| level + b).collect();
        let swaps: Vec<f64> = bumps[5..].iter().map(|b| level + b).collect();
        let market = market(&deposits, &swaps);
        let curve = PiecewiseCurve::new(
            today().into(),
            DayCountConvention::Act365Fixed,
            market.helpers.clone(),
            BootstrapConfig::default(),
        )
        .unwrap();
        let report = curve.report().unwrap();
        prop_assert!(report.is_within(1e-9), "max error {:e}", report.max_error());
    }
}
