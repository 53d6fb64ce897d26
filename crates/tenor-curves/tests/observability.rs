//! Integration test: curves follow the evaluation date, quotes and relinked
//! handles.

use std::sync::Arc;

use approx::assert_relative_eq;
use tenor_core::prelude::*;
use tenor_curves::prelude::*;

fn today() -> Date {
    Date::from_ymd(2025, 1, 15).unwrap()
}

fn flat(reference: ReferenceDate, rate: f64) -> Arc<dyn YieldTermStructure> {
    FlatForward::with_rate(reference, rate, DayCountConvention::Act360, Compounding::Continuous)
}

#[test]
fn test_floating_reference_moves_with_evaluation_date() {
    let context = EvaluationContext::with_date(today());
    let curve = flat(ReferenceDate::floating(context.clone(), 2, NullCalendar), 0.03);
    let days = [10, 30, 60, 120, 360, 720];

    let expected: Vec<f64> = days
        .iter()
        .map(|d| curve.discount(today().add_days(2 + d)).unwrap())
        .collect();

    let flag = Flag::new();
    flag.watch(curve.as_ref());
    context.set_evaluation_date(today().add_days(30)).unwrap();
    assert_eq!(flag.notifications(), 1);
    assert_eq!(curve.reference_date().unwrap(), today().add_days(32));

    let moved = today().add_days(30);
    for (d, df) in days.iter().zip(expected) {
        assert_relative_eq!(curve.discount(moved.add_days(2 + d)).unwrap(), df, epsilon = 1e-15);
    }
}

#[test]
fn test_fixed_reference_ignores_evaluation_date() {
    let context = EvaluationContext::with_date(today());
    let curve = flat(today().into(), 0.03);
    let flag = Flag::new();
    flag.watch(curve.as_ref());
    context.set_evaluation_date(today().add_days(30)).unwrap();
    assert!(!flag.is_up());
    assert_eq!(curve.reference_date().unwrap(), today());
}

#[test]
fn test_implied_observes_linked_base() {
    let handle: CurveHandle = Handle::empty();
    let implied = ImpliedTermStructure::new(handle.clone(), today().add_days(30));
    let flag = Flag::new();
    flag.watch(implied.as_ref());

    handle.link_to(flat(today().into(), 0.03)).unwrap();
    assert_eq!(flag.notifications(), 1);

    handle.link_to(flat(today().into(), 0.04)).unwrap();
    assert_eq!(flag.notifications(), 2);
    assert_relative_eq!(
        implied.zero_yield(today().add_days(390)).unwrap(),
        0.04,
        epsilon = 1e-12
    );
}

#[test]
fn test_forward_spreaded_observes_both_handles() {
    let base_handle: CurveHandle = Handle::empty();
    let spread = SimpleQuote::new(0.01);
    let curve = ForwardSpreadedTermStructure::new(
        base_handle.clone(),
        Handle::<dyn Quote>::new(spread.clone()),
    );
    let flag = Flag::new();
    flag.watch(curve.as_ref());

    base_handle.link_to(flat(today().into(), 0.03)).unwrap();
    assert_eq!(flag.notifications(), 1);

    spread.set_value(0.02).unwrap();
    assert_eq!(flag.notifications(), 2);

    spread.set_value(0.02).unwrap();
    assert_eq!(flag.notifications(), 2);
}

#[test]
fn test_zero_spreaded_observes_both_handles() {
    let base_handle: CurveHandle = Handle::empty();
    let spread_handle: Handle<dyn Quote> = Handle::empty();
    let curve = ZeroSpreadedTermStructure::new(base_handle.clone(), spread_handle.clone());
    let flag = Flag::new();
    flag.watch(curve.as_ref());

    base_handle.link_to(flat(today().into(), 0.03)).unwrap();
    assert_eq!(flag.notifications(), 1);
    assert!(curve.discount(today().add_days(90)).is_err());

    let spread = SimpleQuote::new(0.01);
    spread_handle.link_to(spread.clone()).unwrap();
    assert_eq!(flag.notifications(), 2);
    assert_relative_eq!(curve.zero_yield(today().add_days(90)).unwrap(), 0.04, epsilon = 1e-14);

    spread.set_value(0.015).unwrap();
    assert_eq!(flag.notifications(), 3);
}

#[test]
fn test_notifications_chain_through_decorators() {
    let quote = SimpleQuote::new(0.03);
    let base = FlatForward::new(
        today().into(),
        Handle::<dyn Quote>::new(quote.clone()),
        DayCountConvention::Act365Fixed,
        Compounding::Continuous,
    );
    let base: Arc<dyn YieldTermStructure> = base;
    let implied = ImpliedTermStructure::new(Handle::new(base), today().add_days(10));
    let implied: Arc<dyn YieldTermStructure> = implied;
    let spreaded = ZeroSpreadedTermStructure::new(
        Handle::new(implied),
        Handle::<dyn Quote>::new(SimpleQuote::new(0.002)),
    );

    let flag = Flag::new();
    flag.watch(spreaded.as_ref());
    quote.set_value(0.031).unwrap();
    assert_eq!(flag.notifications(), 1);
    assert_relative_eq!(
        spreaded.zero_yield(today().add_days(375)).unwrap(),
        0.033,
        epsilon = 1e-12
    );
}
