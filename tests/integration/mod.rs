//! Integration tests for the surebet calculator.
//!
//! Exercises the public engine API end to end with the reference scenarios.
//! Run with: cargo test --test integration

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use surebet_calc::engine::{allocate, profit, round_to_unit};
use surebet_calc::error::EngineError;
use surebet_calc::validation::validate;
use surebet_calc::{Calculator, EngineProfile, Outcome, Profile, StakeAllocation, StakeMode};

const TOLERANCE: Decimal = dec!(0.000001);

fn assert_close(actual: Decimal, expected: Decimal) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "expected {expected}, got {actual}"
    );
}

fn untaxed(odds: &[Decimal]) -> Vec<Outcome> {
    odds.iter().copied().map(Outcome::untaxed).collect()
}

/// Sample books: fixed, so failures are reproducible.
fn sample_books() -> Vec<Vec<Outcome>> {
    vec![
        untaxed(&[dec!(2.0), dec!(2.0)]),
        untaxed(&[dec!(3.0), dec!(1.5)]),
        untaxed(&[dec!(2.5), dec!(2.5), dec!(2.5)]),
        vec![Outcome::new(dec!(2), dec!(10)), Outcome::untaxed(dec!(2))],
        vec![
            Outcome::new(dec!(1.73), dec!(3.5)),
            Outcome::untaxed(dec!(3.95)),
            Outcome::new(dec!(6.25), dec!(27.5)),
            Outcome::untaxed(dec!(11)),
        ],
        untaxed(&[dec!(1.01), dec!(101)]),
    ]
}

#[test]
fn scenario_even_two_way() {
    let outcomes = untaxed(&[dec!(2.0), dec!(2.0)]);
    let allocations = allocate(dec!(1000), &outcomes, Some(dec!(10))).unwrap();

    assert_eq!(allocations[0].value, dec!(500));
    assert_eq!(allocations[1].value, dec!(500));
    assert_eq!(profit(dec!(1000), &outcomes, &allocations, StakeMode::Exact), dec!(0));
}

#[test]
fn scenario_break_even_uneven_odds() {
    let outcomes = untaxed(&[dec!(3.0), dec!(1.5)]);
    let allocations = allocate(dec!(1000), &outcomes, None).unwrap();

    assert_close(allocations[0].value, dec!(333.333333));
    assert_close(allocations[1].value, dec!(666.666667));
    assert_close(profit(dec!(1000), &outcomes, &allocations, StakeMode::Exact), dec!(0));
}

#[test]
fn scenario_three_way_overround() {
    let outcomes = untaxed(&[dec!(2.5), dec!(2.5), dec!(2.5)]);
    let allocations = allocate(dec!(1000), &outcomes, None).unwrap();

    for (outcome, allocation) in outcomes.iter().zip(&allocations) {
        assert_close(allocation.value, dec!(333.333333));
        assert_close(allocation.value * outcome.odd, dec!(833.333333));
    }
    assert_close(
        profit(dec!(1000), &outcomes, &allocations, StakeMode::Exact),
        dec!(-166.666667),
    );
}

#[test]
fn scenario_tax_applied() {
    let outcomes = vec![Outcome::new(dec!(2), dec!(10)), Outcome::untaxed(dec!(2))];
    let allocations = allocate(dec!(1000), &outcomes, None).unwrap();

    assert_close(
        allocations[0].value * dec!(1.8),
        allocations[1].value * dec!(2.0),
    );
}

#[test]
fn scenario_zero_total() {
    let outcomes = untaxed(&[dec!(2.0), dec!(3.0)]);
    let allocations = allocate(Decimal::ZERO, &outcomes, Some(dec!(10))).unwrap();

    assert_eq!(allocations, vec![StakeAllocation::zero(true); 2]);
    assert_eq!(profit(Decimal::ZERO, &outcomes, &allocations, StakeMode::Exact), dec!(0));
    assert_eq!(
        profit(Decimal::ZERO, &outcomes, &allocations, StakeMode::Recommended),
        dec!(0)
    );
}

#[test]
fn stakes_always_sum_to_total() {
    for total in [dec!(1), dec!(10), dec!(999.99), dec!(25000)] {
        for outcomes in sample_books() {
            let allocations = allocate(total, &outcomes, None).unwrap();
            let sum: Decimal = allocations.iter().map(|a| a.value).sum();
            assert_close(sum, total);
        }
    }
}

#[test]
fn returns_are_always_equal() {
    for outcomes in sample_books() {
        let allocations = allocate(dec!(1000), &outcomes, None).unwrap();
        let returns: Vec<Decimal> = outcomes
            .iter()
            .zip(&allocations)
            .map(|(o, a)| a.value * o.effective_multiplier().unwrap())
            .collect();

        for ret in &returns {
            assert_close(*ret, returns[0]);
        }

        let p = profit(dec!(1000), &outcomes, &allocations, StakeMode::Exact);
        assert_close(p, returns[0] - dec!(1000));
    }
}

#[test]
fn recommended_stakes_are_multiples_of_ten() {
    for outcomes in sample_books() {
        let allocations = allocate(dec!(1000), &outcomes, Some(dec!(10))).unwrap();
        for allocation in allocations {
            let recommended = allocation.recommended.unwrap();
            assert_eq!(recommended % dec!(10), Decimal::ZERO);
            assert_eq!(Some(recommended), round_to_unit(allocation.value, dec!(10)));
        }
    }
}

#[test]
fn single_and_empty_books_are_degenerate() {
    let single = untaxed(&[dec!(2.0)]);
    assert_eq!(
        allocate(dec!(100), &single, None).unwrap(),
        vec![StakeAllocation::zero(false)]
    );
    assert!(allocate(dec!(100), &[], None).unwrap().is_empty());
}

#[test]
fn calculator_matches_engine() {
    let calculator = Calculator::new(EngineProfile::preset(Profile::Rounded));

    for outcomes in sample_books() {
        let calc = calculator.calculate(dec!(1000), &outcomes).unwrap();
        let allocations = allocate(dec!(1000), &outcomes, Some(dec!(10))).unwrap();

        assert_eq!(calc.allocations(), allocations);
        assert_eq!(
            calc.profit,
            profit(dec!(1000), &outcomes, &allocations, StakeMode::Exact)
        );
        assert_eq!(
            calc.recommended_profit,
            Some(profit(dec!(1000), &outcomes, &allocations, StakeMode::Recommended))
        );
    }
}

#[test]
fn full_tax_passes_validation_but_not_the_engine() {
    let profile = EngineProfile::preset(Profile::Rounded);
    let outcomes = vec![Outcome::untaxed(dec!(2.1)), Outcome::new(dec!(2.1), dec!(100))];

    assert!(validate(&profile, dec!(100), &outcomes).is_empty());
    assert_eq!(
        Calculator::new(profile).calculate(dec!(100), &outcomes),
        Err(EngineError::NonPositiveMultiplier {
            index: 1,
            odd: dec!(2.1),
            tax: dec!(100),
        })
    );
}
