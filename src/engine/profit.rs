//! Guaranteed profit of an allocation.

use rust_decimal::Decimal;

use super::allocation::is_degenerate;
use super::types::{Outcome, StakeAllocation, StakeMode};

/// Return if each outcome wins: `stake_i * odd_i * (1 - tax_i/100)`.
///
/// Returns `None` when a selected stake is missing, the allocations are not
/// aligned with the outcomes, or the arithmetic overflows.
pub fn potential_returns(
    outcomes: &[Outcome],
    allocations: &[StakeAllocation],
    mode: StakeMode,
) -> Option<Vec<Decimal>> {
    if outcomes.len() != allocations.len() {
        return None;
    }

    outcomes
        .iter()
        .zip(allocations)
        .map(|(outcome, allocation)| {
            let stake = allocation.stake(mode)?;
            stake.checked_mul(outcome.effective_multiplier()?)
        })
        .collect()
}

/// Total amount actually staked under `mode`.
pub fn total_staked(
    total_investment: Decimal,
    allocations: &[StakeAllocation],
    mode: StakeMode,
) -> Option<Decimal> {
    match mode {
        StakeMode::Exact => Some(total_investment),
        StakeMode::Recommended => allocations.iter().try_fold(Decimal::ZERO, |acc, a| {
            acc.checked_add(a.recommended?)
        }),
    }
}

/// Guaranteed profit (negative: guaranteed loss) of `allocations`.
///
/// The bettor does not pick the winner, so the worst-case return governs:
/// `min(return_i) - total_staked`. With exact stakes all returns are equal;
/// with rounded stakes they drift and the minimum decides.
///
/// Returns zero for degenerate input and whenever the selected stakes cannot
/// be evaluated.
pub fn profit(
    total_investment: Decimal,
    outcomes: &[Outcome],
    allocations: &[StakeAllocation],
    mode: StakeMode,
) -> Decimal {
    if is_degenerate(total_investment, outcomes) {
        return Decimal::ZERO;
    }

    let Some(returns) = potential_returns(outcomes, allocations, mode) else {
        return Decimal::ZERO;
    };
    let Some(staked) = total_staked(total_investment, allocations, mode) else {
        return Decimal::ZERO;
    };

    returns
        .into_iter()
        .min()
        .and_then(|worst| worst.checked_sub(staked))
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::allocation::allocate;
    use rust_decimal_macros::dec;

    fn close(a: Decimal, b: Decimal) -> bool {
        (a - b).abs() < dec!(0.000001)
    }

    #[test]
    fn even_book_breaks_even() {
        let outcomes = [Outcome::untaxed(dec!(2)), Outcome::untaxed(dec!(2))];
        let allocations = allocate(dec!(1000), &outcomes, Some(dec!(10))).unwrap();

        assert_eq!(profit(dec!(1000), &outcomes, &allocations, StakeMode::Exact), dec!(0));
        assert_eq!(profit(dec!(1000), &outcomes, &allocations, StakeMode::Recommended), dec!(0));
    }

    #[test]
    fn overround_book_loses() {
        let outcomes = [Outcome::untaxed(dec!(2.5)); 3];
        let allocations = allocate(dec!(1000), &outcomes, None).unwrap();

        let p = profit(dec!(1000), &outcomes, &allocations, StakeMode::Exact);
        assert!(close(p, dec!(-166.666667)));
    }

    #[test]
    fn surebet_profits() {
        let outcomes = [Outcome::untaxed(dec!(2.2)), Outcome::untaxed(dec!(2.2))];
        let allocations = allocate(dec!(1000), &outcomes, None).unwrap();

        let p = profit(dec!(1000), &outcomes, &allocations, StakeMode::Exact);
        assert!(close(p, dec!(100)));
    }

    #[test]
    fn exact_profit_matches_any_single_return() {
        let outcomes = [
            Outcome::new(dec!(2.05), dec!(5)),
            Outcome::untaxed(dec!(3.6)),
            Outcome::new(dec!(5.5), dec!(12)),
        ];
        let allocations = allocate(dec!(500), &outcomes, None).unwrap();
        let p = profit(dec!(500), &outcomes, &allocations, StakeMode::Exact);

        for (outcome, allocation) in outcomes.iter().zip(&allocations) {
            let ret = allocation.value * outcome.effective_multiplier().unwrap();
            assert!(close(p, ret - dec!(500)));
        }
    }

    #[test]
    fn recommended_profit_uses_minimum_return() {
        // Multipliers 1.8 and 2.0; exact stakes 526.32 / 473.68 round to 530 / 470.
        let outcomes = [Outcome::new(dec!(2), dec!(10)), Outcome::untaxed(dec!(2))];
        let allocations = allocate(dec!(1000), &outcomes, Some(dec!(10))).unwrap();

        assert_eq!(allocations[0].recommended, Some(dec!(530)));
        assert_eq!(allocations[1].recommended, Some(dec!(470)));

        // Returns 954 and 940: the minimum (940) governs, not the average (947).
        let p = profit(dec!(1000), &outcomes, &allocations, StakeMode::Recommended);
        assert_eq!(p, dec!(-60));

        let exact = profit(dec!(1000), &outcomes, &allocations, StakeMode::Exact);
        assert!(close(exact, dec!(-52.631579)));
    }

    #[test]
    fn recommended_profit_uses_rounded_total() {
        // 333.33 / 666.67 round to 330 / 670: returns 990 and 1005 on a staked 1000.
        let outcomes = [Outcome::untaxed(dec!(3)), Outcome::untaxed(dec!(1.5))];
        let allocations = allocate(dec!(1000), &outcomes, Some(dec!(10))).unwrap();

        assert_eq!(
            total_staked(dec!(1000), &allocations, StakeMode::Recommended),
            Some(dec!(1000))
        );
        assert_eq!(
            profit(dec!(1000), &outcomes, &allocations, StakeMode::Recommended),
            dec!(-10)
        );
    }

    #[test]
    fn degenerate_input_is_zero() {
        let outcomes = [Outcome::untaxed(dec!(2)), Outcome::untaxed(dec!(2))];
        let allocations = allocate(Decimal::ZERO, &outcomes, Some(dec!(10))).unwrap();

        assert_eq!(profit(Decimal::ZERO, &outcomes, &allocations, StakeMode::Exact), dec!(0));
        assert_eq!(profit(dec!(100), &outcomes[..1], &allocations[..1], StakeMode::Exact), dec!(0));
    }

    #[test]
    fn missing_stakes_collapse_to_zero() {
        let outcomes = [Outcome::untaxed(dec!(2.2)), Outcome::untaxed(dec!(2.2))];
        let unrounded = allocate(dec!(1000), &outcomes, None).unwrap();

        assert_eq!(
            profit(dec!(1000), &outcomes, &unrounded, StakeMode::Recommended),
            dec!(0)
        );
        assert_eq!(
            profit(dec!(1000), &outcomes, &unrounded[..1], StakeMode::Exact),
            dec!(0)
        );
    }
}
