//! Stake allocation across outcomes.
//!
//! Stakes are inversely proportional to each outcome's effective multiplier
//! and normalized to the total investment:
//!
//! ```text
//! m_i     = odd_i * (1 - tax_i / 100)
//! S       = Σ 1 / m_i
//! value_i = (total / m_i) / S
//! ```
//!
//! Every outcome then returns the same `value_i * m_i`, and the stakes sum
//! to `total`.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::instrument;

use super::types::{Outcome, StakeAllocation};
use crate::error::EngineError;

/// Minimum number of outcomes for a meaningful allocation.
pub const MIN_OUTCOMES: usize = 2;

/// True when the input does not yet carry enough information to allocate.
pub fn is_degenerate(total_investment: Decimal, outcomes: &[Outcome]) -> bool {
    total_investment.is_zero() || outcomes.len() < MIN_OUTCOMES
}

/// Effective multiplier of every outcome, rejecting non-positive ones.
pub fn effective_multipliers(outcomes: &[Outcome]) -> Result<Vec<Decimal>, EngineError> {
    outcomes
        .iter()
        .enumerate()
        .map(|(index, outcome)| {
            let m = outcome.effective_multiplier().ok_or(EngineError::Overflow)?;
            if m <= Decimal::ZERO {
                return Err(EngineError::NonPositiveMultiplier {
                    index,
                    odd: outcome.odd,
                    tax: outcome.tax,
                });
            }
            Ok(m)
        })
        .collect()
}

/// Sum of inverse multipliers (the book's implied probability sum).
///
/// Below 1 a guaranteed profit exists. Returns `None` for fewer than two
/// outcomes or an invalid numeric domain.
pub fn arbitrage_margin(outcomes: &[Outcome]) -> Option<Decimal> {
    if outcomes.len() < MIN_OUTCOMES {
        return None;
    }
    let multipliers = effective_multipliers(outcomes).ok()?;
    sum_of_inverses(&multipliers).ok()
}

fn sum_of_inverses(multipliers: &[Decimal]) -> Result<Decimal, EngineError> {
    multipliers.iter().try_fold(Decimal::ZERO, |acc, m| {
        Decimal::ONE
            .checked_div(*m)
            .and_then(|inv| acc.checked_add(inv))
            .ok_or(EngineError::Overflow)
    })
}

/// Round `value` to the nearest multiple of `unit`, ties away from zero.
///
/// Returns `None` if the rounded stake leaves the decimal range.
pub fn round_to_unit(value: Decimal, unit: Decimal) -> Option<Decimal> {
    if unit <= Decimal::ZERO {
        return Some(value);
    }
    value
        .checked_div(unit)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(unit)
}

/// Split `total_investment` across `outcomes` so the net return is equal
/// whichever outcome wins.
///
/// With a `rounding_unit`, each allocation also carries the stake rounded to
/// that unit. Degenerate input (zero total, fewer than two outcomes) yields
/// one zero allocation per outcome instead of an error.
///
/// # Errors
///
/// [`EngineError::NonPositiveMultiplier`] when an outcome's tax-adjusted odds
/// are zero or negative, [`EngineError::Overflow`] when the arithmetic leaves
/// the decimal range.
#[instrument(skip(outcomes), fields(total = %total_investment, outcomes = outcomes.len()))]
pub fn allocate(
    total_investment: Decimal,
    outcomes: &[Outcome],
    rounding_unit: Option<Decimal>,
) -> Result<Vec<StakeAllocation>, EngineError> {
    if is_degenerate(total_investment, outcomes) {
        return Ok(vec![StakeAllocation::zero(rounding_unit.is_some()); outcomes.len()]);
    }

    let multipliers = effective_multipliers(outcomes)?;
    let sum = sum_of_inverses(&multipliers)?;

    multipliers
        .iter()
        .map(|m| {
            let value = total_investment
                .checked_div(*m)
                .and_then(|share| share.checked_div(sum))
                .ok_or(EngineError::Overflow)?;
            let recommended = match rounding_unit {
                Some(unit) => Some(round_to_unit(value, unit).ok_or(EngineError::Overflow)?),
                None => None,
            };
            Ok(StakeAllocation { value, recommended })
        })
        .collect()
}
