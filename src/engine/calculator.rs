//! Recompute entry point: runs the engine under a profile and assembles
//! the full report for one set of inputs.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, instrument};

use super::allocation::{allocate, arbitrage_margin, is_degenerate};
use super::profit::{potential_returns, profit, total_staked};
use super::types::{EngineProfile, Outcome, StakeAllocation, StakeMode};
use crate::error::{EngineError, ValidationError};
use crate::metrics;
use crate::validation;

/// Per-outcome line of a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculationRow {
    /// Decimal odds.
    pub odd: Decimal,
    /// Tax rate in percent.
    pub tax: Decimal,
    /// Effective multiplier `odd * (1 - tax/100)`.
    pub multiplier: Decimal,
    /// Exact stake.
    pub value: Decimal,
    /// Rounded stake.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended: Option<Decimal>,
    /// Return if this outcome wins, exact stakes.
    pub exact_return: Decimal,
    /// Return if this outcome wins, rounded stakes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_return: Option<Decimal>,
}

/// Result of one recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Calculation {
    /// Engine profile used.
    pub profile: EngineProfile,
    /// Total investment.
    pub total_investment: Decimal,
    /// One row per outcome, in input order.
    pub rows: Vec<CalculationRow>,
    /// Guaranteed profit with exact stakes.
    pub profit: Decimal,
    /// Guaranteed profit with rounded stakes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_profit: Option<Decimal>,
    /// Sum of rounded stakes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_total: Option<Decimal>,
    /// Sum of inverse multipliers; below 1 the book holds a surebet.
    pub margin: Option<Decimal>,
    /// Exact profit as a percentage of the investment.
    pub roi: Decimal,
    /// Input was incomplete and the engine returned zeros.
    pub degenerate: bool,
}

impl Calculation {
    /// Allocations in input order.
    pub fn allocations(&self) -> Vec<StakeAllocation> {
        self.rows
            .iter()
            .map(|row| StakeAllocation {
                value: row.value,
                recommended: row.recommended,
            })
            .collect()
    }

    /// Whether the exact allocation locks in a profit.
    pub fn is_surebet(&self) -> bool {
        self.profit > Decimal::ZERO
    }
}

/// Stateless calculator bound to an [`EngineProfile`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Calculator {
    profile: EngineProfile,
}

impl Calculator {
    /// Create a calculator for `profile`.
    pub fn new(profile: EngineProfile) -> Self {
        Self { profile }
    }

    /// Active profile.
    pub fn profile(&self) -> &EngineProfile {
        &self.profile
    }

    /// Field issues for the inputs under this profile.
    pub fn validate(&self, total_investment: Decimal, outcomes: &[Outcome]) -> Vec<ValidationError> {
        validation::validate(&self.profile, total_investment, outcomes)
    }

    /// Recompute allocations and profits from scratch.
    #[instrument(skip(self, outcomes), fields(profile = %self.profile.name, total = %total_investment, outcomes = outcomes.len()))]
    pub fn calculate(
        &self,
        total_investment: Decimal,
        outcomes: &[Outcome],
    ) -> Result<Calculation, EngineError> {
        let _timer = metrics::timer_calculation();

        let allocations = match allocate(total_investment, outcomes, self.profile.rounding_unit) {
            Ok(allocations) => allocations,
            Err(e) => {
                metrics::inc_domain_errors();
                return Err(e);
            }
        };

        let degenerate = is_degenerate(total_investment, outcomes);
        let exact_profit = profit(total_investment, outcomes, &allocations, StakeMode::Exact);

        let (recommended_profit, recommended_total, recommended_returns) =
            if self.profile.rounding_enabled() {
                (
                    Some(profit(total_investment, outcomes, &allocations, StakeMode::Recommended)),
                    total_staked(total_investment, &allocations, StakeMode::Recommended),
                    potential_returns(outcomes, &allocations, StakeMode::Recommended),
                )
            } else {
                (None, None, None)
            };

        let exact_returns = potential_returns(outcomes, &allocations, StakeMode::Exact)
            .ok_or(EngineError::Overflow)?;

        let rows = outcomes
            .iter()
            .zip(&allocations)
            .enumerate()
            .map(|(i, (outcome, allocation))| {
                Ok(CalculationRow {
                    odd: outcome.odd,
                    tax: outcome.tax,
                    multiplier: outcome.effective_multiplier().ok_or(EngineError::Overflow)?,
                    value: allocation.value,
                    recommended: allocation.recommended,
                    exact_return: exact_returns[i],
                    recommended_return: recommended_returns.as_ref().map(|r| r[i]),
                })
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        let roi = if total_investment.is_zero() {
            Decimal::ZERO
        } else {
            exact_profit
                .checked_div(total_investment)
                .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
                .unwrap_or(Decimal::ZERO)
        };

        metrics::inc_calculations(degenerate);
        debug!(profit = %exact_profit, ?recommended_profit, degenerate, "Calculation complete");

        Ok(Calculation {
            profile: self.profile,
            total_investment,
            rows,
            profit: exact_profit,
            recommended_profit,
            recommended_total,
            margin: arbitrage_margin(outcomes),
            roi,
            degenerate,
        })
    }
}
