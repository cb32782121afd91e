//! Input validation for calculation requests.
//!
//! The engine tolerates incomplete input; this layer states what a
//! meaningful request looks like so callers can surface per-field issues
//! while still showing the live result.

use rust_decimal::Decimal;

use crate::engine::{EngineProfile, Outcome, MIN_OUTCOMES};
use crate::error::{CalcError, Result, ValidationError};

/// Collect every issue with `total_investment` and `outcomes`.
pub fn validate(
    profile: &EngineProfile,
    total_investment: Decimal,
    outcomes: &[Outcome],
) -> Vec<ValidationError> {
    let mut issues = Vec::new();

    if total_investment < profile.minimum_investment {
        issues.push(ValidationError::InvestmentBelowMinimum {
            minimum: profile.minimum_investment,
            actual: total_investment,
        });
    }

    if outcomes.len() < MIN_OUTCOMES {
        issues.push(ValidationError::TooFewOutcomes {
            minimum: MIN_OUTCOMES,
            actual: outcomes.len(),
        });
    }

    for (index, outcome) in outcomes.iter().enumerate() {
        if outcome.odd < Decimal::ONE {
            issues.push(ValidationError::OddBelowOne {
                index,
                odd: outcome.odd,
            });
        }
        if outcome.tax < Decimal::ZERO || outcome.tax > Decimal::ONE_HUNDRED {
            issues.push(ValidationError::TaxOutOfRange {
                index,
                tax: outcome.tax,
            });
        }
    }

    issues
}

/// Like [`validate`], failing on the first request with any issue.
pub fn ensure_valid(
    profile: &EngineProfile,
    total_investment: Decimal,
    outcomes: &[Outcome],
) -> Result<()> {
    let issues = validate(profile, total_investment, outcomes);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(CalcError::Invalid(issues))
    }
}
