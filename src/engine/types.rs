//! Engine input and output types.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::ParseOutcomeError;

/// One leg of the bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Decimal odds (a winning unit stake returns `odd` units).
    pub odd: Decimal,
    /// Tax withheld from winnings, as a percentage in `[0, 100]`.
    #[serde(default)]
    pub tax: Decimal,
}

impl Outcome {
    /// Create a new outcome.
    pub fn new(odd: Decimal, tax: Decimal) -> Self {
        Self { odd, tax }
    }

    /// Create an untaxed outcome.
    pub fn untaxed(odd: Decimal) -> Self {
        Self::new(odd, Decimal::ZERO)
    }

    /// Net return per unit staked after tax: `odd * (1 - tax/100)`.
    ///
    /// Returns `None` only if the multiplication overflows.
    pub fn effective_multiplier(&self) -> Option<Decimal> {
        let kept = Decimal::ONE.checked_sub(self.tax.checked_div(Decimal::ONE_HUNDRED)?)?;
        self.odd.checked_mul(kept)
    }
}

/// Parses `ODD[:TAX]`, e.g. `2.5:10` or `1.8`.
impl FromStr for Outcome {
    type Err = ParseOutcomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseOutcomeError::Empty);
        }

        let (odd_str, tax_str) = match s.split_once(':') {
            Some((odd, tax)) => (odd.trim(), Some(tax.trim().trim_end_matches('%'))),
            None => (s, None),
        };

        let odd = parse_decimal(odd_str)
            .ok_or_else(|| ParseOutcomeError::InvalidOdd(odd_str.to_string()))?;
        let tax = match tax_str {
            Some(t) => {
                parse_decimal(t).ok_or_else(|| ParseOutcomeError::InvalidTax(t.to_string()))?
            }
            None => Decimal::ZERO,
        };

        Ok(Self { odd, tax })
    }
}

/// Accepts both `.` and `,` as the decimal separator.
fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(&s.replace(',', ".")).ok()
}

/// Stake assigned to one outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StakeAllocation {
    /// Exact stake equalizing the net return across outcomes.
    pub value: Decimal,
    /// `value` rounded to the nearest rounding unit (rounding profiles only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended: Option<Decimal>,
}

impl StakeAllocation {
    /// Zero-valued allocation, used while the input is incomplete.
    pub fn zero(rounding: bool) -> Self {
        Self {
            value: Decimal::ZERO,
            recommended: rounding.then_some(Decimal::ZERO),
        }
    }

    /// Stake selected by `mode`, if present.
    pub fn stake(&self, mode: StakeMode) -> Option<Decimal> {
        match mode {
            StakeMode::Exact => Some(self.value),
            StakeMode::Recommended => self.recommended,
        }
    }
}

/// Which stake of an allocation to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
pub enum StakeMode {
    /// Exact `value` stakes.
    #[strum(serialize = "exact")]
    Exact,
    /// Rounded `recommended` stakes.
    #[strum(serialize = "recommended")]
    Recommended,
}

/// Named engine configuration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Profile {
    /// Stakes rounded to the nearest 10, minimum investment 1.
    #[default]
    Rounded,
    /// Exact stakes only, minimum investment 10.
    Simple,
}

/// Engine parameters derived from a [`Profile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineProfile {
    /// Profile name.
    pub name: Profile,
    /// Rounding unit for recommended stakes; `None` disables rounding.
    pub rounding_unit: Option<Decimal>,
    /// Smallest total investment the validation layer accepts.
    pub minimum_investment: Decimal,
}

/// Default rounding unit for recommended stakes.
pub const DEFAULT_ROUNDING_UNIT: Decimal = Decimal::TEN;

impl EngineProfile {
    /// Preset for a named profile.
    pub fn preset(name: Profile) -> Self {
        match name {
            Profile::Rounded => Self {
                name,
                rounding_unit: Some(DEFAULT_ROUNDING_UNIT),
                minimum_investment: Decimal::ONE,
            },
            Profile::Simple => Self {
                name,
                rounding_unit: None,
                minimum_investment: Decimal::TEN,
            },
        }
    }

    /// Whether recommended stakes are produced.
    pub fn rounding_enabled(&self) -> bool {
        self.rounding_unit.is_some()
    }
}

impl Default for EngineProfile {
    fn default() -> Self {
        Self::preset(Profile::default())
    }
}
