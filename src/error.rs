//! Unified error types for the surebet calculator.

use rust_decimal::Decimal;
use thiserror::Error;

/// Unified error type for the surebet calculator.
#[derive(Error, Debug)]
pub enum CalcError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Allocation engine error.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// Input rejected by the validation layer.
    #[error("invalid input: {}", join_issues(.0))]
    Invalid(Vec<ValidationError>),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn join_issues(issues: &[ValidationError]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Numeric domain errors raised by the allocation engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Tax-adjusted odds of an outcome are zero or negative.
    #[error("outcome {index} has a non-positive effective multiplier (odd={odd}, tax={tax}%)")]
    NonPositiveMultiplier {
        /// Position of the offending outcome.
        index: usize,
        /// Its decimal odds.
        odd: Decimal,
        /// Its tax rate.
        tax: Decimal,
    },

    /// Arithmetic left the representable decimal range.
    #[error("arithmetic overflow")]
    Overflow,
}

/// Field-level input issues, mirroring the form schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Total investment below the profile minimum.
    #[error("total investment {actual} is below the minimum of {minimum}")]
    InvestmentBelowMinimum {
        /// Profile minimum.
        minimum: Decimal,
        /// Submitted total.
        actual: Decimal,
    },

    /// Not enough outcomes to hedge.
    #[error("at least {minimum} outcomes are required, got {actual}")]
    TooFewOutcomes {
        /// Required outcome count.
        minimum: usize,
        /// Submitted outcome count.
        actual: usize,
    },

    /// Decimal odds below 1.
    #[error("odd {odd} must be at least 1")]
    OddBelowOne {
        /// Position of the outcome.
        index: usize,
        /// Submitted odds.
        odd: Decimal,
    },

    /// Tax outside `[0, 100]`.
    #[error("tax {tax}% must be between 0 and 100")]
    TaxOutOfRange {
        /// Position of the outcome.
        index: usize,
        /// Submitted tax.
        tax: Decimal,
    },
}

impl ValidationError {
    /// Form field path the issue belongs to.
    pub fn field(&self) -> String {
        match self {
            Self::InvestmentBelowMinimum { .. } => "totalInvestment".to_string(),
            Self::TooFewOutcomes { .. } => "odds".to_string(),
            Self::OddBelowOne { index, .. } => format!("odds.{index}.odd"),
            Self::TaxOutOfRange { index, .. } => format!("odds.{index}.tax"),
        }
    }
}

/// Errors parsing an `ODD[:TAX]` string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcomeError {
    /// Nothing to parse.
    #[error("empty outcome")]
    Empty,

    /// Odds part is not a number.
    #[error("invalid odd: {0:?}")]
    InvalidOdd(String),

    /// Tax part is not a number.
    #[error("invalid tax: {0:?}")]
    InvalidTax(String),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, CalcError>;
