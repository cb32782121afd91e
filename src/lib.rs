//! Surebet stake allocation and guaranteed-profit calculator.
//!
//! Splits a fixed investment across the outcomes of an event so the net
//! return is the same whichever outcome wins, accounting for a per-outcome
//! tax on winnings.
//!
//! # Strategy
//!
//! Stakes are inversely proportional to each outcome's tax-adjusted odds.
//! When the implied probabilities sum below 1, profit is guaranteed:
//!
//! ```text
//! Odds:     2.20 / 2.20      (tax 0%)
//! Margin:   1/2.2 + 1/2.2 = 0.909 < 1 ✅
//! Stakes:   500 / 500        (total 1000)
//! Return:   1100 either way
//! Profit:   100 guaranteed
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`engine`]: Allocation, rounding and profit calculations
//! - [`validation`]: Field-level input checks
//! - [`api`]: HTTP API for calculations, health and metrics
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod utils;
pub mod validation;

pub use config::Config;
pub use engine::{Calculation, Calculator, EngineProfile, Outcome, Profile, StakeAllocation, StakeMode};
pub use error::{CalcError, Result};
