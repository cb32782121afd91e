//! Allocation engine for surebet stakes.
//!
//! This module handles:
//! - Effective multipliers and stake allocation
//! - Rounding of stakes to a unit
//! - Guaranteed profit for exact and rounded stakes
//! - The recompute entry point used by the CLI and HTTP API
//!
//! Everything here is a pure function of its inputs.

pub mod allocation;
pub mod calculator;
pub mod profit;
pub mod types;

pub use allocation::{allocate, arbitrage_margin, round_to_unit, MIN_OUTCOMES};
pub use calculator::{Calculation, CalculationRow, Calculator};
pub use profit::{potential_returns, profit};
pub use types::{EngineProfile, Outcome, Profile, StakeAllocation, StakeMode};
