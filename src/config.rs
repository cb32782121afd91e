//! Application configuration loaded from environment variables.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::engine::{EngineProfile, Profile};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Engine ===
    /// Engine profile: `rounded` or `simple`.
    #[serde(default)]
    pub profile: Profile,

    /// Rounding unit for recommended stakes (rounded profile only).
    #[serde(default = "default_rounding_unit")]
    pub rounding_unit: Decimal,

    /// Override for the profile's minimum total investment.
    #[serde(default)]
    pub minimum_investment: Option<Decimal>,

    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub log_json: bool,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_rounding_unit() -> Decimal {
    Decimal::TEN
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            rounding_unit: default_rounding_unit(),
            minimum_investment: None,
            port: default_port(),
            rust_log: default_log_level(),
            log_json: false,
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.rounding_unit <= Decimal::ZERO {
            return Err("ROUNDING_UNIT must be positive".to_string());
        }

        if let Some(minimum) = self.minimum_investment {
            if minimum < Decimal::ZERO {
                return Err("MINIMUM_INVESTMENT must not be negative".to_string());
            }
        }

        Ok(())
    }

    /// Engine parameters for the configured profile and overrides.
    pub fn engine_profile(&self) -> EngineProfile {
        let mut profile = EngineProfile::preset(self.profile);
        if profile.rounding_enabled() {
            profile.rounding_unit = Some(self.rounding_unit);
        }
        if let Some(minimum) = self.minimum_investment {
            profile.minimum_investment = minimum;
        }
        profile
    }
}
