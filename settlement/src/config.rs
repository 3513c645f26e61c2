//! Configuration for settlement engine

use expense_ledger::BalanceConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Settlement engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Balance engine configuration
    pub balance: BalanceConfig,

    /// Netting configuration
    pub netting: NettingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "settlement-engine".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            balance: BalanceConfig::default(),
            netting: NettingConfig::default(),
        }
    }
}

/// Netting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NettingConfig {
    /// Positions and transfers at or below this are ignored (default: 0.01)
    pub epsilon: Decimal,

    /// Decimal places of emitted settlement amounts (default: 2)
    pub amount_scale: u32,
}

impl Default for NettingConfig {
    fn default() -> Self {
        Self {
            epsilon: Decimal::new(1, 2), // one cent
            amount_scale: 2,
        }
    }
}

impl NettingConfig {
    /// Reject settings the optimizer cannot converge with
    ///
    /// Rounding a transfer moves it by at most half a unit of `amount_scale`,
    /// which must stay below `epsilon` for every step to retire a party.
    pub fn validate(&self) -> crate::Result<()> {
        if self.amount_scale > 27 {
            return Err(crate::Error::Config(format!(
                "amount_scale must be at most 27, got {}",
                self.amount_scale
            )));
        }
        let half_unit = Decimal::new(5, self.amount_scale + 1);
        if self.epsilon <= half_unit {
            return Err(crate::Error::Config(format!(
                "epsilon {} must exceed half a unit of scale {} ({})",
                self.epsilon, self.amount_scale, half_unit
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config {
            balance: BalanceConfig::from_env()?,
            ..Default::default()
        };

        if let Ok(epsilon) = std::env::var("SETTLEMENT_EPSILON") {
            config.netting.epsilon = Decimal::from_str(&epsilon)
                .map_err(|e| crate::Error::Config(format!("Invalid SETTLEMENT_EPSILON: {}", e)))?;
        }

        if let Ok(scale) = std::env::var("SETTLEMENT_AMOUNT_SCALE") {
            config.netting.amount_scale = scale.parse().map_err(|e| {
                crate::Error::Config(format!("Invalid SETTLEMENT_AMOUNT_SCALE: {}", e))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> crate::Result<()> {
        self.balance.validate()?;
        self.netting.validate()
    }
}
