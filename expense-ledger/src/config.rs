//! Configuration for the balance engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How Units participants are priced when an expense mixes split types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixedSplitPolicy {
    /// Exact and percentage amounts come off the top; units share the remainder
    #[default]
    RemainderToUnits,
    /// Every split type is priced against the full amount
    Independent,
}

impl MixedSplitPolicy {
    /// Parse from an environment value
    pub fn from_env_value(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "remainder" | "remainder_to_units" => Some(MixedSplitPolicy::RemainderToUnits),
            "independent" => Some(MixedSplitPolicy::Independent),
            _ => None,
        }
    }
}

/// Balance engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    /// Balances with smaller magnitude count as zero (default: 0.01)
    pub epsilon: Decimal,

    /// Pricing of Units participants in mixed expenses
    pub mixed_split_policy: MixedSplitPolicy,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            epsilon: Decimal::new(1, 2), // one cent
            mixed_split_policy: MixedSplitPolicy::default(),
        }
    }
}

impl BalanceConfig {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: BalanceConfig = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = BalanceConfig::default();

        if let Ok(epsilon) = std::env::var("SPLIT_EPSILON") {
            config.epsilon = Decimal::from_str(&epsilon)
                .map_err(|e| crate::Error::Config(format!("Invalid SPLIT_EPSILON: {}", e)))?;
        }

        if let Ok(policy) = std::env::var("SPLIT_MIXED_POLICY") {
            config.mixed_split_policy = MixedSplitPolicy::from_env_value(&policy).ok_or_else(|| {
                crate::Error::Config(format!("Invalid SPLIT_MIXED_POLICY: {}", policy))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        if self.epsilon <= Decimal::ZERO {
            return Err(crate::Error::Config(format!(
                "epsilon must be positive, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}
