//! Engine configuration.
//!
//! Every field defaults to the value in [`crate::constants`]; deployments
//! override only what they need from a JSON file.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{MatchdayError, Result, constants};

/// Top-level configuration for one engine instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub economy: EconomyConfig,
    pub blitz: BlitzConfig,
}

/// Marketplace and transaction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Tax withheld on marketplace sales. Applied when a listing is created.
    pub market_tax_rate: Decimal,
    /// Commit attempts per operation before `ConflictRetryExhausted`.
    pub max_commit_attempts: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            market_tax_rate: constants::MARKET_TAX_RATE,
            max_commit_attempts: constants::DEFAULT_MAX_COMMIT_ATTEMPTS,
        }
    }
}

/// Draft-pool generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlitzConfig {
    pub gold_threshold: u32,
    pub silver_threshold: u32,
    pub picks_per_tier: usize,
    pub max_repair_attempts: usize,
}

impl Default for BlitzConfig {
    fn default() -> Self {
        Self {
            gold_threshold: constants::BLITZ_GOLD_THRESHOLD,
            silver_threshold: constants::BLITZ_SILVER_THRESHOLD,
            picks_per_tier: constants::BLITZ_PICKS_PER_TIER,
            max_repair_attempts: constants::BLITZ_MAX_REPAIR_ATTEMPTS,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| MatchdayError::Configuration(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        let tax = self.economy.market_tax_rate;
        if tax < Decimal::ZERO || tax >= Decimal::ONE {
            return Err(MatchdayError::Configuration(format!(
                "market_tax_rate {tax} must be in [0, 1)"
            )));
        }
        if self.economy.max_commit_attempts == 0 {
            return Err(MatchdayError::Configuration(
                "max_commit_attempts must be at least 1".into(),
            ));
        }
        if self.blitz.silver_threshold >= self.blitz.gold_threshold {
            return Err(MatchdayError::Configuration(format!(
                "silver_threshold {} must be below gold_threshold {}",
                self.blitz.silver_threshold, self.blitz.gold_threshold
            )));
        }
        if self.blitz.picks_per_tier == 0 {
            return Err(MatchdayError::Configuration(
                "picks_per_tier must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.economy.market_tax_rate, Decimal::new(10, 2));
        assert_eq!(cfg.blitz.gold_threshold, 4_000);
        assert_eq!(cfg.blitz.silver_threshold, 2_000);
        assert_eq!(cfg.blitz.picks_per_tier, 5);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_takes_defaults() {
        let cfg = EngineConfig::from_json_str(r#"{"economy": {"max_commit_attempts": 3}}"#)
            .unwrap();
        assert_eq!(cfg.economy.max_commit_attempts, 3);
        assert_eq!(cfg.economy.market_tax_rate, constants::MARKET_TAX_RATE);
        assert_eq!(cfg.blitz, BlitzConfig::default());
    }

    #[test]
    fn tax_rate_out_of_range_rejected() {
        let err = EngineConfig::from_json_str(r#"{"economy": {"market_tax_rate": "1.5"}}"#)
            .unwrap_err();
        assert!(matches!(err, MatchdayError::Configuration(_)));
    }

    #[test]
    fn inverted_thresholds_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.blitz.silver_threshold = 5_000;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn malformed_json_is_configuration_error() {
        let err = EngineConfig::from_json_str("{not json").unwrap_err();
        assert!(err.to_string().starts_with("MD_ERR_902"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = EngineConfig::from_file("/nonexistent/matchday.json").unwrap_err();
        assert!(matches!(err, MatchdayError::Io(_)));
    }
}
