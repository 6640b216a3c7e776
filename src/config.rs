//! Engine configuration
//!
//! Every field has a default, so an empty document deserializes to the
//! standard two-decimal, one-cent-tolerance behaviour.

use bigdecimal::{BigDecimal, RoundingMode};
use serde::{Deserialize, Serialize};

use crate::types::*;

/// How emitted transfer amounts are rounded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingPolicy {
    /// Ties round away from zero (2.345 -> 2.35)
    #[default]
    HalfAwayFromZero,
    /// Ties round to the even neighbour (2.345 -> 2.34)
    HalfEven,
}

impl RoundingPolicy {
    pub fn mode(&self) -> RoundingMode {
        match self {
            RoundingPolicy::HalfAwayFromZero => RoundingMode::HalfUp,
            RoundingPolicy::HalfEven => RoundingMode::HalfEven,
        }
    }
}

/// Settlement engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Balances within this distance of zero are considered settled
    #[serde(default = "default_tolerance")]
    pub tolerance: BigDecimal,

    /// Decimal places of emitted transfer amounts
    #[serde(default = "default_scale")]
    pub scale: i64,

    #[serde(default)]
    pub rounding: RoundingPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            scale: default_scale(),
            rounding: RoundingPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> SettlementResult<()> {
        if self.tolerance < BigDecimal::from(0) {
            return Err(SettlementError::Validation(
                "Tolerance cannot be negative".to_string(),
            ));
        }

        if !(0..=18).contains(&self.scale) {
            return Err(SettlementError::Validation(format!(
                "Scale must be between 0 and 18, got {}",
                self.scale
            )));
        }

        Ok(())
    }
}

/// One hundredth of a currency unit
pub fn default_tolerance() -> BigDecimal {
    BigDecimal::from(1) / BigDecimal::from(100)
}

fn default_scale() -> i64 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.tolerance, BigDecimal::from_str("0.01").unwrap());
        assert_eq!(config.scale, 2);
        assert_eq!(config.rounding, RoundingPolicy::HalfAwayFromZero);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"rounding": "half_even"}"#).unwrap();
        assert_eq!(config.rounding, RoundingPolicy::HalfEven);
        assert_eq!(config.scale, 2);
        assert_eq!(config.tolerance, default_tolerance());
    }

    #[test]
    fn test_invalid_config() {
        let config = EngineConfig {
            tolerance: BigDecimal::from(-1),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            scale: 40,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
