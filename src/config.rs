// 2.0 config.rs: per-market settings. the fee is fixed for the market's lifetime.

use serde::{Deserialize, Serialize};

use crate::fees::{FeeRate, FEE_RANGE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketConfig {
    // Trading fee in parts per FEE_RANGE
    pub fee: FeeRate,
    // Maximum number of events retained in memory
    pub max_events: usize,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            fee: FeeRate::ZERO,
            max_events: 100_000,
        }
    }
}

impl MarketConfig {
    // 20_000 parts = 2%
    pub fn with_fee(parts: u32) -> Result<Self, ConfigError> {
        let fee = FeeRate::new(parts).ok_or(ConfigError::FeeOutOfRange { fee: parts })?;
        Ok(Self {
            fee,
            ..Self::default()
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fee.value() >= FEE_RANGE {
            return Err(ConfigError::FeeOutOfRange {
                fee: self.fee.value(),
            });
        }

        if self.max_events == 0 {
            return Err(ConfigError::InvalidEventLog {
                reason: "max_events must be positive".to_string(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Fee {fee} must be below {}", FEE_RANGE)]
    FeeOutOfRange { fee: u32 },

    #[error("Event needs at least 2 outcomes, got {count}")]
    TooFewOutcomes { count: usize },

    #[error("Invalid event log settings: {reason}")]
    InvalidEventLog { reason: String },
}
