// 8.0.2: result types and errors for market operations.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ConfigError;
use crate::ledger::LedgerError;
use crate::pricing::PricingError;
use crate::registry::RegistryError;
use crate::types::{AccountId, Amount, SignedAmount, Stage};

/// Priced trade before settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeQuote {
    // pricing engine cost, before fees
    pub outcome_token_net_cost: SignedAmount,
    pub fees: Amount,
    // outcome_token_net_cost + fees
    pub net_cost: SignedAmount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeDirection {
    Buy,
    Sell,
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeDirection::Buy => f.write_str("buy"),
            TradeDirection::Sell => f.write_str("sell"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarketError {
    #[error("Caller {caller} is not the market creator {creator}")]
    NotCreator { caller: AccountId, creator: AccountId },

    #[error("Market is {actual}, operation requires {expected}")]
    WrongStage { expected: Stage, actual: Stage },

    #[error("Outcome index {index} out of range for {count} outcomes")]
    InvalidOutcomeIndex { index: usize, count: usize },

    #[error("Amount {0} does not fit the signed range")]
    AmountOutOfRange(Amount),

    #[error("Cost limit must be positive")]
    NonPositiveLimit,

    #[error("Expected {expected} outcome amounts, got {got}")]
    AmountsLengthMismatch { expected: usize, got: usize },

    #[error("Net cost {net_cost} exceeds limit {limit}")]
    SlippageExceeded { net_cost: SignedAmount, limit: SignedAmount },

    #[error("Pricing engine returned {outcome_token_net_cost} (net {net_cost}) for a {direction}")]
    CostSignMismatch {
        direction: TradeDirection,
        outcome_token_net_cost: SignedAmount,
        net_cost: SignedAmount,
    },

    #[error("Short sale profit {profit} exceeds collateral {collateral}")]
    ProfitExceedsCollateral { profit: Amount, collateral: Amount },

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),
}
