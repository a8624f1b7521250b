// 1.0: all the primitives live here. identities, token handles, block context, stage.
// quantities are raw integers: unsigned for balances, signed for trade vectors and costs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unsigned token or collateral quantity.
pub type Amount = u128;

/// Signed quantity. positive = market sells to the trader / trader pays,
/// negative = market buys back / trader receives.
pub type SignedAmount = i128;

// any ledger participant: traders, creators, markets, event registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub u64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "acct#{}", self.0)
    }
}

// handle of one fungible token on the ledger (collateral or an outcome token).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub u32);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketId(pub u32);

// 1.1: block height supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockNumber(pub u64);

// 1.2: millisecond timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis())
    }

    pub fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }
}

// 1.3: market lifecycle. forward only: Created -> Funded -> Closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    Created,
    Funded,
    Closed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Created => "created",
            Stage::Funded => "funded",
            Stage::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Converts an unsigned count into the signed domain used by trade vectors.
/// `None` when the value does not fit.
pub fn to_signed(amount: Amount) -> Option<SignedAmount> {
    SignedAmount::try_from(amount).ok()
}
