// 3.0 fees.rs: fee rate in parts per FEE_RANGE. 1_000_000 = 100%, 20_000 = 2%.
// fees always round down.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Amount;

pub const FEE_RANGE: u32 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct FeeRate(u32);

impl FeeRate {
    pub const ZERO: FeeRate = FeeRate(0);

    /// `None` unless `0 <= parts < FEE_RANGE`.
    #[must_use]
    pub fn new(parts: u32) -> Option<Self> {
        if parts < FEE_RANGE {
            Some(Self(parts))
        } else {
            None
        }
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    // 20_000 → 0.02
    pub fn as_fraction(&self) -> Decimal {
        Decimal::from(self.0) / Decimal::from(FEE_RANGE)
    }

    /// floor(cost * rate / FEE_RANGE).
    ///
    /// Split as `cost = q * FEE_RANGE + r` so the product never overflows:
    /// `q * rate <= cost` and `r * rate < FEE_RANGE^2`.
    pub fn apply(&self, cost: Amount) -> Amount {
        let range = Amount::from(FEE_RANGE);
        let rate = Amount::from(self.0);
        let q = cost / range;
        let r = cost % range;
        q * rate + r * rate / range
    }
}

impl Default for FeeRate {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<u32> for FeeRate {
    type Error = String;

    fn try_from(parts: u32) -> Result<Self, Self::Error> {
        FeeRate::new(parts).ok_or_else(|| format!("fee {} must be below {}", parts, FEE_RANGE))
    }
}

impl From<FeeRate> for u32 {
    fn from(rate: FeeRate) -> u32 {
        rate.0
    }
}

impl fmt::Display for FeeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", (self.as_fraction() * Decimal::ONE_HUNDRED).normalize())
    }
}
