// 6.0 pricing.rs: pricing engine seam. the market only asks for the net collateral
// cost of a trade vector; the formula lives behind the trait. the engine gets a
// read-only view, never the ledger, so it cannot call back into the market.

use parking_lot::Mutex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::VecDeque;

use crate::types::{Amount, SignedAmount};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("Expected {expected} trade amounts, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("Cost not representable")]
    Overflow,

    #[error("Pricing engine rejected trade: {0}")]
    Rejected(String),
}

/// Market state a pricing engine may read.
#[derive(Debug, Clone, Copy)]
pub struct MarketView<'a> {
    pub funding: Amount,
    pub net_outcome_tokens_sold: &'a [SignedAmount],
}

impl MarketView<'_> {
    pub fn outcome_count(&self) -> usize {
        self.net_outcome_tokens_sold.len()
    }
}

pub trait PricingEngine {
    /// Net collateral cost before fees of applying `amounts` to the market.
    /// Positive means the trader pays, negative means the trader receives.
    fn calc_net_cost(
        &self,
        market: &MarketView<'_>,
        amounts: &[SignedAmount],
    ) -> Result<SignedAmount, PricingError>;
}

/// Constant per-outcome prices. buys round the cost up and sells round the
/// proceeds down, so the market never pays out a fractional unit.
#[derive(Debug, Clone)]
pub struct FixedPricePricing {
    prices: Vec<Decimal>,
}

impl FixedPricePricing {
    pub fn new(prices: Vec<Decimal>) -> Self {
        Self { prices }
    }

    /// Every outcome priced at `1 / outcome_count`.
    pub fn uniform(outcome_count: usize) -> Self {
        let price = Decimal::ONE / Decimal::from(outcome_count.max(1));
        Self::new(vec![price; outcome_count])
    }

    pub fn prices(&self) -> &[Decimal] {
        &self.prices
    }
}

impl PricingEngine for FixedPricePricing {
    fn calc_net_cost(
        &self,
        market: &MarketView<'_>,
        amounts: &[SignedAmount],
    ) -> Result<SignedAmount, PricingError> {
        if amounts.len() != self.prices.len() || amounts.len() != market.outcome_count() {
            return Err(PricingError::LengthMismatch {
                expected: self.prices.len(),
                got: amounts.len(),
            });
        }

        let mut total = Decimal::ZERO;
        for (&amount, &price) in amounts.iter().zip(&self.prices) {
            let qty = Decimal::try_from_i128_with_scale(amount, 0).map_err(|_| PricingError::Overflow)?;
            let leg = qty.checked_mul(price).ok_or(PricingError::Overflow)?;
            total = total.checked_add(leg).ok_or(PricingError::Overflow)?;
        }

        total.ceil().to_i128().ok_or(PricingError::Overflow)
    }
}

/// Returns queued costs in order, one per call. Used to drive a market with
/// exact numbers, including deliberately wrong-signed ones.
#[derive(Debug, Default)]
pub struct ScriptedPricing {
    costs: Mutex<VecDeque<SignedAmount>>,
}

impl ScriptedPricing {
    pub fn new(costs: impl IntoIterator<Item = SignedAmount>) -> Self {
        Self {
            costs: Mutex::new(costs.into_iter().collect()),
        }
    }

    pub fn push(&self, cost: SignedAmount) {
        self.costs.lock().push_back(cost);
    }

    pub fn remaining(&self) -> usize {
        self.costs.lock().len()
    }
}

impl PricingEngine for ScriptedPricing {
    fn calc_net_cost(
        &self,
        _market: &MarketView<'_>,
        _amounts: &[SignedAmount],
    ) -> Result<SignedAmount, PricingError> {
        self.costs
            .lock()
            .pop_front()
            .ok_or_else(|| PricingError::Rejected("no scripted cost left".to_string()))
    }
}

/// What a pricing engine was shown for one quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedQuote {
    pub funding: Amount,
    pub net_outcome_tokens_sold: Vec<SignedAmount>,
    pub amounts: Vec<SignedAmount>,
}

/// Wraps another engine and keeps a copy of every view it was priced against.
#[derive(Debug, Default)]
pub struct RecordingPricing<P> {
    inner: P,
    seen: Mutex<Vec<ObservedQuote>>,
}

impl<P: PricingEngine> RecordingPricing<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn observed(&self) -> Vec<ObservedQuote> {
        self.seen.lock().clone()
    }

    pub fn last(&self) -> Option<ObservedQuote> {
        self.seen.lock().last().cloned()
    }
}

impl<P: PricingEngine> PricingEngine for RecordingPricing<P> {
    fn calc_net_cost(
        &self,
        market: &MarketView<'_>,
        amounts: &[SignedAmount],
    ) -> Result<SignedAmount, PricingError> {
        self.seen.lock().push(ObservedQuote {
            funding: market.funding,
            net_outcome_tokens_sold: market.net_outcome_tokens_sold.to_vec(),
            amounts: amounts.to_vec(),
        });
        self.inner.calc_net_cost(market, amounts)
    }
}
