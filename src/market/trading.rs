//! Trade orchestration and settlement.
//!
//! Every entry point builds a signed outcome-token vector, prices it through
//! the pricing engine, adds the market fee and settles all legs inside one
//! atomic call.

use tracing::{debug, info};

use super::core::Market;
use super::results::{MarketError, TradeDirection, TradeQuote};
use crate::events::{
    EventPayload, OutcomeTokenPurchaseEvent, OutcomeTokenSaleEvent, OutcomeTokenShortSaleEvent,
    OutcomeTokenTradeEvent,
};
use crate::ledger::TokenLedger;
use crate::types::{to_signed, AccountId, Amount, SignedAmount, Stage};

impl Market {
    /// Buys `count` tokens of one outcome, paying at most `max_cost`
    /// collateral including fees. Returns the collateral paid.
    pub fn buy(
        &mut self,
        caller: AccountId,
        outcome_index: usize,
        count: Amount,
        max_cost: Amount,
    ) -> Result<Amount, MarketError> {
        self.atomic("buy", |market, ledger| {
            market.buy_impl(ledger, caller, outcome_index, count, max_cost)
        })
    }

    /// Sells `count` tokens of one outcome for at least `min_profit`
    /// collateral after fees. `min_profit` must be positive.
    /// Returns the collateral received.
    pub fn sell(
        &mut self,
        caller: AccountId,
        outcome_index: usize,
        count: Amount,
        min_profit: Amount,
    ) -> Result<Amount, MarketError> {
        self.atomic("sell", |market, ledger| {
            market.sell_impl(ledger, caller, outcome_index, count, min_profit)
        })
    }

    /// Short position on one outcome: the caller funds `count` full sets, the
    /// market sells the chosen leg back into itself, and the caller keeps
    /// every other leg plus the sale proceeds. Returns `count - profit`.
    pub fn short_sell(
        &mut self,
        caller: AccountId,
        outcome_index: usize,
        count: Amount,
        min_profit: Amount,
    ) -> Result<Amount, MarketError> {
        self.atomic("short_sell", |market, ledger| {
            let shorted = market.outcome_token(outcome_index)?;
            let collateral = market.registry.collateral_token();
            let address = market.address;

            ledger.transfer_from(collateral, address, caller, address, count)?;
            ledger.approve(collateral, address, market.registry.address(), count)?;
            market.registry.buy_all_outcomes(ledger, address, count)?;
            ledger.approve(shorted, address, address, count)?;

            let profit = market.sell_impl(ledger, address, outcome_index, count, min_profit)?;
            let cost = count
                .checked_sub(profit)
                .ok_or(MarketError::ProfitExceedsCollateral {
                    profit,
                    collateral: count,
                })?;

            for index in 0..market.outcome_count() {
                if index != outcome_index {
                    let token = market.outcome_token(index)?;
                    ledger.transfer(token, address, caller, count)?;
                }
            }
            ledger.transfer(collateral, address, caller, profit)?;

            market.emit_event(EventPayload::OutcomeTokenShortSale(OutcomeTokenShortSaleEvent {
                buyer: caller,
                outcome_index,
                outcome_token_count: count,
                cost,
            }));

            info!(market = market.id.0, %caller, outcome_index, count, profit, cost, "short sale");
            Ok(cost)
        })
    }

    /// General multi-leg trade. `amounts[i] > 0` buys, `< 0` sells, one entry
    /// per outcome. `collateral_limit == 0` means unconstrained. Returns the
    /// signed net cost: positive paid, negative received.
    pub fn trade(
        &mut self,
        caller: AccountId,
        amounts: &[SignedAmount],
        collateral_limit: SignedAmount,
    ) -> Result<SignedAmount, MarketError> {
        self.atomic("trade", |market, ledger| {
            market.require_stage(Stage::Funded)?;
            if amounts.len() != market.outcome_count() {
                return Err(MarketError::AmountsLengthMismatch {
                    expected: market.outcome_count(),
                    got: amounts.len(),
                });
            }

            let quote = market.quote_trade(amounts, collateral_limit)?;
            market.settle_trade(ledger, caller, amounts, &quote)?;

            market.emit_event(EventPayload::OutcomeTokenTrade(OutcomeTokenTradeEvent {
                transactor: caller,
                outcome_token_amounts: amounts.to_vec(),
                outcome_token_net_cost: quote.outcome_token_net_cost,
                market_fees: quote.fees,
            }));

            info!(market = market.id.0, %caller, ?amounts, net_cost = quote.net_cost, fees = quote.fees, "trade");
            Ok(quote.net_cost)
        })
    }

    /// Prices a trade vector without settling it: pricing engine cost, fee
    /// on its magnitude, and the slippage check against `collateral_limit`.
    pub fn quote_trade(
        &self,
        amounts: &[SignedAmount],
        collateral_limit: SignedAmount,
    ) -> Result<TradeQuote, MarketError> {
        let outcome_token_net_cost = self.pricing.calc_net_cost(&self.view(), amounts)?;
        let fees = self.calc_market_fee(outcome_token_net_cost.unsigned_abs());
        let net_cost = to_signed(fees)
            .and_then(|fees| outcome_token_net_cost.checked_add(fees))
            .ok_or(MarketError::Overflow)?;

        if collateral_limit != 0 && net_cost > collateral_limit {
            return Err(MarketError::SlippageExceeded {
                net_cost,
                limit: collateral_limit,
            });
        }

        Ok(TradeQuote {
            outcome_token_net_cost,
            fees,
            net_cost,
        })
    }

    fn buy_impl(
        &mut self,
        ledger: &mut dyn TokenLedger,
        buyer: AccountId,
        outcome_index: usize,
        count: Amount,
        max_cost: Amount,
    ) -> Result<Amount, MarketError> {
        self.require_stage(Stage::Funded)?;
        let signed_count = to_signed(count).ok_or(MarketError::AmountOutOfRange(count))?;
        let limit = to_signed(max_cost).ok_or(MarketError::AmountOutOfRange(max_cost))?;
        if limit <= 0 {
            return Err(MarketError::NonPositiveLimit);
        }

        let amounts = self.single_leg(outcome_index, signed_count)?;
        let quote = self.quote_trade(&amounts, limit)?;
        if quote.net_cost < 0 || quote.outcome_token_net_cost < 0 {
            return Err(MarketError::CostSignMismatch {
                direction: TradeDirection::Buy,
                outcome_token_net_cost: quote.outcome_token_net_cost,
                net_cost: quote.net_cost,
            });
        }
        self.settle_trade(ledger, buyer, &amounts, &quote)?;

        let cost = quote.net_cost.unsigned_abs();
        self.emit_event(EventPayload::OutcomeTokenPurchase(OutcomeTokenPurchaseEvent {
            buyer,
            outcome_index,
            outcome_token_count: count,
            outcome_token_cost: quote.outcome_token_net_cost.unsigned_abs(),
            market_fees: quote.fees,
        }));

        info!(market = self.id.0, %buyer, outcome_index, count, cost, fees = quote.fees, "buy");
        Ok(cost)
    }

    // also the second step of a short sale, with the market itself as seller
    fn sell_impl(
        &mut self,
        ledger: &mut dyn TokenLedger,
        seller: AccountId,
        outcome_index: usize,
        count: Amount,
        min_profit: Amount,
    ) -> Result<Amount, MarketError> {
        self.require_stage(Stage::Funded)?;
        let signed_count = to_signed(count).ok_or(MarketError::AmountOutOfRange(count))?;
        let limit = to_signed(min_profit).ok_or(MarketError::AmountOutOfRange(min_profit))?;
        if limit <= 0 {
            return Err(MarketError::NonPositiveLimit);
        }

        let amounts = self.single_leg(outcome_index, -signed_count)?;
        let quote = self.quote_trade(&amounts, -limit)?;
        if quote.net_cost > 0 || quote.outcome_token_net_cost > 0 {
            return Err(MarketError::CostSignMismatch {
                direction: TradeDirection::Sell,
                outcome_token_net_cost: quote.outcome_token_net_cost,
                net_cost: quote.net_cost,
            });
        }
        self.settle_trade(ledger, seller, &amounts, &quote)?;

        let profit = quote.net_cost.unsigned_abs();
        self.emit_event(EventPayload::OutcomeTokenSale(OutcomeTokenSaleEvent {
            seller,
            outcome_index,
            outcome_token_count: count,
            outcome_token_profit: quote.outcome_token_net_cost.unsigned_abs(),
            market_fees: quote.fees,
        }));

        info!(market = self.id.0, %seller, outcome_index, count, profit, fees = quote.fees, "sell");
        Ok(profit)
    }

    fn single_leg(
        &self,
        outcome_index: usize,
        amount: SignedAmount,
    ) -> Result<Vec<SignedAmount>, MarketError> {
        self.require_outcome(outcome_index)?;
        let mut amounts = vec![0; self.outcome_count()];
        amounts[outcome_index] = amount;
        Ok(amounts)
    }

    /// Moves every leg of a priced trade. Collateral comes in and full sets are
    /// minted before outcome tokens move; sets are redeemed and proceeds paid
    /// after. Only the pre-fee cost is minted or redeemed, so the fee stays
    /// behind as collateral.
    fn settle_trade(
        &mut self,
        ledger: &mut dyn TokenLedger,
        trader: AccountId,
        amounts: &[SignedAmount],
        quote: &TradeQuote,
    ) -> Result<(), MarketError> {
        let collateral = self.registry.collateral_token();
        let address = self.address;

        if quote.outcome_token_net_cost > 0 {
            let minted = quote.outcome_token_net_cost.unsigned_abs();
            ledger.transfer_from(collateral, address, trader, address, quote.net_cost.unsigned_abs())?;
            ledger.approve(collateral, address, self.registry.address(), minted)?;
            self.registry.buy_all_outcomes(ledger, address, minted)?;
            debug!(market = self.id.0, %trader, paid = quote.net_cost, minted, "collateral in");
        }

        for (index, &amount) in amounts.iter().enumerate() {
            if amount == 0 {
                continue;
            }
            let token = self.outcome_token(index)?;
            if amount < 0 {
                ledger.transfer_from(token, address, trader, address, amount.unsigned_abs())?;
            } else {
                ledger.transfer(token, address, trader, amount.unsigned_abs())?;
            }
            self.net_outcome_tokens_sold[index] = self.net_outcome_tokens_sold[index]
                .checked_add(amount)
                .ok_or(MarketError::Overflow)?;
            debug!(market = self.id.0, %trader, index, amount, "outcome leg");
        }

        if quote.outcome_token_net_cost < 0 {
            let redeemed = quote.outcome_token_net_cost.unsigned_abs();
            self.registry.sell_all_outcomes(ledger, address, redeemed)?;
            if quote.net_cost < 0 {
                ledger.transfer(collateral, address, trader, quote.net_cost.unsigned_abs())?;
            }
            debug!(market = self.id.0, %trader, received = quote.net_cost, redeemed, "collateral out");
        }

        Ok(())
    }
}
