//! Market fee computation and withdrawal.

use tracing::info;

use super::core::Market;
use super::results::MarketError;
use crate::events::{EventPayload, FeeWithdrawalEvent};
use crate::types::{AccountId, Amount};

impl Market {
    /// Fee charged on a trade whose pre-fee cost has magnitude `cost`.
    /// Rounds down.
    pub fn calc_market_fee(&self, cost: Amount) -> Amount {
        self.config.fee.apply(cost)
    }

    /// Collateral currently held by the market. Trade principal is always
    /// converted into outcome sets or paid out, so this is the fee revenue
    /// not yet withdrawn.
    pub fn accrued_fees(&self) -> Amount {
        let collateral = self.registry.collateral_token();
        self.ledger.lock().balance_of(collateral, self.address)
    }

    /// Sends the market's whole collateral balance to the creator. Allowed in
    /// any stage.
    pub fn withdraw_fees(&mut self, caller: AccountId) -> Result<Amount, MarketError> {
        self.atomic("withdraw_fees", |market, ledger| {
            market.require_creator(caller)?;

            let collateral = market.registry.collateral_token();
            let fees = ledger.balance_of(collateral, market.address);
            ledger.transfer(collateral, market.address, market.creator, fees)?;

            market.emit_event(EventPayload::FeeWithdrawal(FeeWithdrawalEvent {
                creator: caller,
                fees,
            }));

            info!(market = market.id.0, fees, "fees withdrawn");
            Ok(fees)
        })
    }
}
