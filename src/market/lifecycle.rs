//! Funding and closing. Creator only, forward stage transitions.

use tracing::info;

use super::core::Market;
use super::results::MarketError;
use crate::events::{EventPayload, MarketClosingEvent, MarketFundingEvent};
use crate::types::{AccountId, Amount, Stage};

impl Market {
    /// Pulls `funding` collateral from the creator and turns it into full
    /// outcome sets held by the market. Created → Funded.
    pub fn fund(&mut self, caller: AccountId, funding: Amount) -> Result<(), MarketError> {
        self.atomic("fund", |market, ledger| {
            market.require_creator(caller)?;
            market.require_stage(Stage::Created)?;

            let collateral = market.registry.collateral_token();
            ledger.transfer_from(collateral, market.address, caller, market.address, funding)?;
            ledger.approve(collateral, market.address, market.registry.address(), funding)?;
            market.registry.buy_all_outcomes(ledger, market.address, funding)?;

            market.funding = funding;
            market.stage = Stage::Funded;
            market.emit_event(EventPayload::MarketFunding(MarketFundingEvent {
                creator: caller,
                funding,
            }));

            info!(market = market.id.0, funding, "market funded");
            Ok(())
        })
    }

    /// Sweeps every outcome token the market holds to the creator. Funded → Closed.
    /// Returns the swept amounts by outcome index.
    pub fn close(&mut self, caller: AccountId) -> Result<Vec<Amount>, MarketError> {
        self.atomic("close", |market, ledger| {
            market.require_creator(caller)?;
            market.require_stage(Stage::Funded)?;

            let mut returned = Vec::with_capacity(market.outcome_count());
            for index in 0..market.outcome_count() {
                let token = market.outcome_token(index)?;
                let balance = ledger.balance_of(token, market.address);
                ledger.transfer(token, market.address, market.creator, balance)?;
                returned.push(balance);
            }

            market.stage = Stage::Closed;
            market.emit_event(EventPayload::MarketClosing(MarketClosingEvent {
                creator: caller,
                returned_outcome_tokens: returned.clone(),
            }));

            info!(market = market.id.0, ?returned, "market closed");
            Ok(returned)
        })
    }
}
