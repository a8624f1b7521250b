// 7.0: every committed state change produces an event. used for audit trails and
// notifying indexers. the EventPayload enum lists all event types.

use serde::{Deserialize, Serialize};

use crate::types::{AccountId, Amount, BlockNumber, MarketId, SignedAmount, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub market_id: MarketId,
    pub block: BlockNumber,
    pub timestamp: Timestamp,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(
        id: EventId,
        market_id: MarketId,
        block: BlockNumber,
        timestamp: Timestamp,
        payload: EventPayload,
    ) -> Self {
        Self {
            id,
            market_id,
            block,
            timestamp,
            payload,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    // Lifecycle events
    MarketFunding(MarketFundingEvent),
    MarketClosing(MarketClosingEvent),
    FeeWithdrawal(FeeWithdrawalEvent),

    // Trade events
    OutcomeTokenPurchase(OutcomeTokenPurchaseEvent),
    OutcomeTokenSale(OutcomeTokenSaleEvent),
    OutcomeTokenShortSale(OutcomeTokenShortSaleEvent),
    OutcomeTokenTrade(OutcomeTokenTradeEvent),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketFundingEvent {
    pub creator: AccountId,
    pub funding: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketClosingEvent {
    pub creator: AccountId,
    // outcome token balances swept to the creator, by outcome index
    pub returned_outcome_tokens: Vec<Amount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeWithdrawalEvent {
    pub creator: AccountId,
    pub fees: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTokenPurchaseEvent {
    pub buyer: AccountId,
    pub outcome_index: usize,
    pub outcome_token_count: Amount,
    pub outcome_token_cost: Amount,
    pub market_fees: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTokenSaleEvent {
    pub seller: AccountId,
    pub outcome_index: usize,
    pub outcome_token_count: Amount,
    pub outcome_token_profit: Amount,
    pub market_fees: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTokenShortSaleEvent {
    pub buyer: AccountId,
    pub outcome_index: usize,
    pub outcome_token_count: Amount,
    pub cost: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTokenTradeEvent {
    pub transactor: AccountId,
    pub outcome_token_amounts: Vec<SignedAmount>,
    pub outcome_token_net_cost: SignedAmount,
    pub market_fees: Amount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_serializes_with_tag() {
        let event = Event::new(
            EventId(1),
            MarketId(1),
            BlockNumber(10),
            Timestamp::from_millis(0),
            EventPayload::MarketFunding(MarketFundingEvent {
                creator: AccountId(1),
                funding: 1_000,
            }),
        );

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["payload"]["type"], "market_funding");
        assert_eq!(json["payload"]["funding"], 1_000);

        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back.payload, event.payload);
    }
}
