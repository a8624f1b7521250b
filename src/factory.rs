// 9.0 factory.rs: deploys markets against a shared ledger. hands out market ids and
// ledger addresses, stamps the creation block and keeps a creation record.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::MarketConfig;
use crate::fees::FeeRate;
use crate::ledger::SharedLedger;
use crate::market::{Market, MarketDeployment, MarketError, SharedPricing, SharedRegistry};
use crate::types::{AccountId, BlockNumber, MarketId, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketCreation {
    pub market_id: MarketId,
    pub address: AccountId,
    pub creator: AccountId,
    pub fee: FeeRate,
    pub outcome_count: usize,
    pub block: BlockNumber,
}

pub struct MarketFactory {
    ledger: SharedLedger,
    next_market_id: u32,
    next_address: u64,
    current_block: BlockNumber,
    current_time: Timestamp,
    creations: Vec<MarketCreation>,
}

impl MarketFactory {
    /// Market addresses are allocated upward from `first_address`.
    pub fn new(ledger: SharedLedger, first_address: AccountId) -> Self {
        Self {
            ledger,
            next_market_id: 1,
            next_address: first_address.0,
            current_block: BlockNumber(0),
            current_time: Timestamp::from_millis(0),
            creations: Vec::new(),
        }
    }

    pub fn set_block(&mut self, block: BlockNumber, timestamp: Timestamp) {
        self.current_block = block;
        self.current_time = timestamp;
    }

    pub fn block(&self) -> BlockNumber {
        self.current_block
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    pub fn create_market(
        &mut self,
        creator: AccountId,
        registry: SharedRegistry,
        pricing: SharedPricing,
        config: MarketConfig,
    ) -> Result<Market, MarketError> {
        let deployment = MarketDeployment {
            id: MarketId(self.next_market_id),
            address: AccountId(self.next_address),
            creator,
            block: self.current_block,
            timestamp: self.current_time,
        };
        let fee = config.fee;
        let outcome_count = registry.outcome_count();

        let market = Market::new(deployment, registry, pricing, self.ledger.clone(), config)?;

        self.next_market_id += 1;
        self.next_address += 1;
        self.creations.push(MarketCreation {
            market_id: deployment.id,
            address: deployment.address,
            creator,
            fee,
            outcome_count,
            block: deployment.block,
        });

        info!(
            market = deployment.id.0,
            address = %deployment.address,
            %creator,
            %fee,
            outcome_count,
            "market created"
        );
        Ok(market)
    }

    pub fn creations(&self) -> &[MarketCreation] {
        &self.creations
    }
}
