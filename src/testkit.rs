// shared fixture for unit tests: funded accounts, scripted pricing, one market.

use std::sync::Arc;

use crate::config::MarketConfig;
use crate::market::Market;
use crate::pricing::ScriptedPricing;
use crate::sandbox::Sandbox;
use crate::types::{AccountId, Amount};

pub const CREATOR: AccountId = AccountId(1);
pub const TRADER: AccountId = AccountId(2);

pub const STARTING_COLLATERAL: Amount = 10_000;

pub struct Harness {
    pub sandbox: Sandbox,
    pub pricing: Arc<ScriptedPricing>,
    pub market: Market,
}

impl Harness {
    pub fn new(outcome_count: usize, fee: u32) -> Self {
        let mut sandbox = Sandbox::new(outcome_count).unwrap();
        let pricing = Arc::new(ScriptedPricing::default());
        let market = sandbox
            .create_market(CREATOR, pricing.clone(), MarketConfig::with_fee(fee).unwrap())
            .unwrap();

        for account in [CREATOR, TRADER] {
            sandbox.mint_collateral(account, STARTING_COLLATERAL).unwrap();
            sandbox
                .approve_collateral(account, market.address(), STARTING_COLLATERAL)
                .unwrap();
        }

        Self {
            sandbox,
            pricing,
            market,
        }
    }

    pub fn funded(outcome_count: usize, fee: u32, funding: Amount) -> Self {
        let mut h = Self::new(outcome_count, fee);
        h.market.fund(CREATOR, funding).unwrap();
        h
    }

    pub fn collateral_balance(&self, account: AccountId) -> Amount {
        self.sandbox.collateral_balance(account)
    }

    pub fn outcome_balance(&self, index: usize, account: AccountId) -> Amount {
        self.sandbox.outcome_balance(index, account)
    }
}
