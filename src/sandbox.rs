// 9.1 sandbox.rs: self-contained in-memory host. one ledger, one collateral token,
// one categorical event and a factory, wired together for simulations and tests.

use std::sync::Arc;

use crate::config::MarketConfig;
use crate::factory::MarketFactory;
use crate::ledger::{InMemoryLedger, LedgerError, SharedLedger, TokenLedger};
use crate::market::{Market, MarketError, SharedPricing};
use crate::registry::{CategoricalEvent, OutcomeRegistry, RegistryError};
use crate::types::{AccountId, Amount, TokenId};

pub const EVENT_ADDRESS: AccountId = AccountId(900);
pub const FIRST_MARKET_ADDRESS: AccountId = AccountId(1_000);

pub struct Sandbox {
    ledger: SharedLedger,
    collateral: TokenId,
    event: Arc<CategoricalEvent>,
    factory: MarketFactory,
}

impl Sandbox {
    pub fn new(outcome_count: usize) -> Result<Self, RegistryError> {
        let mut ledger = InMemoryLedger::new();
        let collateral = ledger.create_token();
        let event = CategoricalEvent::new(&mut ledger, EVENT_ADDRESS, collateral, outcome_count)?;
        let ledger = ledger.shared();
        let factory = MarketFactory::new(ledger.clone(), FIRST_MARKET_ADDRESS);

        Ok(Self {
            ledger,
            collateral,
            event: Arc::new(event),
            factory,
        })
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    pub fn collateral(&self) -> TokenId {
        self.collateral
    }

    pub fn event(&self) -> &CategoricalEvent {
        &self.event
    }

    pub fn factory(&self) -> &MarketFactory {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut MarketFactory {
        &mut self.factory
    }

    pub fn create_market(
        &mut self,
        creator: AccountId,
        pricing: SharedPricing,
        config: MarketConfig,
    ) -> Result<Market, MarketError> {
        let registry = self.event.clone();
        self.factory.create_market(creator, registry, pricing, config)
    }

    pub fn mint_collateral(&self, to: AccountId, amount: Amount) -> Result<(), LedgerError> {
        self.ledger.lock().mint(self.collateral, to, amount)
    }

    pub fn approve_collateral(
        &self,
        owner: AccountId,
        spender: AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.ledger.lock().approve(self.collateral, owner, spender, amount)
    }

    pub fn approve_outcome(
        &self,
        index: usize,
        owner: AccountId,
        spender: AccountId,
        amount: Amount,
    ) -> Result<(), MarketError> {
        let token = self
            .event
            .outcome_token(index)
            .ok_or(MarketError::InvalidOutcomeIndex {
                index,
                count: self.event.outcome_count(),
            })?;
        self.ledger.lock().approve(token, owner, spender, amount)?;
        Ok(())
    }

    pub fn collateral_balance(&self, account: AccountId) -> Amount {
        self.ledger.lock().balance_of(self.collateral, account)
    }

    /// Zero for an index the event does not have.
    pub fn outcome_balance(&self, index: usize, account: AccountId) -> Amount {
        match self.event.outcome_token(index) {
            Some(token) => self.ledger.lock().balance_of(token, account),
            None => 0,
        }
    }

    /// Collateral locked in the event backing issued outcome sets.
    pub fn event_collateral(&self) -> Amount {
        self.collateral_balance(self.event.address())
    }
}
