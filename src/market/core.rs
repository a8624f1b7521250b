// 8.0 market/core.rs: market struct, construction, accessors and the atomic call
// boundary every mutating operation runs inside.

use std::fmt;
use std::sync::Arc;
use tracing::{error, warn};

use super::results::MarketError;
use crate::config::{ConfigError, MarketConfig};
use crate::events::{Event, EventId, EventPayload};
use crate::fees::FeeRate;
use crate::ledger::{SharedLedger, TokenLedger};
use crate::pricing::{MarketView, PricingEngine};
use crate::registry::OutcomeRegistry;
use crate::types::{AccountId, Amount, BlockNumber, MarketId, SignedAmount, Stage, Timestamp, TokenId};

pub type SharedRegistry = Arc<dyn OutcomeRegistry + Send + Sync>;
pub type SharedPricing = Arc<dyn PricingEngine + Send + Sync>;

/// Host-assigned identity and provenance of a market.
#[derive(Debug, Clone, Copy)]
pub struct MarketDeployment {
    pub id: MarketId,
    // ledger identity holding the market's collateral and inventory
    pub address: AccountId,
    pub creator: AccountId,
    pub block: BlockNumber,
    pub timestamp: Timestamp,
}

/** 8.1: one market instance. all mutable state is owned here */
pub struct Market {
    pub(super) id: MarketId,
    pub(super) address: AccountId,
    pub(super) creator: AccountId,
    pub(super) created_at_block: BlockNumber,
    pub(super) registry: SharedRegistry,
    pub(super) pricing: SharedPricing,
    pub(super) ledger: SharedLedger,
    pub(super) config: MarketConfig,
    pub(super) funding: Amount,
    pub(super) stage: Stage,
    pub(super) net_outcome_tokens_sold: Vec<SignedAmount>,
    pub(super) events: Vec<Event>,
    pub(super) pending_events: Vec<EventPayload>,
    pub(super) next_event_id: u64,
    pub(super) current_block: BlockNumber,
    pub(super) current_time: Timestamp,
}

// restored when a call aborts
struct Snapshot {
    funding: Amount,
    stage: Stage,
    net_outcome_tokens_sold: Vec<SignedAmount>,
}

impl Market {
    pub fn new(
        deployment: MarketDeployment,
        registry: SharedRegistry,
        pricing: SharedPricing,
        ledger: SharedLedger,
        config: MarketConfig,
    ) -> Result<Self, MarketError> {
        config.validate()?;
        let outcome_count = registry.outcome_count();
        if outcome_count < 2 {
            return Err(ConfigError::TooFewOutcomes {
                count: outcome_count,
            }
            .into());
        }

        Ok(Self {
            id: deployment.id,
            address: deployment.address,
            creator: deployment.creator,
            created_at_block: deployment.block,
            registry,
            pricing,
            ledger,
            config,
            funding: 0,
            stage: Stage::Created,
            net_outcome_tokens_sold: vec![0; outcome_count],
            events: Vec::new(),
            pending_events: Vec::new(),
            next_event_id: 1,
            current_block: deployment.block,
            current_time: deployment.timestamp,
        })
    }

    pub fn id(&self) -> MarketId {
        self.id
    }

    pub fn address(&self) -> AccountId {
        self.address
    }

    pub fn creator(&self) -> AccountId {
        self.creator
    }

    pub fn created_at_block(&self) -> BlockNumber {
        self.created_at_block
    }

    pub fn fee(&self) -> FeeRate {
        self.config.fee
    }

    pub fn funding(&self) -> Amount {
        self.funding
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn net_outcome_tokens_sold(&self) -> &[SignedAmount] {
        &self.net_outcome_tokens_sold
    }

    pub fn outcome_count(&self) -> usize {
        self.net_outcome_tokens_sold.len()
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    pub fn view(&self) -> MarketView<'_> {
        MarketView {
            funding: self.funding,
            net_outcome_tokens_sold: &self.net_outcome_tokens_sold,
        }
    }

    /// Advances the host context stamped on subsequent events.
    pub fn set_block(&mut self, block: BlockNumber, timestamp: Timestamp) {
        self.current_block = block;
        self.current_time = timestamp;
    }

    pub fn block(&self) -> BlockNumber {
        self.current_block
    }

    pub fn time(&self) -> Timestamp {
        self.current_time
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn recent_events(&self, count: usize) -> &[Event] {
        let start = self.events.len().saturating_sub(count);
        &self.events[start..]
    }

    pub(super) fn require_creator(&self, caller: AccountId) -> Result<(), MarketError> {
        if caller != self.creator {
            return Err(MarketError::NotCreator {
                caller,
                creator: self.creator,
            });
        }
        Ok(())
    }

    pub(super) fn require_stage(&self, expected: Stage) -> Result<(), MarketError> {
        if self.stage != expected {
            return Err(MarketError::WrongStage {
                expected,
                actual: self.stage,
            });
        }
        Ok(())
    }

    pub(super) fn require_outcome(&self, index: usize) -> Result<(), MarketError> {
        let count = self.outcome_count();
        if index >= count {
            return Err(MarketError::InvalidOutcomeIndex { index, count });
        }
        Ok(())
    }

    pub(super) fn outcome_token(&self, index: usize) -> Result<TokenId, MarketError> {
        self.registry
            .outcome_token(index)
            .ok_or(MarketError::InvalidOutcomeIndex {
                index,
                count: self.outcome_count(),
            })
    }

    /// Runs `op` as one all-or-nothing call. The ledger lock is held for the
    /// whole call, so calls on markets sharing a ledger are serialized. On
    /// error the ledger journal, market fields and buffered events are rolled
    /// back.
    pub(super) fn atomic<T>(
        &mut self,
        name: &'static str,
        op: impl FnOnce(&mut Self, &mut dyn TokenLedger) -> Result<T, MarketError>,
    ) -> Result<T, MarketError> {
        let ledger = Arc::clone(&self.ledger);
        let mut ledger = ledger.lock();
        let saved = self.snapshot();
        ledger.checkpoint();

        let outcome = op(self, &mut *ledger)
            .and_then(|value| ledger.commit().map(|()| value).map_err(MarketError::from));

        match outcome {
            Ok(value) => {
                self.flush_events();
                Ok(value)
            }
            Err(err) => {
                if let Err(journal_err) = ledger.revert() {
                    error!(market = self.id.0, %journal_err, "ledger journal out of sync");
                }
                self.restore(saved);
                warn!(market = self.id.0, call = name, error = %err, "call aborted, state rolled back");
                Err(err)
            }
        }
    }

    pub(super) fn emit_event(&mut self, payload: EventPayload) {
        self.pending_events.push(payload);
    }

    fn flush_events(&mut self) {
        for payload in std::mem::take(&mut self.pending_events) {
            let event = Event::new(
                EventId(self.next_event_id),
                self.id,
                self.current_block,
                self.current_time,
                payload,
            );
            self.next_event_id += 1;
            self.events.push(event);
        }

        if self.events.len() > self.config.max_events {
            let drain_count = self.events.len() - self.config.max_events;
            self.events.drain(0..drain_count);
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            funding: self.funding,
            stage: self.stage,
            net_outcome_tokens_sold: self.net_outcome_tokens_sold.clone(),
        }
    }

    fn restore(&mut self, saved: Snapshot) {
        self.funding = saved.funding;
        self.stage = saved.stage;
        self.net_outcome_tokens_sold = saved.net_outcome_tokens_sold;
        self.pending_events.clear();
    }
}

impl fmt::Debug for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Market")
            .field("id", &self.id)
            .field("address", &self.address)
            .field("creator", &self.creator)
            .field("created_at_block", &self.created_at_block)
            .field("fee", &self.config.fee)
            .field("funding", &self.funding)
            .field("stage", &self.stage)
            .field("net_outcome_tokens_sold", &self.net_outcome_tokens_sold)
            .finish_non_exhaustive()
    }
}
