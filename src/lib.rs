// outcome-amm: prediction market maker core.
// a market is funded with collateral, sells and buys outcome tokens at prices from
// a pluggable pricing engine, and keeps a fee on every trade.
// every mutating call is all-or-nothing against the shared token ledger.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: AccountId, TokenId, Stage, Amount, SignedAmount
//   2.x  config.rs: per-market settings and validation
//   3.x  fees.rs: FeeRate, FEE_RANGE, round-down fee math
//   4.x  ledger.rs: TokenLedger trait + journaled in-memory ledger
//   5.x  registry.rs: OutcomeRegistry trait + categorical event
//   6.x  pricing.rs: PricingEngine trait + fixed/scripted engines
//   7.x  events.rs: notifications for indexers
//   8.x  market/: lifecycle, trading, settlement, fee ledger
//   9.x  factory.rs: market deployment
//   9.1  sandbox.rs: in-memory host for simulations and tests
//   10.x names.rs: player name book

// core market modules
pub mod events;
pub mod fees;
pub mod market;
pub mod types;

// collaborator seams
pub mod ledger;
pub mod pricing;
pub mod registry;

// integration modules
pub mod config;
pub mod factory;
pub mod names;
pub mod sandbox;

#[cfg(test)]
pub(crate) mod testkit;

// re exports for convenience
pub use events::*;
pub use fees::*;
pub use ledger::*;
pub use market::*;
pub use pricing::*;
pub use registry::*;
pub use types::*;
pub use config::{ConfigError, MarketConfig};
pub use factory::{MarketCreation, MarketFactory};
pub use names::{NameError, PlayerBook};
pub use sandbox::Sandbox;
