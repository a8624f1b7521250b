// 8.0: market state machine. stage gating, trade orchestration, atomic settlement,
// fee ledger. one instance per market, collaborators injected at construction.

mod core;
mod fee_ledger;
mod lifecycle;
mod results;
mod trading;

pub use self::core::{Market, MarketDeployment, SharedPricing, SharedRegistry};
pub use self::results::{MarketError, TradeDirection, TradeQuote};
