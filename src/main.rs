//! Prediction market maker simulation.
//!
//! Runs a market through its full lifecycle against the in-memory host:
//! funding, buys and sells with fees, a short sale, a multi-leg trade,
//! fee withdrawal and closing.

use outcome_amm::*;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const CREATOR: AccountId = AccountId(1);
const ALICE: AccountId = AccountId(2);
const BOB: AccountId = AccountId(3);

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("Prediction Market Maker Simulation");
    println!("Two outcomes, 2% fee, fixed-price pricing engine\n");

    if let Err(e) = run() {
        eprintln!("simulation failed: {}", e);
        std::process::exit(1);
    }

    println!("\nAll simulations completed successfully.");
}

fn run() -> Result<(), MarketError> {
    let mut sandbox = Sandbox::new(2)?;
    sandbox.factory_mut().set_block(BlockNumber(1), Timestamp::now());

    let pricing = Arc::new(FixedPricePricing::new(vec![dec!(0.6), dec!(0.4)]));
    let mut market = sandbox.create_market(CREATOR, pricing, MarketConfig::with_fee(20_000)?)?;

    for account in [CREATOR, ALICE, BOB] {
        sandbox.mint_collateral(account, 10_000)?;
        sandbox.approve_collateral(account, market.address(), 10_000)?;
    }

    scenario_1_funding(&sandbox, &mut market)?;
    scenario_2_buy_and_sell(&sandbox, &mut market)?;
    scenario_3_short_sale(&sandbox, &mut market)?;
    scenario_4_multi_leg_trade(&sandbox, &mut market)?;
    scenario_5_fees_and_close(&sandbox, &mut market)?;

    println!("\n  Events emitted: {}", market.events().len());
    Ok(())
}

/// Creator funds the market with 1,000 collateral.
fn scenario_1_funding(sandbox: &Sandbox, market: &mut Market) -> Result<(), MarketError> {
    println!("Scenario 1: Funding\n");

    market.fund(CREATOR, 1_000)?;

    println!("  Stage: {}, funding: {}", market.stage(), market.funding());
    println!(
        "  Market inventory: {} / {} outcome tokens\n",
        sandbox.outcome_balance(0, market.address()),
        sandbox.outcome_balance(1, market.address())
    );
    Ok(())
}

/// Alice buys outcome 0, then sells half of it back.
fn scenario_2_buy_and_sell(sandbox: &Sandbox, market: &mut Market) -> Result<(), MarketError> {
    println!("Scenario 2: Buy and Sell\n");

    let cost = market.buy(ALICE, 0, 100, 500)?;
    println!("  Alice buys 100 of outcome 0 for {} collateral", cost);

    sandbox.approve_outcome(0, ALICE, market.address(), 50)?;
    let profit = market.sell(ALICE, 0, 50, 1)?;
    println!("  Alice sells 50 of outcome 0 for {} collateral", profit);
    println!("  Net sold: {:?}\n", market.net_outcome_tokens_sold());
    Ok(())
}

/// Bob shorts outcome 0 by taking the other leg of 200 fresh sets.
fn scenario_3_short_sale(sandbox: &Sandbox, market: &mut Market) -> Result<(), MarketError> {
    println!("Scenario 3: Short Sale\n");

    let cost = market.short_sell(BOB, 0, 200, 1)?;
    println!("  Bob shorts 200 of outcome 0, net cost {}", cost);
    println!(
        "  Bob holds {} of outcome 1, {} collateral\n",
        sandbox.outcome_balance(1, BOB),
        sandbox.collateral_balance(BOB)
    );
    Ok(())
}

/// Alice swaps part of her outcome 0 position into outcome 1 in one trade.
fn scenario_4_multi_leg_trade(sandbox: &Sandbox, market: &mut Market) -> Result<(), MarketError> {
    println!("Scenario 4: Multi-leg Trade\n");

    sandbox.approve_outcome(0, ALICE, market.address(), 25)?;
    let quote = market.quote_trade(&[-25, 40], 0)?;
    println!(
        "  Quote: outcome cost {}, fees {}, net {}",
        quote.outcome_token_net_cost, quote.fees, quote.net_cost
    );

    let net = market.trade(ALICE, &[-25, 40], quote.net_cost.max(1))?;
    println!("  Alice trades [-25, +40], net cost {}", net);
    println!("  Net sold: {:?}\n", market.net_outcome_tokens_sold());
    Ok(())
}

/// Creator collects fees and closes the market.
fn scenario_5_fees_and_close(sandbox: &Sandbox, market: &mut Market) -> Result<(), MarketError> {
    println!("Scenario 5: Fees and Close\n");

    let fees = market.withdraw_fees(CREATOR)?;
    println!("  Creator withdraws {} collateral in fees", fees);

    let returned = market.close(CREATOR)?;
    println!("  Market closed, inventory returned to creator: {:?}", returned);
    println!(
        "  Creator holds {} collateral, {} / {} outcome tokens",
        sandbox.collateral_balance(CREATOR),
        sandbox.outcome_balance(0, CREATOR),
        sandbox.outcome_balance(1, CREATOR)
    );
    Ok(())
}
