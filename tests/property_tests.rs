//! Property-based tests for the market maker.
//!
//! Checks that net outcome tokens sold tracks exactly what was traded, that
//! outcome sets stay fully backed by collateral, that fees round down and
//! that failed or unauthorized calls change nothing.

use outcome_amm::*;
use proptest::prelude::*;
use std::sync::Arc;

const CREATOR: AccountId = AccountId(1);
const TRADER: AccountId = AccountId(2);
const START: Amount = 1_000_000;

fn setup(outcomes: usize, fee: u32) -> (Sandbox, Market) {
    let mut sandbox = Sandbox::new(outcomes).unwrap();
    let mut market = sandbox
        .create_market(
            CREATOR,
            Arc::new(FixedPricePricing::uniform(outcomes)),
            MarketConfig::with_fee(fee).unwrap(),
        )
        .unwrap();

    for account in [CREATOR, TRADER] {
        sandbox.mint_collateral(account, START).unwrap();
        sandbox.approve_collateral(account, market.address(), START).unwrap();
    }
    for index in 0..outcomes {
        sandbox.approve_outcome(index, TRADER, market.address(), START).unwrap();
    }
    market.fund(CREATOR, 10_000).unwrap();
    (sandbox, market)
}

fn assert_sets_backed(sandbox: &Sandbox) {
    let locked = sandbox.event_collateral();
    let ledger = sandbox.ledger().lock();
    for &token in sandbox.event().outcome_tokens() {
        assert_eq!(ledger.total_supply(token), locked);
    }
}

fn trade_vector(outcomes: usize) -> impl Strategy<Value = Vec<SignedAmount>> {
    prop::collection::vec(-200i128..400, outcomes)
}

proptest! {
    #[test]
    fn fee_rounds_down_and_is_monotonic(
        fee in 0u32..FEE_RANGE,
        a in 0u128..1_000_000_000_000,
        b in 0u128..1_000_000_000_000,
    ) {
        let rate = FeeRate::new(fee).unwrap();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

        prop_assert!(rate.apply(lo) <= rate.apply(hi));
        prop_assert!(rate.apply(hi) <= hi);
        prop_assert_eq!(rate.apply(hi), hi * fee as u128 / FEE_RANGE as u128);
    }

    #[test]
    fn net_sold_tracks_successful_trades(
        outcomes in 2usize..5,
        fee in prop::sample::select(vec![0u32, 20_000, 150_000]),
        seeds in prop::collection::vec(trade_vector(4), 1..20),
    ) {
        let (sandbox, mut market) = setup(outcomes, fee);
        let mut expected = vec![0i128; outcomes];

        for seed in seeds {
            let amounts = &seed[..outcomes];
            let before = market.net_outcome_tokens_sold().to_vec();
            let balance_before = sandbox.collateral_balance(TRADER);

            match market.trade(TRADER, amounts, 0) {
                Ok(net) => {
                    for (slot, amount) in expected.iter_mut().zip(amounts) {
                        *slot += amount;
                    }
                    let balance_after = sandbox.collateral_balance(TRADER);
                    prop_assert_eq!(balance_before as i128 - net, balance_after as i128);
                }
                Err(_) => {
                    prop_assert_eq!(market.net_outcome_tokens_sold(), &before[..]);
                    prop_assert_eq!(sandbox.collateral_balance(TRADER), balance_before);
                }
            }
            prop_assert_eq!(market.net_outcome_tokens_sold(), &expected[..]);
            assert_sets_backed(&sandbox);
        }
    }

    #[test]
    fn buy_then_sell_never_profits(
        outcome in 0usize..3,
        count in 6u128..5_000,
        fee in 0u32..100_000,
    ) {
        let (sandbox, mut market) = setup(3, fee);

        let paid = market.buy(TRADER, outcome, count, START).unwrap();
        let received = market.sell(TRADER, outcome, count, 1).unwrap();

        prop_assert!(received <= paid);
        prop_assert_eq!(sandbox.collateral_balance(TRADER), START - paid + received);
        // rounding leftovers stay with the market as outcome tokens
        prop_assert!(market.accrued_fees() <= paid - received);
        prop_assert!(market.net_outcome_tokens_sold().iter().all(|&n| n == 0));
    }

    #[test]
    fn short_sale_cost_bounded_by_count(
        outcome in 0usize..2,
        count in 2u128..5_000,
        fee in 0u32..100_000,
    ) {
        let (sandbox, mut market) = setup(2, fee);

        let cost = market.short_sell(TRADER, outcome, count, 1).unwrap();

        prop_assert!(cost <= count);
        prop_assert_eq!(sandbox.collateral_balance(TRADER), START - cost);
        prop_assert_eq!(sandbox.outcome_balance(1 - outcome, TRADER), count);
        prop_assert_eq!(sandbox.outcome_balance(outcome, TRADER), 0);
        assert_sets_backed(&sandbox);
    }

    #[test]
    fn outsiders_change_nothing(
        caller in 3u64..1_000,
        funding in 1u128..50_000,
    ) {
        let (sandbox, mut market) = setup(2, 20_000);
        market.buy(TRADER, 0, 100, START).unwrap();
        let outsider = AccountId(caller);

        let fees = market.accrued_fees();
        let events = market.events().len();

        prop_assert!(market.fund(outsider, funding).is_err());
        prop_assert!(market.withdraw_fees(outsider).is_err());
        prop_assert!(market.close(outsider).is_err());

        prop_assert_eq!(market.stage(), Stage::Funded);
        prop_assert_eq!(market.accrued_fees(), fees);
        prop_assert_eq!(market.events().len(), events);
        prop_assert_eq!(sandbox.outcome_balance(0, CREATOR), 0);
    }

    #[test]
    fn stage_only_moves_forward(ops in prop::collection::vec(0u8..4, 1..12)) {
        let mut sandbox = Sandbox::new(2).unwrap();
        let mut market = sandbox
            .create_market(CREATOR, Arc::new(FixedPricePricing::uniform(2)), MarketConfig::default())
            .unwrap();
        sandbox.mint_collateral(CREATOR, START).unwrap();
        sandbox.approve_collateral(CREATOR, market.address(), START).unwrap();

        let mut stage = market.stage();
        for op in ops {
            let _ = match op {
                0 => market.fund(CREATOR, 100).map(|_| ()),
                1 => market.close(CREATOR).map(|_| ()),
                2 => market.withdraw_fees(CREATOR).map(|_| ()),
                _ => market.buy(CREATOR, 0, 10, 100).map(|_| ()),
            };
            prop_assert!(market.stage() >= stage);
            stage = market.stage();
        }
    }
}
