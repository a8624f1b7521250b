// 5.0 registry.rs: outcome registry for one categorical event. knows the outcome
// tokens, mints full sets against collateral and redeems them back 1:1.

use crate::ledger::{LedgerError, TokenLedger};
use crate::types::{AccountId, Amount, TokenId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Event needs at least 2 outcomes, got {0}")]
    TooFewOutcomes(usize),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// The event side of a market: outcome tokens and full-set issuance.
pub trait OutcomeRegistry {
    /// Ledger identity that holds the collateral backing issued sets.
    fn address(&self) -> AccountId;

    fn collateral_token(&self) -> TokenId;

    fn outcome_count(&self) -> usize;

    fn outcome_token(&self, index: usize) -> Option<TokenId>;

    /// Pulls `amount` collateral from `buyer` (pre-approved to `address()`)
    /// and mints `amount` of every outcome token to `buyer`.
    fn buy_all_outcomes(
        &self,
        ledger: &mut dyn TokenLedger,
        buyer: AccountId,
        amount: Amount,
    ) -> Result<(), RegistryError>;

    /// Burns `amount` of every outcome token held by `seller` and pays out
    /// `amount` collateral.
    fn sell_all_outcomes(
        &self,
        ledger: &mut dyn TokenLedger,
        seller: AccountId,
        amount: Amount,
    ) -> Result<(), RegistryError>;
}

#[derive(Debug, Clone)]
pub struct CategoricalEvent {
    address: AccountId,
    collateral: TokenId,
    outcome_tokens: Vec<TokenId>,
}

impl CategoricalEvent {
    /// Creates the event and registers one ledger token per outcome.
    pub fn new(
        ledger: &mut dyn TokenLedger,
        address: AccountId,
        collateral: TokenId,
        outcome_count: usize,
    ) -> Result<Self, RegistryError> {
        if outcome_count < 2 {
            return Err(RegistryError::TooFewOutcomes(outcome_count));
        }
        let outcome_tokens = (0..outcome_count).map(|_| ledger.create_token()).collect();
        Ok(Self {
            address,
            collateral,
            outcome_tokens,
        })
    }

    pub fn outcome_tokens(&self) -> &[TokenId] {
        &self.outcome_tokens
    }
}

impl OutcomeRegistry for CategoricalEvent {
    fn address(&self) -> AccountId {
        self.address
    }

    fn collateral_token(&self) -> TokenId {
        self.collateral
    }

    fn outcome_count(&self) -> usize {
        self.outcome_tokens.len()
    }

    fn outcome_token(&self, index: usize) -> Option<TokenId> {
        self.outcome_tokens.get(index).copied()
    }

    fn buy_all_outcomes(
        &self,
        ledger: &mut dyn TokenLedger,
        buyer: AccountId,
        amount: Amount,
    ) -> Result<(), RegistryError> {
        ledger.transfer_from(self.collateral, self.address, buyer, self.address, amount)?;
        for &token in &self.outcome_tokens {
            ledger.mint(token, buyer, amount)?;
        }
        Ok(())
    }

    fn sell_all_outcomes(
        &self,
        ledger: &mut dyn TokenLedger,
        seller: AccountId,
        amount: Amount,
    ) -> Result<(), RegistryError> {
        for &token in &self.outcome_tokens {
            ledger.burn(token, seller, amount)?;
        }
        ledger.transfer(self.collateral, self.address, seller, amount)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryLedger;

    const EVENT: AccountId = AccountId(50);
    const TRADER: AccountId = AccountId(1);

    fn setup(outcomes: usize) -> (InMemoryLedger, CategoricalEvent) {
        let mut ledger = InMemoryLedger::new();
        let collateral = ledger.create_token();
        ledger.mint(collateral, TRADER, 1_000).unwrap();
        let event = CategoricalEvent::new(&mut ledger, EVENT, collateral, outcomes).unwrap();
        (ledger, event)
    }

    #[test]
    fn rejects_single_outcome() {
        let mut ledger = InMemoryLedger::new();
        let collateral = ledger.create_token();
        let result = CategoricalEvent::new(&mut ledger, EVENT, collateral, 1);
        assert_eq!(result.err(), Some(RegistryError::TooFewOutcomes(1)));
    }

    #[test]
    fn buy_all_mints_full_set() {
        let (mut ledger, event) = setup(3);
        ledger.approve(event.collateral_token(), TRADER, EVENT, 400).unwrap();
        event.buy_all_outcomes(&mut ledger, TRADER, 400).unwrap();

        assert_eq!(ledger.balance_of(event.collateral_token(), TRADER), 600);
        assert_eq!(ledger.balance_of(event.collateral_token(), EVENT), 400);
        for &token in event.outcome_tokens() {
            assert_eq!(ledger.balance_of(token, TRADER), 400);
            assert_eq!(ledger.total_supply(token), 400);
        }
    }

    #[test]
    fn buy_all_requires_allowance() {
        let (mut ledger, event) = setup(2);
        let result = event.buy_all_outcomes(&mut ledger, TRADER, 10);
        assert!(matches!(
            result,
            Err(RegistryError::Ledger(LedgerError::InsufficientAllowance { .. }))
        ));
    }

    #[test]
    fn sell_all_redeems_collateral() {
        let (mut ledger, event) = setup(2);
        ledger.approve(event.collateral_token(), TRADER, EVENT, 400).unwrap();
        event.buy_all_outcomes(&mut ledger, TRADER, 400).unwrap();
        event.sell_all_outcomes(&mut ledger, TRADER, 150).unwrap();

        assert_eq!(ledger.balance_of(event.collateral_token(), TRADER), 750);
        assert_eq!(ledger.balance_of(event.outcome_tokens()[0], TRADER), 250);
        assert_eq!(ledger.total_supply(event.outcome_tokens()[1]), 250);
    }

    #[test]
    fn sell_all_needs_every_leg() {
        let (mut ledger, event) = setup(2);
        ledger.approve(event.collateral_token(), TRADER, EVENT, 100).unwrap();
        event.buy_all_outcomes(&mut ledger, TRADER, 100).unwrap();
        let outcome_one = event.outcome_tokens()[1];
        ledger.transfer(outcome_one, TRADER, AccountId(9), 100).unwrap();

        assert!(event.sell_all_outcomes(&mut ledger, TRADER, 1).is_err());
    }
}
