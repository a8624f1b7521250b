// 4.0 ledger.rs: fungible token ledger. collateral and every outcome token live here,
// keyed by TokenId. the in-memory ledger journals state so a failed market call
// can be rolled back as a unit.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::types::{AccountId, Amount, TokenId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("Unknown token {0}")]
    UnknownToken(TokenId),

    #[error("Insufficient {token} balance for {account}: available {available}, requested {requested}")]
    InsufficientBalance {
        token: TokenId,
        account: AccountId,
        available: Amount,
        requested: Amount,
    },

    #[error("Insufficient {token} allowance from {owner} to {spender}: available {available}, requested {requested}")]
    InsufficientAllowance {
        token: TokenId,
        owner: AccountId,
        spender: AccountId,
        available: Amount,
        requested: Amount,
    },

    #[error("Supply overflow on {0}")]
    SupplyOverflow(TokenId),

    #[error("No open checkpoint")]
    NoCheckpoint,
}

/// Ledger operations a market consumes. `spender` on `transfer_from` is the
/// identity spending the allowance, `owner` on `approve` the identity granting it.
pub trait TokenLedger {
    /// Registers a new token with zero supply.
    fn create_token(&mut self) -> TokenId;

    fn balance_of(&self, token: TokenId, account: AccountId) -> Amount;

    fn allowance(&self, token: TokenId, owner: AccountId, spender: AccountId) -> Amount;

    fn total_supply(&self, token: TokenId) -> Amount;

    fn transfer(
        &mut self,
        token: TokenId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError>;

    fn transfer_from(
        &mut self,
        token: TokenId,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError>;

    fn approve(
        &mut self,
        token: TokenId,
        owner: AccountId,
        spender: AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError>;

    // issuance hooks for the outcome registry
    fn mint(&mut self, token: TokenId, to: AccountId, amount: Amount) -> Result<(), LedgerError>;

    fn burn(&mut self, token: TokenId, from: AccountId, amount: Amount) -> Result<(), LedgerError>;

    /// Opens a nested journal frame.
    fn checkpoint(&mut self);

    /// Keeps every change since the matching `checkpoint`.
    fn commit(&mut self) -> Result<(), LedgerError>;

    /// Discards every change since the matching `checkpoint`.
    fn revert(&mut self) -> Result<(), LedgerError>;
}

/// Ledger handle shared between markets. Holding the lock serializes calls.
pub type SharedLedger = Arc<Mutex<dyn TokenLedger + Send>>;

#[derive(Debug, Clone, Default)]
struct LedgerState {
    balances: HashMap<(TokenId, AccountId), Amount>,
    allowances: HashMap<(TokenId, AccountId, AccountId), Amount>,
    supply: HashMap<TokenId, Amount>,
}

// prior value of one touched key, replayed in reverse on revert
#[derive(Debug, Clone)]
enum Undo {
    Balance((TokenId, AccountId), Option<Amount>),
    Allowance((TokenId, AccountId, AccountId), Option<Amount>),
    Supply(TokenId, Option<Amount>),
}

/// Ledger backed by hash maps. Each open checkpoint keeps an undo log of the
/// keys written since it was opened, so a checkpoint costs nothing up front and
/// a revert is proportional to the call's own writes.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: LedgerState,
    journal: Vec<Vec<Undo>>,
    next_token: u32,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedLedger {
        Arc::new(Mutex::new(self))
    }

    pub fn token_count(&self) -> usize {
        self.state.supply.len()
    }

    pub fn checkpoint_depth(&self) -> usize {
        self.journal.len()
    }

    /// Undo entries recorded in the innermost open checkpoint.
    pub fn pending_writes(&self) -> usize {
        self.journal.last().map_or(0, Vec::len)
    }

    fn ensure_token(&self, token: TokenId) -> Result<(), LedgerError> {
        if self.state.supply.contains_key(&token) {
            Ok(())
        } else {
            Err(LedgerError::UnknownToken(token))
        }
    }

    fn record(&mut self, undo: Undo) {
        if let Some(frame) = self.journal.last_mut() {
            frame.push(undo);
        }
    }

    fn set_balance(&mut self, token: TokenId, account: AccountId, amount: Amount) {
        let key = (token, account);
        let prior = self.state.balances.insert(key, amount);
        self.record(Undo::Balance(key, prior));
    }

    fn set_allowance(&mut self, token: TokenId, owner: AccountId, spender: AccountId, amount: Amount) {
        let key = (token, owner, spender);
        let prior = self.state.allowances.insert(key, amount);
        self.record(Undo::Allowance(key, prior));
    }

    fn set_supply(&mut self, token: TokenId, amount: Amount) {
        let prior = self.state.supply.insert(token, amount);
        self.record(Undo::Supply(token, prior));
    }

    fn undo(&mut self, undo: Undo) {
        match undo {
            Undo::Balance(key, Some(prior)) => {
                self.state.balances.insert(key, prior);
            }
            Undo::Balance(key, None) => {
                self.state.balances.remove(&key);
            }
            Undo::Allowance(key, Some(prior)) => {
                self.state.allowances.insert(key, prior);
            }
            Undo::Allowance(key, None) => {
                self.state.allowances.remove(&key);
            }
            Undo::Supply(token, Some(prior)) => {
                self.state.supply.insert(token, prior);
            }
            Undo::Supply(token, None) => {
                self.state.supply.remove(&token);
            }
        }
    }

    fn debit(&mut self, token: TokenId, account: AccountId, amount: Amount) -> Result<(), LedgerError> {
        let available = self.balance_of(token, account);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                token,
                account,
                available,
                requested: amount,
            });
        }
        self.set_balance(token, account, available - amount);
        Ok(())
    }

    // credit cannot overflow: every balance is bounded by total supply
    fn credit(&mut self, token: TokenId, account: AccountId, amount: Amount) {
        let balance = self.balance_of(token, account);
        self.set_balance(token, account, balance + amount);
    }
}

impl TokenLedger for InMemoryLedger {
    fn create_token(&mut self) -> TokenId {
        let id = TokenId(self.next_token);
        self.next_token += 1;
        self.set_supply(id, 0);
        id
    }

    fn balance_of(&self, token: TokenId, account: AccountId) -> Amount {
        self.state.balances.get(&(token, account)).copied().unwrap_or(0)
    }

    fn allowance(&self, token: TokenId, owner: AccountId, spender: AccountId) -> Amount {
        self.state
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or(0)
    }

    fn total_supply(&self, token: TokenId) -> Amount {
        self.state.supply.get(&token).copied().unwrap_or(0)
    }

    fn transfer(
        &mut self,
        token: TokenId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.ensure_token(token)?;
        self.debit(token, from, amount)?;
        self.credit(token, to, amount);
        Ok(())
    }

    fn transfer_from(
        &mut self,
        token: TokenId,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.ensure_token(token)?;
        let available = self.allowance(token, from, spender);
        if available < amount {
            return Err(LedgerError::InsufficientAllowance {
                token,
                owner: from,
                spender,
                available,
                requested: amount,
            });
        }
        self.debit(token, from, amount)?;
        self.credit(token, to, amount);
        self.set_allowance(token, from, spender, available - amount);
        Ok(())
    }

    fn approve(
        &mut self,
        token: TokenId,
        owner: AccountId,
        spender: AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.ensure_token(token)?;
        self.set_allowance(token, owner, spender, amount);
        Ok(())
    }

    fn mint(&mut self, token: TokenId, to: AccountId, amount: Amount) -> Result<(), LedgerError> {
        self.ensure_token(token)?;
        let new_supply = self
            .total_supply(token)
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow(token))?;
        self.set_supply(token, new_supply);
        self.credit(token, to, amount);
        Ok(())
    }

    fn burn(&mut self, token: TokenId, from: AccountId, amount: Amount) -> Result<(), LedgerError> {
        self.ensure_token(token)?;
        self.debit(token, from, amount)?;
        let supply = self.total_supply(token);
        self.set_supply(token, supply - amount);
        Ok(())
    }

    fn checkpoint(&mut self) {
        self.journal.push(Vec::new());
    }

    // an inner frame's writes fold into its parent so an outer revert still undoes them
    fn commit(&mut self) -> Result<(), LedgerError> {
        let frame = self.journal.pop().ok_or(LedgerError::NoCheckpoint)?;
        if let Some(parent) = self.journal.last_mut() {
            parent.extend(frame);
        }
        Ok(())
    }

    fn revert(&mut self) -> Result<(), LedgerError> {
        let frame = self.journal.pop().ok_or(LedgerError::NoCheckpoint)?;
        for undo in frame.into_iter().rev() {
            self.undo(undo);
        }
        Ok(())
    }
}
