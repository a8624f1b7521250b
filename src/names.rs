// 10.0 names.rs: player name book. unique, normalised display names per player.
// unrelated to market accounting; kept small.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::AccountId;

pub const MAX_NAME_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("Name must be 1 to {} characters", MAX_NAME_LEN)]
    InvalidLength,

    #[error("Name may only contain a-z, 0-9 and single inner spaces")]
    InvalidCharacters,

    #[error("Name cannot be only digits")]
    AllDigits,

    #[error("Name {name:?} already owned by {owner}")]
    Taken { name: String, owner: AccountId },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub names: Vec<String>,
    pub active: Option<String>,
}

#[derive(Debug, Default)]
pub struct PlayerBook {
    owners: HashMap<String, AccountId>,
    players: HashMap<AccountId, PlayerRecord>,
}

impl PlayerBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `name` for `player` and makes it their active name. Re-registering
    /// a name the player already owns just reactivates it.
    pub fn register_name(&mut self, player: AccountId, name: &str) -> Result<String, NameError> {
        let name = normalize_name(name)?;

        match self.owners.get(&name).copied() {
            Some(owner) if owner != player => {
                return Err(NameError::Taken { name, owner });
            }
            Some(_) => {}
            None => {
                self.owners.insert(name.clone(), player);
                self.players
                    .entry(player)
                    .or_default()
                    .names
                    .push(name.clone());
            }
        }

        self.players.entry(player).or_default().active = Some(name.clone());
        Ok(name)
    }

    pub fn owner_of(&self, name: &str) -> Option<AccountId> {
        let name = normalize_name(name).ok()?;
        self.owners.get(&name).copied()
    }

    pub fn active_name(&self, player: AccountId) -> Option<&str> {
        self.players.get(&player)?.active.as_deref()
    }

    pub fn player(&self, player: AccountId) -> Option<&PlayerRecord> {
        self.players.get(&player)
    }
}

/// Trims, lowercases and validates a display name.
pub fn normalize_name(raw: &str) -> Result<String, NameError> {
    let name = raw.trim().to_lowercase();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(NameError::InvalidLength);
    }
    if !name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' ') {
        return Err(NameError::InvalidCharacters);
    }
    if name.contains("  ") {
        return Err(NameError::InvalidCharacters);
    }
    if name.chars().all(|c| c.is_ascii_digit()) {
        return Err(NameError::AllDigits);
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: AccountId = AccountId(1);
    const BOB: AccountId = AccountId(2);

    #[test]
    fn register_normalises() {
        let mut book = PlayerBook::new();
        let name = book.register_name(ALICE, "  Alice 99 ").unwrap();
        assert_eq!(name, "alice 99");
        assert_eq!(book.owner_of("ALICE 99"), Some(ALICE));
        assert_eq!(book.active_name(ALICE), Some("alice 99"));
    }

    #[test]
    fn names_are_unique() {
        let mut book = PlayerBook::new();
        book.register_name(ALICE, "whale").unwrap();
        let result = book.register_name(BOB, "Whale");
        assert_eq!(
            result,
            Err(NameError::Taken { name: "whale".to_string(), owner: ALICE })
        );
        assert!(book.player(BOB).is_none());
    }

    #[test]
    fn latest_name_is_active() {
        let mut book = PlayerBook::new();
        book.register_name(ALICE, "first").unwrap();
        book.register_name(ALICE, "second").unwrap();
        assert_eq!(book.active_name(ALICE), Some("second"));

        book.register_name(ALICE, "first").unwrap();
        assert_eq!(book.active_name(ALICE), Some("first"));
        assert_eq!(book.player(ALICE).unwrap().names.len(), 2);
    }

    #[test]
    fn rejects_bad_names() {
        assert_eq!(normalize_name("   "), Err(NameError::InvalidLength));
        assert_eq!(normalize_name(&"a".repeat(33)), Err(NameError::InvalidLength));
        assert_eq!(normalize_name("no-dash"), Err(NameError::InvalidCharacters));
        assert_eq!(normalize_name("two  spaces"), Err(NameError::InvalidCharacters));
        assert_eq!(normalize_name("12345"), Err(NameError::AllDigits));
    }
}
