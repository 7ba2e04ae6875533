//! Card registry.
//!
//! Each card lives at `users/{owner}/cards/{card}`; each owner also has an
//! index document listing the card ids they hold. Moving a card between
//! owners is a `remove` + `insert` in the same transaction, so no committed
//! state ever shows it under two owners or none.

use std::collections::BTreeSet;

use matchday_ledger::{DocKey, Transaction, TxnRunner};
use matchday_types::{Card, CardId, MatchdayError, Result, UserId};
use serde::{Deserialize, Serialize};

/// Ids of the cards one user holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardIndex {
    pub card_ids: BTreeSet<CardId>,
}

/// Owner-keyed card storage.
pub struct CardRegistry;

impl CardRegistry {
    pub fn index(txn: &mut Transaction<'_>, owner: UserId) -> Result<CardIndex> {
        Ok(txn
            .read::<CardIndex>(&DocKey::card_index(owner))?
            .unwrap_or_default())
    }

    /// Register `card` under `card.owner_id`.
    ///
    /// # Errors
    /// `Internal` if the owner already holds a card with this id.
    pub fn insert(txn: &mut Transaction<'_>, card: &Card) -> Result<()> {
        let owner = card.owner_id;
        txn.create(&DocKey::card(owner, card.id), card)?;
        let mut index = Self::index(txn, owner)?;
        index.card_ids.insert(card.id);
        txn.write(&DocKey::card_index(owner), &index)
    }

    /// # Errors
    /// Returns `CardNotFound` if `owner` does not hold `card_id`.
    pub fn get(txn: &mut Transaction<'_>, owner: UserId, card_id: CardId) -> Result<Card> {
        txn.read(&DocKey::card(owner, card_id))?
            .ok_or(MatchdayError::CardNotFound(card_id))
    }

    /// Delete `card_id` from `owner`'s registry and return it.
    ///
    /// # Errors
    /// Returns `CardNotFound` if `owner` does not hold `card_id`.
    pub fn remove(txn: &mut Transaction<'_>, owner: UserId, card_id: CardId) -> Result<Card> {
        let card = Self::get(txn, owner, card_id)?;
        txn.delete(&DocKey::card(owner, card_id));
        let mut index = Self::index(txn, owner)?;
        index.card_ids.remove(&card_id);
        txn.write(&DocKey::card_index(owner), &index)?;
        Ok(card)
    }

    pub fn set_locked(
        txn: &mut Transaction<'_>,
        owner: UserId,
        card_id: CardId,
        locked: bool,
    ) -> Result<Card> {
        let mut card = Self::get(txn, owner, card_id)?;
        card.is_locked = locked;
        txn.write(&DocKey::card(owner, card_id), &card)?;
        Ok(card)
    }

    /// Every card `owner` holds, in id order.
    pub fn owned(txn: &mut Transaction<'_>, owner: UserId) -> Result<Vec<Card>> {
        let index = Self::index(txn, owner)?;
        index
            .card_ids
            .iter()
            .map(|id| Self::get(txn, owner, *id))
            .collect()
    }

    /// A card can go into a lineup if it exists, belongs to `owner`, and is unlocked.
    pub fn is_card_available(
        txn: &mut Transaction<'_>,
        owner: UserId,
        card_id: CardId,
    ) -> Result<bool> {
        Ok(txn
            .read::<Card>(&DocKey::card(owner, card_id))?
            .is_some_and(|card| card.owner_id == owner && !card.is_locked))
    }

    /// Read-only snapshot of `owner`'s cards in its own transaction.
    pub fn cards_of(runner: &TxnRunner<'_>, owner: UserId) -> Result<Vec<Card>> {
        runner.run("cards_of", |txn| Self::owned(txn, owner))
    }
}
