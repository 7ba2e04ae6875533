//! The bank: packs sold for Coins.
//!
//! A purchase debits the buyer, decrements stock and mints every card in the
//! pack inside one transaction. Either the buyer ends up with the whole pack
//! and the stock is one lower, or nothing happened.

use matchday_ledger::{DocKey, Ledger, Transaction, TxnRunner};
use matchday_types::{
    Card, EconomyConfig, MatchdayError, Pack, PackId, PlayerCatalog, Result, UserId,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{CardRegistry, WalletService};

/// Outcome of a successful `buy_pack`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackReceipt {
    pub pack_id: PackId,
    pub buyer_id: UserId,
    pub price_paid: u64,
    pub cards: Vec<Card>,
}

/// Sells packs and mints their contents from the player catalogue.
pub struct PackStore<'l> {
    runner: TxnRunner<'l>,
    catalog: &'l PlayerCatalog,
}

impl<'l> PackStore<'l> {
    #[must_use]
    pub fn new(ledger: &'l dyn Ledger, catalog: &'l PlayerCatalog, config: &EconomyConfig) -> Self {
        Self {
            runner: TxnRunner::new(ledger, config.max_commit_attempts),
            catalog,
        }
    }

    /// Put a pack on sale.
    pub fn create_pack(&self, pack: &Pack) -> Result<PackId> {
        self.runner
            .run("create_pack", |txn| txn.create(&DocKey::pack(pack.id), pack))?;
        tracing::info!(
            pack = %pack.id,
            name = %pack.name,
            price = pack.price,
            stock = pack.stock,
            "Pack created"
        );
        Ok(pack.id)
    }

    /// # Errors
    /// Returns `PackNotFound` if no pack has this id.
    pub fn get_pack(&self, pack_id: PackId) -> Result<Pack> {
        self.runner
            .run("get_pack", |txn| Self::load(txn, pack_id))
    }

    /// Buy one pack for `buyer`.
    ///
    /// # Errors
    /// Checked in this order, each aborting with nothing written:
    /// - `PackNotFound`
    /// - `ProfileNotFound` if the buyer has no wallet
    /// - `OutOfStock` if `stock == 0`
    /// - `InsufficientFunds` if the buyer cannot pay
    /// - `EmptyPlayerPool` if the catalogue has no active player to mint
    pub fn buy_pack<R>(&self, pack_id: PackId, buyer: UserId, rng: &mut R) -> Result<PackReceipt>
    where
        R: Rng + ?Sized,
    {
        let receipt = self.runner.run("buy_pack", |txn| {
            let mut pack = Self::load(txn, pack_id)?;
            let wallet = WalletService::get(txn, buyer)?;
            if pack.is_sold_out() {
                return Err(MatchdayError::OutOfStock(pack_id));
            }
            if wallet.coins < pack.price {
                return Err(MatchdayError::InsufficientFunds {
                    needed: pack.price,
                    available: wallet.coins,
                });
            }
            if self.catalog.active().next().is_none() {
                return Err(MatchdayError::EmptyPlayerPool);
            }

            WalletService::debit(txn, buyer, pack.price)?;
            pack.stock -= 1;
            txn.write(&DocKey::pack(pack_id), &pack)?;

            let cards = self.mint_contents(txn, &pack, buyer, rng)?;
            Ok(PackReceipt {
                pack_id,
                buyer_id: buyer,
                price_paid: pack.price,
                cards,
            })
        })?;

        tracing::info!(
            pack = %pack_id,
            buyer = %buyer,
            price = receipt.price_paid,
            cards = receipt.cards.len(),
            "Pack purchased"
        );
        Ok(receipt)
    }

    fn load(txn: &mut Transaction<'_>, pack_id: PackId) -> Result<Pack> {
        txn.read(&DocKey::pack(pack_id))?
            .ok_or(MatchdayError::PackNotFound(pack_id))
    }

    fn mint_contents<R>(
        &self,
        txn: &mut Transaction<'_>,
        pack: &Pack,
        owner: UserId,
        rng: &mut R,
    ) -> Result<Vec<Card>>
    where
        R: Rng + ?Sized,
    {
        let mut cards = Vec::with_capacity(pack.card_count() as usize);
        for slot in &pack.contents {
            for _ in 0..slot.count {
                let pick = self
                    .catalog
                    .pick_active(rng)
                    .ok_or(MatchdayError::EmptyPlayerPool)?;
                let serial = rng.gen_range(1..=slot.scarcity.serial_ceiling());
                let card = Card::mint(
                    owner,
                    pick.reference_id.clone(),
                    pick.player.clone(),
                    slot.scarcity,
                    serial,
                )?;
                CardRegistry::insert(txn, &card)?;
                cards.push(card);
            }
        }
        Ok(cards)
    }
}
