//! Peer-to-peer card market.
//!
//! ## Settlement
//!
//! A sale moves three things in one transaction:
//! 1. `price` Coins out of the buyer's wallet
//! 2. the cached `net_seller` into the seller's wallet (the difference is burned)
//! 3. the card from the seller's registry to the buyer's, unlocked
//!
//! The listing flips to SOLD in the same commit, so a second buyer racing
//! for the same listing either conflicts and re-reads a SOLD listing, or
//! never saw it ACTIVE.

use matchday_ledger::{DocKey, Ledger, Transaction, TxnRunner};
use matchday_types::{
    CardId, EconomyConfig, Listing, ListingId, MatchdayError, Result, UserId, Wallet,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CardRegistry, WalletService};

/// Outcome of a successful `buy_listing`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeReceipt {
    pub listing_id: ListingId,
    pub card_id: CardId,
    pub buyer_id: UserId,
    pub seller_id: UserId,
    pub price: u64,
    pub net_seller: u64,
    /// Coins destroyed by the sale tax.
    pub burned: u64,
}

/// Listing, cancellation and purchase of single cards.
pub struct Marketplace<'l> {
    runner: TxnRunner<'l>,
    /// Rate applied to listings created by this instance.
    tax_rate: Decimal,
}

impl<'l> Marketplace<'l> {
    #[must_use]
    pub fn new(ledger: &'l dyn Ledger, config: &EconomyConfig) -> Self {
        Self {
            runner: TxnRunner::new(ledger, config.max_commit_attempts),
            tax_rate: config.market_tax_rate,
        }
    }

    #[must_use]
    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// Offer `seller`'s card for `price` Coins.
    ///
    /// # Errors
    /// - `InvalidPrice` if `price == 0`
    /// - `CardNotFound` if `seller` does not hold the card
    /// - `AlreadyLocked` if the card is already listed
    pub fn list_card(&self, card_id: CardId, price: u64, seller: UserId) -> Result<Listing> {
        if price == 0 {
            return Err(MatchdayError::InvalidPrice);
        }

        let listing = self.runner.run("list_card", |txn| {
            let card = CardRegistry::get(txn, seller, card_id)?;
            if card.is_locked {
                return Err(MatchdayError::AlreadyLocked(card_id));
            }
            let locked = CardRegistry::set_locked(txn, seller, card_id, true)?;
            let listing = Listing::new(locked, price, self.tax_rate)?;
            txn.create(&DocKey::listing(listing.id), &listing)?;
            Ok(listing)
        })?;

        tracing::info!(
            listing = %listing.id,
            card = %card_id,
            seller = %seller,
            price,
            net_seller = listing.net_seller,
            "Card listed"
        );
        Ok(listing)
    }

    /// Withdraw an ACTIVE listing and unlock its card.
    ///
    /// # Errors
    /// - `ListingNotFound`
    /// - `NotOwner` if `caller` is not the seller
    /// - `AlreadyFinalized` if the listing is SOLD or CANCELLED
    pub fn cancel_listing(&self, listing_id: ListingId, caller: UserId) -> Result<Listing> {
        let listing = self.runner.run("cancel_listing", |txn| {
            let mut listing = Self::load(txn, listing_id)?;
            if listing.seller_id != caller {
                return Err(MatchdayError::NotOwner { caller });
            }
            listing.mark_cancelled()?;
            CardRegistry::set_locked(txn, listing.seller_id, listing.card_id, false)?;
            txn.write(&DocKey::listing(listing_id), &listing)?;
            Ok(listing)
        })?;

        tracing::info!(listing = %listing_id, seller = %caller, "Listing cancelled");
        Ok(listing)
    }

    /// Buy an ACTIVE listing.
    ///
    /// # Errors
    /// - `ListingNotFound`
    /// - `NotAvailable` if the listing is not ACTIVE
    /// - `SelfTrade` if `buyer` is the seller
    /// - `ProfileNotFound` / `InsufficientFunds` for the buyer's wallet
    /// - `SellerProfileMissing` if the seller has no wallet to credit
    pub fn buy_listing(&self, listing_id: ListingId, buyer: UserId) -> Result<TradeReceipt> {
        let receipt = self.runner.run("buy_listing", |txn| {
            let mut listing = Self::load(txn, listing_id)?;
            if !listing.is_active() {
                return Err(MatchdayError::NotAvailable(listing_id));
            }
            let seller = listing.seller_id;
            if buyer == seller {
                return Err(MatchdayError::SelfTrade);
            }

            WalletService::debit(txn, buyer, listing.price)?;
            if txn.read::<Wallet>(&DocKey::wallet(seller))?.is_none() {
                return Err(MatchdayError::SellerProfileMissing(seller));
            }
            WalletService::credit(txn, seller, listing.net_seller)?;

            let card = CardRegistry::remove(txn, seller, listing.card_id)?;
            CardRegistry::insert(txn, &card.transferred_to(buyer))?;

            listing.mark_sold(buyer)?;
            txn.write(&DocKey::listing(listing_id), &listing)?;

            Ok(TradeReceipt {
                listing_id,
                card_id: listing.card_id,
                buyer_id: buyer,
                seller_id: seller,
                price: listing.price,
                net_seller: listing.net_seller,
                burned: listing.burned(),
            })
        })?;

        tracing::info!(
            listing = %listing_id,
            card = %receipt.card_id,
            buyer = %buyer,
            seller = %receipt.seller_id,
            price = receipt.price,
            burned = receipt.burned,
            "Listing sold"
        );
        Ok(receipt)
    }

    /// # Errors
    /// Returns `ListingNotFound` if no listing has this id.
    pub fn get_listing(&self, listing_id: ListingId) -> Result<Listing> {
        self.runner
            .run("get_listing", |txn| Self::load(txn, listing_id))
    }

    fn load(txn: &mut Transaction<'_>, listing_id: ListingId) -> Result<Listing> {
        txn.read(&DocKey::listing(listing_id))?
            .ok_or(MatchdayError::ListingNotFound(listing_id))
    }
}

#[cfg(test)]
mod tests {
    use matchday_ledger::MemoryLedger;
    use matchday_types::{Card, ListingStatus, Position};

    use super::*;

    struct Fixture {
        ledger: MemoryLedger,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                ledger: MemoryLedger::new(),
            }
        }

        fn runner(&self) -> TxnRunner<'_> {
            TxnRunner::with_defaults(&self.ledger)
        }

        fn market(&self) -> Marketplace<'_> {
            Marketplace::new(&self.ledger, &EconomyConfig::default())
        }

        fn user(&self, coins: u64) -> UserId {
            let user = UserId::new();
            WalletService::open_account(&self.runner(), user, coins).unwrap();
            user
        }

        fn card(&self, owner: UserId) -> Card {
            let card = Card::dummy(owner, Position::Midfielder);
            self.runner()
                .run("insert", |txn| CardRegistry::insert(txn, &card))
                .unwrap();
            card
        }

        fn balance(&self, user: UserId) -> u64 {
            WalletService::balance_of(&self.runner(), user).unwrap()
        }
    }

    #[test]
    fn listing_locks_card_and_caches_net() {
        let fx = Fixture::new();
        let seller = fx.user(0);
        let card = fx.card(seller);

        let listing = fx.market().list_card(card.id, 200, seller).unwrap();
        assert_eq!(listing.status, ListingStatus::Active);
        assert_eq!(listing.net_seller, 180);
        assert!(listing.card.is_locked);

        let stored = fx
            .runner()
            .run("get", |txn| CardRegistry::get(txn, seller, card.id))
            .unwrap();
        assert!(stored.is_locked);
    }

    #[test]
    fn locked_card_cannot_be_listed_twice() {
        let fx = Fixture::new();
        let seller = fx.user(0);
        let card = fx.card(seller);
        let market = fx.market();
        market.list_card(card.id, 200, seller).unwrap();

        let err = market.list_card(card.id, 300, seller).unwrap_err();
        assert!(matches!(err, MatchdayError::AlreadyLocked(id) if id == card.id));
    }

    #[test]
    fn zero_price_and_foreign_card_rejected() {
        let fx = Fixture::new();
        let seller = fx.user(0);
        let card = fx.card(seller);
        let market = fx.market();

        assert!(matches!(
            market.list_card(card.id, 0, seller),
            Err(MatchdayError::InvalidPrice)
        ));
        assert!(matches!(
            market.list_card(card.id, 10, UserId::new()),
            Err(MatchdayError::CardNotFound(_))
        ));
    }

    #[test]
    fn sale_moves_card_and_burns_tax() {
        let fx = Fixture::new();
        let seller = fx.user(0);
        let buyer = fx.user(1_000);
        let card = fx.card(seller);
        let market = fx.market();
        let listing = market.list_card(card.id, 1_000, seller).unwrap();

        let receipt = market.buy_listing(listing.id, buyer).unwrap();
        assert_eq!(receipt.net_seller, 900);
        assert_eq!(receipt.burned, 100);
        assert_eq!(fx.balance(buyer), 0);
        assert_eq!(fx.balance(seller), 900);

        assert!(CardRegistry::cards_of(&fx.runner(), seller).unwrap().is_empty());
        let owned = CardRegistry::cards_of(&fx.runner(), buyer).unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].id, card.id);
        assert_eq!(owned[0].instance_id, card.instance_id);
        assert!(!owned[0].is_locked);

        let sold = market.get_listing(listing.id).unwrap();
        assert_eq!(sold.status, ListingStatus::Sold);
        assert_eq!(sold.buyer_id, Some(buyer));
    }

    #[test]
    fn self_trade_rejected() {
        let fx = Fixture::new();
        let seller = fx.user(500);
        let card = fx.card(seller);
        let market = fx.market();
        let listing = market.list_card(card.id, 100, seller).unwrap();

        assert!(matches!(
            market.buy_listing(listing.id, seller),
            Err(MatchdayError::SelfTrade)
        ));
        assert_eq!(fx.balance(seller), 500);
    }

    #[test]
    fn poor_buyer_changes_nothing() {
        let fx = Fixture::new();
        let seller = fx.user(0);
        let buyer = fx.user(99);
        let card = fx.card(seller);
        let market = fx.market();
        let listing = market.list_card(card.id, 100, seller).unwrap();

        let err = market.buy_listing(listing.id, buyer).unwrap_err();
        assert!(matches!(err, MatchdayError::InsufficientFunds { .. }));
        assert_eq!(fx.balance(buyer), 99);
        assert_eq!(fx.balance(seller), 0);
        assert!(market.get_listing(listing.id).unwrap().is_active());
    }

    #[test]
    fn seller_without_wallet_blocks_sale() {
        let fx = Fixture::new();
        let seller = UserId::new();
        let buyer = fx.user(1_000);
        let card = fx.card(seller);
        let market = fx.market();
        let listing = market.list_card(card.id, 100, seller).unwrap();

        let err = market.buy_listing(listing.id, buyer).unwrap_err();
        assert!(matches!(err, MatchdayError::SellerProfileMissing(u) if u == seller));
        assert_eq!(fx.balance(buyer), 1_000);
    }

    #[test]
    fn cancel_unlocks_and_is_final() {
        let fx = Fixture::new();
        let seller = fx.user(0);
        let buyer = fx.user(1_000);
        let card = fx.card(seller);
        let market = fx.market();
        let listing = market.list_card(card.id, 100, seller).unwrap();

        let intruder = UserId::new();
        assert!(matches!(
            market.cancel_listing(listing.id, intruder),
            Err(MatchdayError::NotOwner { caller }) if caller == intruder
        ));

        let cancelled = market.cancel_listing(listing.id, seller).unwrap();
        assert_eq!(cancelled.status, ListingStatus::Cancelled);
        let stored = fx
            .runner()
            .run("get", |txn| CardRegistry::get(txn, seller, card.id))
            .unwrap();
        assert!(!stored.is_locked);

        assert!(matches!(
            market.cancel_listing(listing.id, seller),
            Err(MatchdayError::AlreadyFinalized(_))
        ));
        assert!(matches!(
            market.buy_listing(listing.id, buyer),
            Err(MatchdayError::NotAvailable(_))
        ));
    }

    #[test]
    fn second_purchase_of_sold_listing_fails() {
        let fx = Fixture::new();
        let seller = fx.user(0);
        let first = fx.user(500);
        let second = fx.user(500);
        let card = fx.card(seller);
        let market = fx.market();
        let listing = market.list_card(card.id, 200, seller).unwrap();

        market.buy_listing(listing.id, first).unwrap();
        assert!(matches!(
            market.buy_listing(listing.id, second),
            Err(MatchdayError::NotAvailable(_))
        ));
        assert_eq!(fx.balance(second), 500);
    }

    #[test]
    fn sold_listing_cannot_be_cancelled() {
        let fx = Fixture::new();
        let seller = fx.user(0);
        let buyer = fx.user(500);
        let card = fx.card(seller);
        let market = fx.market();
        let listing = market.list_card(card.id, 200, seller).unwrap();
        market.buy_listing(listing.id, buyer).unwrap();

        let err = market.cancel_listing(listing.id, seller).unwrap_err();
        assert!(matches!(err, MatchdayError::AlreadyFinalized(id) if id == listing.id));

        let stored = market.get_listing(listing.id).unwrap();
        assert_eq!(stored.status, ListingStatus::Sold);
        let owned = CardRegistry::cards_of(&fx.runner(), buyer).unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].id, card.id);
        assert!(!owned[0].is_locked);
        assert!(CardRegistry::cards_of(&fx.runner(), seller).unwrap().is_empty());
        assert_eq!(fx.balance(seller), 180);
    }

    #[test]
    fn unknown_listing() {
        let fx = Fixture::new();
        assert!(matches!(
            fx.market().get_listing(ListingId::new()),
            Err(MatchdayError::ListingNotFound(_))
        ));
    }
}
