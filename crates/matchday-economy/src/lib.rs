//! # matchday-economy
//!
//! **Coins and cards**: wallets, the card registry, the bank's pack store
//! and the peer-to-peer marketplace.
//!
//! ## Architecture
//!
//! 1. **WalletService**: debit/credit against the caller's transaction
//! 2. **CardRegistry**: per-owner card documents plus an ownership index
//! 3. **PackStore**: sells packs for Coins and mints the cards inside
//! 4. **Marketplace**: list / cancel / buy single cards, taxing each sale
//!
//! `WalletService` and `CardRegistry` never commit on their own: they take
//! the enclosing [`Transaction`](matchday_ledger::Transaction), so every
//! balance change lands together with the inventory change that justifies it.
//!
//! ## Purchase Flow
//!
//! ```text
//! buy_listing → read listing → WalletService.debit(buyer)
//!             → WalletService.credit(seller, net) → CardRegistry.remove(seller)
//!             → CardRegistry.insert(buyer) → listing SOLD → commit
//! ```

pub mod marketplace;
pub mod pack_store;
pub mod registry;
pub mod wallet;

pub use marketplace::{Marketplace, TradeReceipt};
pub use pack_store::{PackReceipt, PackStore};
pub use registry::{CardIndex, CardRegistry};
pub use wallet::WalletService;
