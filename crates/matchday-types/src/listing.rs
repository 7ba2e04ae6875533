//! # Market listings
//!
//! A listing is a peer-to-peer sale offer for one card.
//!
//! ## State Machine
//!
//! ```text
//!   ┌────────┐  purchase   ┌──────┐
//!   │ ACTIVE ├────────────▶│ SOLD │
//!   └───┬────┘             └──────┘
//!       │ seller cancels
//!       ▼
//!   ┌───────────┐
//!   │ CANCELLED │
//!   └───────────┘
//! ```
//!
//! `net_seller` is computed once at listing time from the tax rate in force
//! and cached; a later tax change does not reprice open listings.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::{Card, CardId, ListingId, MatchdayError, Result, UserId};

/// The lifecycle state of a listing. Both non-ACTIVE states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ListingStatus {
    Active,
    Sold,
    Cancelled,
}

impl ListingStatus {
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!((self, target), (Self::Active, Self::Sold | Self::Cancelled))
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Sold => write!(f, "SOLD"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// `floor(price × (1 − tax_rate))`.
///
/// # Errors
/// Returns `InvalidEntity` if the rate is outside `[0, 1)`.
pub fn net_of_tax(price: u64, tax_rate: Decimal) -> Result<u64> {
    if tax_rate < Decimal::ZERO || tax_rate >= Decimal::ONE {
        return Err(MatchdayError::InvalidEntity {
            entity: "tax rate",
            reason: format!("{tax_rate} outside [0, 1)"),
        });
    }
    (Decimal::from(price) * (Decimal::ONE - tax_rate))
        .floor()
        .to_u64()
        .ok_or_else(|| MatchdayError::Internal(format!("net of {price} not representable")))
}

/// A sale offer for one card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub card_id: CardId,
    /// Snapshot of the card at listing time. Display only; the registry copy is authoritative.
    pub card: Card,
    pub seller_id: UserId,
    pub price: u64,
    /// Proceeds credited to the seller on sale.
    pub net_seller: u64,
    pub status: ListingStatus,
    pub buyer_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Listing {
    /// Create an ACTIVE listing for `card` at `price`.
    ///
    /// # Errors
    /// - `InvalidPrice` if `price == 0`
    /// - `InvalidEntity` if `tax_rate` is outside `[0, 1)`
    pub fn new(card: Card, price: u64, tax_rate: Decimal) -> Result<Self> {
        if price == 0 {
            return Err(MatchdayError::InvalidPrice);
        }
        let net_seller = net_of_tax(price, tax_rate)?;
        Ok(Self {
            id: ListingId::new(),
            card_id: card.id,
            seller_id: card.owner_id,
            card,
            price,
            net_seller,
            status: ListingStatus::Active,
            buyer_id: None,
            created_at: Utc::now(),
            closed_at: None,
        })
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ListingStatus::Active
    }

    /// Coins withheld from the seller and destroyed on sale.
    #[must_use]
    pub fn burned(&self) -> u64 {
        self.price - self.net_seller
    }

    /// ACTIVE → SOLD.
    ///
    /// # Errors
    /// Returns `NotAvailable` if the listing is not ACTIVE.
    pub fn mark_sold(&mut self, buyer: UserId) -> Result<()> {
        if !self.status.can_transition_to(ListingStatus::Sold) {
            return Err(MatchdayError::NotAvailable(self.id));
        }
        self.status = ListingStatus::Sold;
        self.buyer_id = Some(buyer);
        self.closed_at = Some(Utc::now());
        Ok(())
    }

    /// ACTIVE → CANCELLED.
    ///
    /// # Errors
    /// Returns `AlreadyFinalized` if the listing is not ACTIVE.
    pub fn mark_cancelled(&mut self) -> Result<()> {
        if !self.status.can_transition_to(ListingStatus::Cancelled) {
            return Err(MatchdayError::AlreadyFinalized(self.id));
        }
        self.status = ListingStatus::Cancelled;
        self.closed_at = Some(Utc::now());
        Ok(())
    }
}
