//! Bank packs: fixed-price bundles of freshly minted cards.

use serde::{Deserialize, Serialize};

use crate::{MatchdayError, PackId, Result, Scarcity};

/// One line of a pack's contents: `count` cards of `scarcity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackSlot {
    pub scarcity: Scarcity,
    pub count: u32,
}

/// A pack on sale at the bank. Stock only ever decreases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pack {
    pub id: PackId,
    pub name: String,
    pub price: u64,
    pub stock: u32,
    pub contents: Vec<PackSlot>,
}

impl Pack {
    /// # Errors
    /// Returns `InvalidEntity` if `contents` is empty or any slot has a zero count.
    pub fn new(
        name: impl Into<String>,
        price: u64,
        stock: u32,
        contents: Vec<PackSlot>,
    ) -> Result<Self> {
        if contents.is_empty() {
            return Err(MatchdayError::InvalidEntity {
                entity: "pack",
                reason: "contents must not be empty".into(),
            });
        }
        if let Some(slot) = contents.iter().find(|s| s.count == 0) {
            return Err(MatchdayError::InvalidEntity {
                entity: "pack",
                reason: format!("zero-count slot for {}", slot.scarcity),
            });
        }
        Ok(Self {
            id: PackId::new(),
            name: name.into(),
            price,
            stock,
            contents,
        })
    }

    /// Number of cards minted per purchase.
    #[must_use]
    pub fn card_count(&self) -> u32 {
        self.contents.iter().map(|s| s.count).sum()
    }

    #[must_use]
    pub fn is_sold_out(&self) -> bool {
        self.stock == 0
    }
}
