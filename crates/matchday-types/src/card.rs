//! Collectible cards.
//!
//! A card is a serialized instance of a player at a given scarcity. Every
//! card has exactly one owner; while an ACTIVE listing references it, the
//! card is locked and cannot be listed again or used in a lineup.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{CardId, MatchdayError, Player, PlayerRefId, Result, UserId, constants};

/// Scarcity tier of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Scarcity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Scarcity {
    /// Fixed scarcity → supply table.
    #[must_use]
    pub fn max_supply(self) -> MaxSupply {
        match self {
            Self::Legendary => MaxSupply::Limited(constants::LEGENDARY_MAX_SUPPLY),
            Self::Epic => MaxSupply::Limited(constants::EPIC_MAX_SUPPLY),
            Self::Rare => MaxSupply::Limited(constants::RARE_MAX_SUPPLY),
            Self::Common => MaxSupply::Unlimited,
        }
    }

    /// Inclusive upper bound of the serial range drawn when minting.
    #[must_use]
    pub fn serial_ceiling(self) -> u32 {
        match self.max_supply() {
            MaxSupply::Limited(n) => n,
            MaxSupply::Unlimited => constants::COMMON_SERIAL_CEILING,
        }
    }
}

impl fmt::Display for Scarcity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Common => write!(f, "COMMON"),
            Self::Rare => write!(f, "RARE"),
            Self::Epic => write!(f, "EPIC"),
            Self::Legendary => write!(f, "LEGENDARY"),
        }
    }
}

/// Total number of serials that may exist for a player at one scarcity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaxSupply {
    Limited(u32),
    Unlimited,
}

impl MaxSupply {
    /// Whether `serial` is a legal serial number under this supply.
    #[must_use]
    pub fn admits(self, serial: u32) -> bool {
        serial >= 1
            && match self {
                Self::Limited(max) => serial <= max,
                Self::Unlimited => true,
            }
    }
}

impl fmt::Display for MaxSupply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limited(n) => write!(f, "{n}"),
            Self::Unlimited => write!(f, "unlimited"),
        }
    }
}

/// A collectible card instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub player_reference_id: PlayerRefId,
    /// Denormalized player data at mint time.
    pub player: Player,
    pub owner_id: UserId,
    pub scarcity: Scarcity,
    pub serial_number: u32,
    pub max_supply: MaxSupply,
    /// `true` while an ACTIVE listing references this card.
    pub is_locked: bool,
    /// Fingerprint of `(player, scarcity, serial)`.
    pub instance_id: String,
    pub minted_at: DateTime<Utc>,
}

impl Card {
    /// Mint a new, unlocked card for `owner`.
    ///
    /// # Errors
    /// Returns `InvalidEntity` if `serial_number` is outside `[1, max_supply]`.
    pub fn mint(
        owner: UserId,
        player_reference_id: PlayerRefId,
        player: Player,
        scarcity: Scarcity,
        serial_number: u32,
    ) -> Result<Self> {
        let max_supply = scarcity.max_supply();
        if !max_supply.admits(serial_number) {
            return Err(MatchdayError::InvalidEntity {
                entity: "card",
                reason: format!(
                    "serial {serial_number} outside supply {max_supply} for {scarcity}"
                ),
            });
        }
        let instance_id = Self::fingerprint(&player_reference_id, scarcity, serial_number);
        Ok(Self {
            id: CardId::new(),
            player_reference_id,
            player,
            owner_id: owner,
            scarcity,
            serial_number,
            max_supply,
            is_locked: false,
            instance_id,
            minted_at: Utc::now(),
        })
    }

    /// Deterministic instance fingerprint. The same player, scarcity and
    /// serial always produce the same 16-hex-char fingerprint.
    #[must_use]
    pub fn fingerprint(player: &PlayerRefId, scarcity: Scarcity, serial: u32) -> String {
        let mut hasher = Sha256::new();
        hasher.update(b"matchday:card:v1:");
        hasher.update(player.as_str().as_bytes());
        hasher.update(b":");
        hasher.update(scarcity.to_string().as_bytes());
        hasher.update(serial.to_le_bytes());
        let hash = hasher.finalize();
        hex::encode(&hash[..8])
    }

    /// The same card re-homed under a new owner, unlocked.
    #[must_use]
    pub fn transferred_to(&self, new_owner: UserId) -> Self {
        Self {
            owner_id: new_owner,
            is_locked: false,
            ..self.clone()
        }
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Card {
    pub fn dummy(owner: UserId, position: crate::Position) -> Self {
        Self::mint(
            owner,
            PlayerRefId(format!("dummy-{}", position.code())),
            Player {
                name: format!("Dummy {}", position.code()),
                club: "Test FC".to_string(),
                position,
                base_value: 1_000,
            },
            Scarcity::Common,
            1,
        )
        .expect("serial 1 is always valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    fn striker() -> Player {
        Player {
            name: "Striker".into(),
            club: "Club".into(),
            position: Position::Forward,
            base_value: 4_200,
        }
    }

    #[test]
    fn supply_table_is_fixed() {
        assert_eq!(Scarcity::Legendary.max_supply(), MaxSupply::Limited(1));
        assert_eq!(Scarcity::Epic.max_supply(), MaxSupply::Limited(10));
        assert_eq!(Scarcity::Rare.max_supply(), MaxSupply::Limited(100));
        assert_eq!(Scarcity::Common.max_supply(), MaxSupply::Unlimited);
    }

    #[test]
    fn mint_rejects_serial_above_supply() {
        let err = Card::mint(
            UserId::new(),
            "p-9".into(),
            striker(),
            Scarcity::Epic,
            11,
        )
        .unwrap_err();
        assert!(matches!(err, MatchdayError::InvalidEntity { entity: "card", .. }));
    }

    #[test]
    fn mint_rejects_serial_zero() {
        let err = Card::mint(UserId::new(), "p-9".into(), striker(), Scarcity::Common, 0);
        assert!(err.is_err());
    }

    #[test]
    fn legendary_serial_one_is_valid() {
        let owner = UserId::new();
        let card = Card::mint(owner, "p-9".into(), striker(), Scarcity::Legendary, 1).unwrap();
        assert_eq!(card.owner_id, owner);
        assert!(!card.is_locked);
        assert_eq!(card.max_supply, MaxSupply::Limited(1));
        assert_eq!(card.instance_id.len(), 16);
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let a = Card::fingerprint(&"p-1".into(), Scarcity::Rare, 42);
        let b = Card::fingerprint(&"p-1".into(), Scarcity::Rare, 42);
        let c = Card::fingerprint(&"p-1".into(), Scarcity::Rare, 43);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn transfer_keeps_identity_and_unlocks() {
        let seller = UserId::new();
        let buyer = UserId::new();
        let mut card = Card::dummy(seller, Position::Midfielder);
        card.is_locked = true;
        let moved = card.transferred_to(buyer);
        assert_eq!(moved.id, card.id);
        assert_eq!(moved.instance_id, card.instance_id);
        assert_eq!(moved.owner_id, buyer);
        assert!(!moved.is_locked);
    }

    #[test]
    fn max_supply_serde() {
        assert_eq!(
            serde_json::to_string(&MaxSupply::Unlimited).unwrap(),
            "\"unlimited\""
        );
        assert_eq!(
            serde_json::to_string(&MaxSupply::Limited(10)).unwrap(),
            "{\"limited\":10}"
        );
    }
}
