//! Player reference data.
//!
//! The player catalogue is owned by an external feed; the engine only reads
//! it to mint cards and to build Blitz draft pools.

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::PlayerRefId;

/// On-pitch position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "GK")]
    Goalkeeper,
    #[serde(rename = "DEF")]
    Defender,
    #[serde(rename = "MID")]
    Midfielder,
    #[serde(rename = "FWD")]
    Forward,
}

impl Position {
    /// All positions in canonical order (the index order of position-count arrays).
    pub const ALL: [Self; 4] = [
        Self::Goalkeeper,
        Self::Defender,
        Self::Midfielder,
        Self::Forward,
    ];

    /// Index into `[GK, DEF, MID, FWD]` count arrays.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Goalkeeper => 0,
            Self::Defender => 1,
            Self::Midfielder => 2,
            Self::Forward => 3,
        }
    }

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Goalkeeper => "GK",
            Self::Defender => "DEF",
            Self::Midfielder => "MID",
            Self::Forward => "FWD",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Counts players per position, indexed by [`Position::index`].
pub fn position_counts<'a, I>(positions: I) -> [usize; 4]
where
    I: IntoIterator<Item = &'a Position>,
{
    let mut counts = [0usize; 4];
    for position in positions {
        counts[position.index()] += 1;
    }
    counts
}

/// Descriptive player data, denormalized onto cards and draft cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub club: String,
    pub position: Position,
    /// Market value used for tiering; higher is better.
    pub base_value: u32,
}

/// One row of the external player catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPlayer {
    pub reference_id: PlayerRefId,
    pub player: Player,
    /// Inactive players (retired, transferred out of the league) are never minted or drafted.
    pub active: bool,
}

/// Read-only view over the player reference data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerCatalog {
    players: Vec<CatalogPlayer>,
}

impl PlayerCatalog {
    #[must_use]
    pub fn new(players: Vec<CatalogPlayer>) -> Self {
        Self { players }
    }

    /// Active players only.
    pub fn active(&self) -> impl Iterator<Item = &CatalogPlayer> {
        self.players.iter().filter(|p| p.active)
    }

    /// Draw one active player uniformly at random.
    pub fn pick_active<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&CatalogPlayer> {
        let active: Vec<&CatalogPlayer> = self.active().collect();
        active.choose(rng).copied()
    }

    #[must_use]
    pub fn get(&self, reference_id: &PlayerRefId) -> Option<&CatalogPlayer> {
        self.players.iter().find(|p| &p.reference_id == reference_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl PlayerCatalog {
    /// A deterministic 48-player catalogue: 16 players in each value band
    /// (4500 / 3000 / 1000), split 3 GK, 4 DEF, 5 MID, 4 FWD per band.
    pub fn sample() -> Self {
        let bands = [("g", 4_500u32), ("s", 3_000), ("b", 1_000)];
        let split = [
            (Position::Goalkeeper, 3),
            (Position::Defender, 4),
            (Position::Midfielder, 5),
            (Position::Forward, 4),
        ];
        let mut players = Vec::new();
        for (band, value) in bands {
            for (position, count) in split {
                for n in 0..count {
                    players.push(CatalogPlayer {
                        reference_id: PlayerRefId(format!("{band}-{}-{n}", position.code())),
                        player: Player {
                            name: format!("{} {band}{n}", position.code()),
                            club: format!("Club {}", n % 4),
                            position,
                            base_value: value + n,
                        },
                        active: true,
                    });
                }
            }
        }
        Self::new(players)
    }

    /// A catalogue of `count` active players all at one position and value.
    pub fn uniform(position: Position, base_value: u32, count: usize) -> Self {
        let players = (0..count)
            .map(|n| CatalogPlayer {
                reference_id: PlayerRefId(format!("{}-{n}", position.code())),
                player: Player {
                    name: format!("{} {n}", position.code()),
                    club: "Club 0".to_string(),
                    position,
                    base_value,
                },
                active: true,
            })
            .collect();
        Self::new(players)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn position_serde_uses_short_codes() {
        let json = serde_json::to_string(&Position::Midfielder).unwrap();
        assert_eq!(json, "\"MID\"");
        let back: Position = serde_json::from_str("\"GK\"").unwrap();
        assert_eq!(back, Position::Goalkeeper);
    }

    #[test]
    fn position_counts_indexes_canonically() {
        let counts = position_counts(&[
            Position::Forward,
            Position::Midfielder,
            Position::Midfielder,
            Position::Goalkeeper,
        ]);
        assert_eq!(counts, [1, 0, 2, 1]);
    }

    #[test]
    fn pick_active_skips_inactive() {
        let mut catalog = PlayerCatalog::uniform(Position::Defender, 1_000, 3);
        catalog.players[0].active = false;
        catalog.players[1].active = false;
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let picked = catalog.pick_active(&mut rng).unwrap();
            assert_eq!(picked.reference_id.as_str(), "DEF-2");
        }
    }

    #[test]
    fn empty_catalog_picks_nothing() {
        let catalog = PlayerCatalog::default();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(catalog.pick_active(&mut rng).is_none());
        assert!(catalog.is_empty());
    }

    #[test]
    fn sample_catalog_shape() {
        let catalog = PlayerCatalog::sample();
        assert_eq!(catalog.len(), 48);
        assert!(catalog.get(&PlayerRefId::from("g-GK-0")).is_some());
    }
}
