//! Blitz draft-pool generation.
//!
//! ## Algorithm
//!
//! 1. Partition the active catalogue into GOLD / SILVER / BRONZE by `base_value`
//! 2. Sample `picks_per_tier` players from each tier without replacement
//! 3. Repair positional coverage: while a position is below its minimum,
//!    swap out a card of the position with the largest surplus for an unused
//!    player of the missing position. The swapped slot keeps its tier.
//!
//! Each swap lowers the total shortfall by one and never opens a new one, so
//! repair finishes in at most `Σ minimums` swaps on a healthy catalogue.
//! A position the catalogue cannot supply is skipped and the remaining
//! shortfalls are still repaired. Whatever is left is logged as a warning.

use std::collections::HashSet;

use matchday_types::constants::BLITZ_POOL_MINIMUMS;
use matchday_types::{
    BlitzConfig, CatalogPlayer, DraftCard, DraftTier, MatchdayError, PlayerCatalog, PlayerRefId,
    Position, Result, position_counts,
};
use rand::Rng;
use rand::seq::SliceRandom;

/// Builds 15-card Blitz draft pools from the player catalogue.
pub struct DraftPoolGenerator<'c> {
    catalog: &'c PlayerCatalog,
    config: BlitzConfig,
}

impl<'c> DraftPoolGenerator<'c> {
    #[must_use]
    pub fn new(catalog: &'c PlayerCatalog, config: &BlitzConfig) -> Self {
        Self {
            catalog,
            config: config.clone(),
        }
    }

    #[must_use]
    pub fn tier_of(&self, base_value: u32) -> DraftTier {
        if base_value >= self.config.gold_threshold {
            DraftTier::Gold
        } else if base_value >= self.config.silver_threshold {
            DraftTier::Silver
        } else {
            DraftTier::Bronze
        }
    }

    /// Draw a fresh pool.
    ///
    /// # Errors
    /// Returns `PlayerPoolTooSmall` if a tier has fewer active players than
    /// `picks_per_tier`.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<DraftCard>> {
        let picks = self.config.picks_per_tier;
        let mut pool = Vec::with_capacity(picks * DraftTier::ALL.len());

        for tier in DraftTier::ALL {
            let candidates: Vec<&CatalogPlayer> = self
                .catalog
                .active()
                .filter(|p| self.tier_of(p.player.base_value) == tier)
                .collect();
            if candidates.len() < picks {
                return Err(MatchdayError::PlayerPoolTooSmall {
                    tier: tier.to_string(),
                    needed: picks,
                    available: candidates.len(),
                });
            }
            pool.extend(
                candidates
                    .choose_multiple(rng, picks)
                    .map(|p| draft_card(p, tier)),
            );
        }

        self.repair(&mut pool, rng);
        Ok(pool)
    }

    fn repair<R: Rng + ?Sized>(&self, pool: &mut [DraftCard], rng: &mut R) {
        // Positions the catalogue has no unused player for.
        let mut exhausted = [false; Position::ALL.len()];

        for _ in 0..self.config.max_repair_attempts {
            let counts = position_counts(pool.iter().map(|c| &c.player.position));
            let Some(missing) = Position::ALL.into_iter().find(|p| {
                !exhausted[p.index()] && counts[p.index()] < BLITZ_POOL_MINIMUMS[p.index()]
            }) else {
                break;
            };

            let Some(donor) = Position::ALL
                .into_iter()
                .filter(|p| counts[p.index()] > BLITZ_POOL_MINIMUMS[p.index()])
                .max_by_key(|p| counts[p.index()] - BLITZ_POOL_MINIMUMS[p.index()])
            else {
                break;
            };

            if !self.swap_one(pool, donor, missing, rng) {
                tracing::warn!(
                    position = %missing,
                    have = counts[missing.index()],
                    need = BLITZ_POOL_MINIMUMS[missing.index()],
                    "No unused player left to fill draft position"
                );
                exhausted[missing.index()] = true;
            }
        }

        let counts = position_counts(pool.iter().map(|c| &c.player.position));
        if Position::ALL
            .iter()
            .any(|p| counts[p.index()] < BLITZ_POOL_MINIMUMS[p.index()])
        {
            tracing::warn!(
                ?counts,
                attempts = self.config.max_repair_attempts,
                "Draft repair incomplete, returning best-effort pool"
            );
        }
    }

    /// Replace one `donor` card with an unused `missing` player. Prefers a
    /// replacement from the replaced slot's own tier.
    fn swap_one<R: Rng + ?Sized>(
        &self,
        pool: &mut [DraftCard],
        donor: Position,
        missing: Position,
        rng: &mut R,
    ) -> bool {
        let used: HashSet<PlayerRefId> = pool
            .iter()
            .map(|c| c.player_reference_id.clone())
            .collect();
        let unused: Vec<&CatalogPlayer> = self
            .catalog
            .active()
            .filter(|p| p.player.position == missing && !used.contains(&p.reference_id))
            .collect();
        if unused.is_empty() {
            return false;
        }

        let mut donor_slots: Vec<usize> = pool
            .iter()
            .enumerate()
            .filter(|(_, c)| c.position() == donor)
            .map(|(i, _)| i)
            .collect();
        donor_slots.shuffle(rng);

        for &slot in &donor_slots {
            let tier = pool[slot].tier;
            let same_tier: Vec<&CatalogPlayer> = unused
                .iter()
                .copied()
                .filter(|p| self.tier_of(p.player.base_value) == tier)
                .collect();
            if let Some(pick) = same_tier.choose(rng) {
                pool[slot] = draft_card(pick, tier);
                return true;
            }
        }

        match (donor_slots.first(), unused.choose(rng)) {
            (Some(&slot), Some(pick)) => {
                pool[slot] = draft_card(pick, pool[slot].tier);
                true
            }
            _ => false,
        }
    }
}

fn draft_card(player: &CatalogPlayer, tier: DraftTier) -> DraftCard {
    DraftCard {
        player_reference_id: player.reference_id.clone(),
        player: player.player.clone(),
        tier,
    }
}
