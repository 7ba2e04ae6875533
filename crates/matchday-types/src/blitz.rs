//! Blitz tournament types.
//!
//! A Blitz tournament is a short fantasy contest: each entrant pays an entry
//! fee, receives a private 15-card draft pool, and submits a 5-player lineup
//! from it. The fee minus the rake goes into the prize pool.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MatchdayError, Player, PlayerRefId, Position, Result, TournamentId, UserId};

/// Tournament lifecycle. Advances one way: OPEN → LIVE → FINISHED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TournamentStatus {
    /// Accepting entries and lineup changes.
    Open,
    /// Lineups locked, matches in progress.
    Live,
    Finished,
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Live => write!(f, "LIVE"),
            Self::Finished => write!(f, "FINISHED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub status: TournamentStatus,
    pub start_time: DateTime<Utc>,
    pub entry_fee: u64,
    /// Percentage of each entry fee withheld from the prize pool (0–100).
    pub rake_percent: u8,
    pub prize_pool: u64,
    pub participant_count: u32,
}

impl Tournament {
    /// Create an OPEN tournament with an empty prize pool.
    ///
    /// # Errors
    /// Returns `InvalidEntity` if `rake_percent > 100`.
    pub fn new(
        name: impl Into<String>,
        start_time: DateTime<Utc>,
        entry_fee: u64,
        rake_percent: u8,
    ) -> Result<Self> {
        if rake_percent > 100 {
            return Err(MatchdayError::InvalidEntity {
                entity: "tournament",
                reason: format!("rake {rake_percent}% above 100%"),
            });
        }
        Ok(Self {
            id: TournamentId::new(),
            name: name.into(),
            status: TournamentStatus::Open,
            start_time,
            entry_fee,
            rake_percent,
            prize_pool: 0,
            participant_count: 0,
        })
    }

    /// `floor(entry_fee × rake_percent / 100)`.
    #[must_use]
    pub fn rake(&self) -> u64 {
        let rake = u128::from(self.entry_fee) * u128::from(self.rake_percent) / 100;
        // rake <= entry_fee, so it always fits back into u64.
        u64::try_from(rake).unwrap_or(self.entry_fee)
    }

    /// Record one paid entry: the fee net of rake joins the prize pool.
    ///
    /// # Errors
    /// Returns `BalanceOverflow` if the prize pool would overflow and
    /// `InvalidEntity` if the participant count would. Nothing changes on error.
    pub fn record_entry(&mut self) -> Result<u64> {
        let contribution = self.entry_fee - self.rake();
        let prize_pool = self
            .prize_pool
            .checked_add(contribution)
            .ok_or(MatchdayError::BalanceOverflow)?;
        let participant_count = self.participant_count.checked_add(1).ok_or_else(|| {
            MatchdayError::InvalidEntity {
                entity: "tournament",
                reason: "participant count overflow".to_string(),
            }
        })?;
        self.prize_pool = prize_pool;
        self.participant_count = participant_count;
        Ok(contribution)
    }

    /// Move the status forward.
    ///
    /// # Errors
    /// Returns `IllegalTransition` unless `next` is strictly later than the current status.
    pub fn advance(&mut self, next: TournamentStatus) -> Result<()> {
        if next <= self.status {
            return Err(MatchdayError::IllegalTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }
}

/// Draft value band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DraftTier {
    Gold,
    Silver,
    Bronze,
}

impl DraftTier {
    pub const ALL: [Self; 3] = [Self::Gold, Self::Silver, Self::Bronze];
}

impl fmt::Display for DraftTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gold => write!(f, "GOLD"),
            Self::Silver => write!(f, "SILVER"),
            Self::Bronze => write!(f, "BRONZE"),
        }
    }
}

/// A pool card scoped to one Blitz entry. Never enters the card registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftCard {
    pub player_reference_id: PlayerRefId,
    pub player: Player,
    pub tier: DraftTier,
}

impl DraftCard {
    #[must_use]
    pub fn position(&self) -> Position {
        self.player.position
    }
}

/// One user's participation in one tournament. Its id is the tournament id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlitzEntry {
    pub id: TournamentId,
    pub tournament_id: TournamentId,
    pub user_id: UserId,
    /// Generated once at join time; never modified afterwards.
    pub draft_pool: Vec<DraftCard>,
    /// Empty until the first submission, then exactly five cards.
    pub selected_lineup: Vec<DraftCard>,
    pub total_score: f64,
    pub rank: Option<u32>,
    pub win_amount: u64,
    pub joined_at: DateTime<Utc>,
}

impl BlitzEntry {
    #[must_use]
    pub fn new(tournament_id: TournamentId, user_id: UserId, draft_pool: Vec<DraftCard>) -> Self {
        Self {
            id: tournament_id,
            tournament_id,
            user_id,
            draft_pool,
            selected_lineup: Vec::new(),
            total_score: 0.0,
            rank: None,
            win_amount: 0,
            joined_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn pool_card(&self, id: &PlayerRefId) -> Option<&DraftCard> {
        self.draft_pool.iter().find(|c| &c.player_reference_id == id)
    }

    #[must_use]
    pub fn has_lineup(&self) -> bool {
        !self.selected_lineup.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tournament(fee: u64, rake: u8) -> Tournament {
        Tournament::new("Friday Blitz", Utc::now(), fee, rake).unwrap()
    }

    #[test]
    fn rake_is_floored() {
        assert_eq!(tournament(100, 10).rake(), 10);
        assert_eq!(tournament(99, 10).rake(), 9);
        assert_eq!(tournament(100, 0).rake(), 0);
        assert_eq!(tournament(100, 100).rake(), 100);
    }

    #[test]
    fn entry_grows_prize_pool_net_of_rake() {
        let mut t = tournament(100, 10);
        assert_eq!(t.record_entry().unwrap(), 90);
        assert_eq!(t.record_entry().unwrap(), 90);
        assert_eq!(t.prize_pool, 180);
        assert_eq!(t.participant_count, 2);
    }

    #[test]
    fn full_tournament_rejects_entry_without_changes() {
        let mut t = tournament(100, 10);
        t.participant_count = u32::MAX;
        t.prize_pool = 500;
        let err = t.record_entry().unwrap_err();
        assert!(matches!(
            err,
            MatchdayError::InvalidEntity {
                entity: "tournament",
                ..
            }
        ));
        assert_eq!(t.participant_count, u32::MAX);
        assert_eq!(t.prize_pool, 500);
    }

    #[test]
    fn overflowing_prize_pool_rejected() {
        let mut t = tournament(100, 0);
        t.prize_pool = u64::MAX - 50;
        assert!(matches!(t.record_entry(), Err(MatchdayError::BalanceOverflow)));
        assert_eq!(t.participant_count, 0);
    }

    #[test]
    fn rake_above_hundred_rejected() {
        assert!(Tournament::new("Bad", Utc::now(), 100, 101).is_err());
    }

    #[test]
    fn status_only_moves_forward() {
        let mut t = tournament(50, 5);
        t.advance(TournamentStatus::Live).unwrap();
        assert!(t.advance(TournamentStatus::Open).is_err());
        assert!(t.advance(TournamentStatus::Live).is_err());
        t.advance(TournamentStatus::Finished).unwrap();
        assert_eq!(t.status, TournamentStatus::Finished);
    }

    #[test]
    fn new_entry_has_empty_lineup() {
        let entry = BlitzEntry::new(TournamentId::new(), UserId::new(), vec![]);
        assert_eq!(entry.id, entry.tournament_id);
        assert!(!entry.has_lineup());
    }
}
