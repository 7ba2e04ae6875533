//! Season-long fantasy types: gameweeks, formations, and lineups.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Card, CardId, GameweekId, MatchdayError, Result, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GameweekStatus {
    Open,
    Live,
    Finished,
}

impl fmt::Display for GameweekStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Live => write!(f, "LIVE"),
            Self::Finished => write!(f, "FINISHED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gameweek {
    pub id: GameweekId,
    pub number: u32,
    pub status: GameweekStatus,
    pub deadline_at: DateTime<Utc>,
}

impl Gameweek {
    #[must_use]
    pub fn new(number: u32, deadline_at: DateTime<Utc>) -> Self {
        Self {
            id: GameweekId::new(),
            number,
            status: GameweekStatus::Open,
            deadline_at,
        }
    }

    /// Whether lineups may still be edited at `now`.
    #[must_use]
    pub fn accepts_lineups(&self, now: DateTime<Utc>) -> bool {
        self.status == GameweekStatus::Open && now < self.deadline_at
    }
}

// ---------------------------------------------------------------------------
// Formation
// ---------------------------------------------------------------------------

/// Supported season formations, named DEF-MID-FWD (one GK implied).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Formation {
    #[serde(rename = "3-4-3")]
    F343,
    #[serde(rename = "3-5-2")]
    F352,
    #[serde(rename = "4-3-3")]
    F433,
    #[serde(rename = "4-4-2")]
    F442,
    #[serde(rename = "4-5-1")]
    F451,
    #[serde(rename = "5-3-2")]
    F532,
    #[serde(rename = "5-4-1")]
    F541,
}

impl Formation {
    pub const ALL: [Self; 7] = [
        Self::F343,
        Self::F352,
        Self::F433,
        Self::F442,
        Self::F451,
        Self::F532,
        Self::F541,
    ];

    /// Required starters per position, `[GK, DEF, MID, FWD]`.
    #[must_use]
    pub fn requirement(self) -> [usize; 4] {
        match self {
            Self::F343 => [1, 3, 4, 3],
            Self::F352 => [1, 3, 5, 2],
            Self::F433 => [1, 4, 3, 3],
            Self::F442 => [1, 4, 4, 2],
            Self::F451 => [1, 4, 5, 1],
            Self::F532 => [1, 5, 3, 2],
            Self::F541 => [1, 5, 4, 1],
        }
    }

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::F343 => "3-4-3",
            Self::F352 => "3-5-2",
            Self::F433 => "4-3-3",
            Self::F442 => "4-4-2",
            Self::F451 => "4-5-1",
            Self::F532 => "5-3-2",
            Self::F541 => "5-4-1",
        }
    }
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Formation {
    type Err = MatchdayError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.code() == s.trim())
            .ok_or_else(|| MatchdayError::formation(format!("unknown formation {s:?}")))
    }
}

// ---------------------------------------------------------------------------
// Lineup
// ---------------------------------------------------------------------------

/// Lineup lifecycle. Monotonic: DRAFT → SAVED → LOCKED; SAVED may be re-saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LineupStatus {
    Draft,
    Saved,
    Locked,
}

impl fmt::Display for LineupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "DRAFT"),
            Self::Saved => write!(f, "SAVED"),
            Self::Locked => write!(f, "LOCKED"),
        }
    }
}

/// Lineup header for one user in one gameweek.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lineup {
    pub user_id: UserId,
    pub gameweek_id: GameweekId,
    pub formation: Formation,
    pub captain_id: CardId,
    pub score_total: f64,
    pub status: LineupStatus,
    /// Slots currently holding a player document.
    pub slots: Vec<u8>,
    pub updated_at: DateTime<Utc>,
}

impl Lineup {
    /// Move the status to `next`.
    ///
    /// # Errors
    /// Returns `LineupLocked` once LOCKED, and `IllegalTransition` for any
    /// other backwards move.
    pub fn advance(&mut self, next: LineupStatus) -> Result<()> {
        if self.status == LineupStatus::Locked {
            return Err(MatchdayError::LineupLocked(self.gameweek_id));
        }
        if next < self.status {
            return Err(MatchdayError::IllegalTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }
}

/// One slot of a season lineup. Slots 1–11 are starters, 12–15 the bench.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineupPlayer {
    pub card_id: CardId,
    pub card: Card,
    pub position_slot: u8,
    pub is_subbed_in: bool,
}

impl LineupPlayer {
    #[must_use]
    pub fn is_starter(&self) -> bool {
        (1..=crate::constants::FANTASY_STARTERS as u8).contains(&self.position_slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lineup(status: LineupStatus) -> Lineup {
        Lineup {
            user_id: UserId::new(),
            gameweek_id: GameweekId::new(),
            formation: Formation::F442,
            captain_id: CardId::new(),
            score_total: 0.0,
            status,
            slots: vec![],
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn formation_table_sums_to_eleven() {
        for formation in Formation::ALL {
            let total: usize = formation.requirement().iter().sum();
            assert_eq!(total, 11, "{formation}");
            assert_eq!(formation.requirement()[0], 1);
        }
    }

    #[test]
    fn formation_parses_codes() {
        assert_eq!("4-3-3".parse::<Formation>().unwrap(), Formation::F433);
        assert_eq!(Formation::F433.requirement(), [1, 4, 3, 3]);
        assert!("2-3-5".parse::<Formation>().is_err());
    }

    #[test]
    fn formation_serde_uses_codes() {
        let json = serde_json::to_string(&Formation::F532).unwrap();
        assert_eq!(json, "\"5-3-2\"");
    }

    #[test]
    fn locked_never_regresses() {
        let mut l = lineup(LineupStatus::Locked);
        assert!(matches!(
            l.advance(LineupStatus::Saved),
            Err(MatchdayError::LineupLocked(_))
        ));
        assert!(l.advance(LineupStatus::Locked).is_err());
    }

    #[test]
    fn saved_can_be_resaved_and_locked() {
        let mut l = lineup(LineupStatus::Saved);
        l.advance(LineupStatus::Saved).unwrap();
        assert!(l.advance(LineupStatus::Draft).is_err());
        l.advance(LineupStatus::Locked).unwrap();
        assert_eq!(l.status, LineupStatus::Locked);
    }

    #[test]
    fn gameweek_deadline_closes_editing() {
        let mut gw = Gameweek::new(3, Utc::now() + chrono::Duration::hours(1));
        assert!(gw.accepts_lineups(Utc::now()));
        assert!(!gw.accepts_lineups(Utc::now() + chrono::Duration::hours(2)));
        gw.status = GameweekStatus::Live;
        assert!(!gw.accepts_lineups(Utc::now()));
    }
}
