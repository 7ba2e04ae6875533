//! Team-composition rules.
//!
//! Blitz lineups are a fixed 1-1-2-1 (GK, DEF, MID, FWD). Season lineups
//! pick one of seven formations for slots 1–11 and keep up to four
//! substitutes on slots 12–15.

use std::collections::HashSet;

use matchday_types::constants::{
    BLITZ_FORMATION, BLITZ_LINEUP_SIZE, FANTASY_MIN_DEF, FANTASY_MIN_FWD, FANTASY_MIN_GK,
    FANTASY_SQUAD_SLOTS, FANTASY_STARTERS,
};
use matchday_types::{
    DraftCard, Formation, LineupPlayer, MatchdayError, Position, Result, position_counts,
};

/// Check a Blitz lineup against the 1-1-2-1 formation.
///
/// # Errors
/// - `WrongCount` unless exactly five cards
/// - `FormationInvalid` if any position count differs
pub fn validate_blitz_lineup(cards: &[&DraftCard]) -> Result<()> {
    if cards.len() != BLITZ_LINEUP_SIZE {
        return Err(MatchdayError::WrongCount {
            expected: BLITZ_LINEUP_SIZE,
            actual: cards.len(),
        });
    }
    let counts = position_counts(cards.iter().map(|c| &c.player.position));
    for position in Position::ALL {
        let (have, need) = (counts[position.index()], BLITZ_FORMATION[position.index()]);
        if have != need {
            return Err(MatchdayError::formation(format!(
                "Blitz lineup needs {need} {position}, got {have}"
            )));
        }
    }
    Ok(())
}

/// Check a season lineup against `formation`.
///
/// Only starters (slots 1–11) count towards the formation. The global floor
/// of one goalkeeper, three defenders and one forward is checked on its own
/// as well.
///
/// # Errors
/// `FormationInvalid` describing the first rule broken.
pub fn validate_formation(formation: Formation, players: &[LineupPlayer]) -> Result<()> {
    if players.len() > usize::from(FANTASY_SQUAD_SLOTS) {
        return Err(MatchdayError::formation(format!(
            "squad has {} players, maximum is {FANTASY_SQUAD_SLOTS}",
            players.len()
        )));
    }

    let mut slots = HashSet::new();
    let mut cards = HashSet::new();
    for p in players {
        if !(1..=FANTASY_SQUAD_SLOTS).contains(&p.position_slot) {
            return Err(MatchdayError::formation(format!(
                "slot {} outside 1-{FANTASY_SQUAD_SLOTS}",
                p.position_slot
            )));
        }
        if !slots.insert(p.position_slot) {
            return Err(MatchdayError::formation(format!(
                "slot {} used twice",
                p.position_slot
            )));
        }
        if !cards.insert(p.card_id) {
            return Err(MatchdayError::formation(format!(
                "card {} picked twice",
                p.card_id
            )));
        }
    }

    let starters: Vec<&LineupPlayer> = players.iter().filter(|p| p.is_starter()).collect();
    if starters.len() != FANTASY_STARTERS {
        return Err(MatchdayError::formation(format!(
            "need {FANTASY_STARTERS} starters, got {}",
            starters.len()
        )));
    }

    let counts = position_counts(starters.iter().map(|p| &p.card.player.position));
    let floor = [
        (Position::Goalkeeper, FANTASY_MIN_GK),
        (Position::Defender, FANTASY_MIN_DEF),
        (Position::Forward, FANTASY_MIN_FWD),
    ];
    for (position, min) in floor {
        if counts[position.index()] < min {
            return Err(MatchdayError::formation(format!(
                "at least {min} {position} required, got {}",
                counts[position.index()]
            )));
        }
    }

    let required = formation.requirement();
    for position in Position::ALL {
        let (have, need) = (counts[position.index()], required[position.index()]);
        if have != need {
            return Err(MatchdayError::formation(format!(
                "{formation} needs {need} {position}, got {have}"
            )));
        }
    }
    Ok(())
}
