//! Season-long fantasy lineups.
//!
//! A lineup is a header document plus one document per occupied slot. A
//! save writes the header and every slot in one transaction and deletes
//! slots the previous save used but this one does not.

use chrono::Utc;
use matchday_economy::{CardRegistry, WalletService};
use matchday_ledger::{DocKey, Ledger, Transaction, TxnRunner};
use matchday_types::{
    CardId, EconomyConfig, Formation, Gameweek, GameweekId, Lineup, LineupPlayer, LineupStatus,
    MatchdayError, Result, UserId,
};
use serde::{Deserialize, Serialize};

use crate::formation::validate_formation;

/// One requested card placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineupPick {
    pub card_id: CardId,
    /// 1–11 start, 12–15 on the bench.
    pub position_slot: u8,
}

impl LineupPick {
    #[must_use]
    pub fn new(card_id: CardId, position_slot: u8) -> Self {
        Self {
            card_id,
            position_slot,
        }
    }
}

/// Gameweeks and per-user season lineups.
pub struct FantasyService<'l> {
    runner: TxnRunner<'l>,
}

impl<'l> FantasyService<'l> {
    #[must_use]
    pub fn new(ledger: &'l dyn Ledger, config: &EconomyConfig) -> Self {
        Self {
            runner: TxnRunner::new(ledger, config.max_commit_attempts),
        }
    }

    pub fn create_gameweek(&self, gameweek: &Gameweek) -> Result<GameweekId> {
        self.runner.run("create_gameweek", |txn| {
            txn.create(&DocKey::gameweek(gameweek.id), gameweek)
        })?;
        tracing::info!(gameweek = %gameweek.id, number = gameweek.number, "Gameweek created");
        Ok(gameweek.id)
    }

    pub fn get_gameweek(&self, gameweek_id: GameweekId) -> Result<Gameweek> {
        self.runner
            .run("get_gameweek", |txn| Self::load_gameweek(txn, gameweek_id))
    }

    /// Validate and store `user`'s lineup for a gameweek.
    ///
    /// # Errors
    /// - `GameweekNotFound`
    /// - `ProfileNotFound` if `user` has no wallet
    /// - `LineupLocked` if the lineup is LOCKED, or the gameweek has left
    ///   OPEN or passed its deadline
    /// - `CardUnavailable` for a card the user does not hold or has listed
    /// - `FormationInvalid` if the squad breaks a composition rule or the
    ///   captain is not a starter
    pub fn save_lineup(
        &self,
        gameweek_id: GameweekId,
        user: UserId,
        formation: Formation,
        captain_id: CardId,
        picks: &[LineupPick],
    ) -> Result<Lineup> {
        let lineup = self.runner.run("save_lineup", |txn| {
            let gameweek = Self::load_gameweek(txn, gameweek_id)?;
            WalletService::get(txn, user)?;
            let header_key = DocKey::lineup(user, gameweek_id);
            let existing: Option<Lineup> = txn.read(&header_key)?;
            if existing
                .as_ref()
                .is_some_and(|l| l.status == LineupStatus::Locked)
                || !gameweek.accepts_lineups(Utc::now())
            {
                return Err(MatchdayError::LineupLocked(gameweek_id));
            }

            let mut players = Vec::with_capacity(picks.len());
            for pick in picks {
                if !CardRegistry::is_card_available(txn, user, pick.card_id)? {
                    return Err(MatchdayError::CardUnavailable(pick.card_id));
                }
                let card = CardRegistry::get(txn, user, pick.card_id)?;
                players.push(LineupPlayer {
                    card_id: pick.card_id,
                    card,
                    position_slot: pick.position_slot,
                    is_subbed_in: false,
                });
            }
            validate_formation(formation, &players)?;
            if !players
                .iter()
                .any(|p| p.card_id == captain_id && p.is_starter())
            {
                return Err(MatchdayError::formation(format!(
                    "captain {captain_id} must be one of the starters"
                )));
            }

            let mut slots: Vec<u8> = players.iter().map(|p| p.position_slot).collect();
            slots.sort_unstable();
            let lineup = match existing {
                Some(mut previous) => {
                    for stale in previous.slots.iter().filter(|s| !slots.contains(s)) {
                        txn.delete(&DocKey::lineup_player(user, gameweek_id, *stale));
                    }
                    previous.advance(LineupStatus::Saved)?;
                    Lineup {
                        formation,
                        captain_id,
                        slots,
                        updated_at: Utc::now(),
                        ..previous
                    }
                }
                None => Lineup {
                    user_id: user,
                    gameweek_id,
                    formation,
                    captain_id,
                    score_total: 0.0,
                    status: LineupStatus::Saved,
                    slots,
                    updated_at: Utc::now(),
                },
            };

            for player in &players {
                txn.write(
                    &DocKey::lineup_player(user, gameweek_id, player.position_slot),
                    player,
                )?;
            }
            txn.write(&header_key, &lineup)?;
            Ok(lineup)
        })?;

        tracing::info!(
            gameweek = %gameweek_id,
            user = %user,
            formation = %formation,
            players = lineup.slots.len(),
            "Lineup saved"
        );
        Ok(lineup)
    }

    /// Freeze a lineup. LOCKED is final.
    ///
    /// # Errors
    /// - `LineupNotFound`
    /// - `LineupLocked` if it is already LOCKED
    pub fn lock_lineup(&self, gameweek_id: GameweekId, user: UserId) -> Result<Lineup> {
        let lineup = self.runner.run("lock_lineup", |txn| {
            let mut lineup = Self::load_lineup(txn, gameweek_id, user)?;
            lineup.advance(LineupStatus::Locked)?;
            lineup.updated_at = Utc::now();
            txn.write(&DocKey::lineup(user, gameweek_id), &lineup)?;
            Ok(lineup)
        })?;
        tracing::info!(gameweek = %gameweek_id, user = %user, "Lineup locked");
        Ok(lineup)
    }

    /// The lineup header and its players in slot order.
    pub fn get_lineup(
        &self,
        gameweek_id: GameweekId,
        user: UserId,
    ) -> Result<(Lineup, Vec<LineupPlayer>)> {
        self.runner.run("get_lineup", |txn| {
            let lineup = Self::load_lineup(txn, gameweek_id, user)?;
            let mut players = Vec::with_capacity(lineup.slots.len());
            for slot in &lineup.slots {
                let player: LineupPlayer = txn
                    .read(&DocKey::lineup_player(user, gameweek_id, *slot))?
                    .ok_or_else(|| {
                        MatchdayError::Internal(format!(
                            "lineup slot {slot} missing for {user} in {gameweek_id}"
                        ))
                    })?;
                players.push(player);
            }
            Ok((lineup, players))
        })
    }

    fn load_gameweek(txn: &mut Transaction<'_>, gameweek_id: GameweekId) -> Result<Gameweek> {
        txn.read(&DocKey::gameweek(gameweek_id))?
            .ok_or(MatchdayError::GameweekNotFound(gameweek_id))
    }

    fn load_lineup(
        txn: &mut Transaction<'_>,
        gameweek_id: GameweekId,
        user: UserId,
    ) -> Result<Lineup> {
        txn.read(&DocKey::lineup(user, gameweek_id))?
            .ok_or(MatchdayError::LineupNotFound {
                gameweek: gameweek_id,
                user,
            })
    }
}
