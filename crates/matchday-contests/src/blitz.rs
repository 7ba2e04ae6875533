//! Blitz tournament engine.
//!
//! ## Join Flow
//!
//! ```text
//! join_tournament → tournament OPEN? → not yet joined? → debit entry fee
//!                 → prize_pool += fee − rake → draft pool → entry → commit
//! ```
//!
//! Lineups can be resubmitted freely while the tournament is OPEN; each
//! submission replaces the previous one.

use std::collections::HashSet;

use matchday_economy::WalletService;
use matchday_ledger::{DocKey, Ledger, Transaction, TxnRunner};
use matchday_types::{
    BlitzConfig, BlitzEntry, DraftCard, EngineConfig, MatchdayError, PlayerCatalog, PlayerRefId,
    Result, Tournament, TournamentId, TournamentStatus, UserId,
};
use rand::Rng;

use crate::draft::DraftPoolGenerator;
use crate::formation::validate_blitz_lineup;

/// Entry, draft and lineup handling for Blitz tournaments.
pub struct BlitzEngine<'l> {
    runner: TxnRunner<'l>,
    catalog: &'l PlayerCatalog,
    config: BlitzConfig,
}

impl<'l> BlitzEngine<'l> {
    #[must_use]
    pub fn new(ledger: &'l dyn Ledger, catalog: &'l PlayerCatalog, config: &EngineConfig) -> Self {
        Self {
            runner: TxnRunner::new(ledger, config.economy.max_commit_attempts),
            catalog,
            config: config.blitz.clone(),
        }
    }

    pub fn create_tournament(&self, tournament: &Tournament) -> Result<TournamentId> {
        self.runner.run("create_tournament", |txn| {
            txn.create(&DocKey::tournament(tournament.id), tournament)
        })?;
        tracing::info!(
            tournament = %tournament.id,
            name = %tournament.name,
            entry_fee = tournament.entry_fee,
            rake_percent = tournament.rake_percent,
            "Tournament created"
        );
        Ok(tournament.id)
    }

    pub fn get_tournament(&self, tournament_id: TournamentId) -> Result<Tournament> {
        self.runner
            .run("get_tournament", |txn| Self::load(txn, tournament_id))
    }

    pub fn get_entry(&self, tournament_id: TournamentId, user: UserId) -> Result<BlitzEntry> {
        self.runner
            .run("get_entry", |txn| Self::load_entry(txn, tournament_id, user))
    }

    /// Move a tournament forward (OPEN → LIVE → FINISHED).
    ///
    /// # Errors
    /// - `TournamentNotFound`
    /// - `IllegalTransition` for a backwards or repeated move
    pub fn advance_tournament(
        &self,
        tournament_id: TournamentId,
        next: TournamentStatus,
    ) -> Result<Tournament> {
        let tournament = self.runner.run("advance_tournament", |txn| {
            let mut tournament = Self::load(txn, tournament_id)?;
            tournament.advance(next)?;
            txn.write(&DocKey::tournament(tournament_id), &tournament)?;
            Ok(tournament)
        })?;
        tracing::info!(tournament = %tournament_id, status = %next, "Tournament advanced");
        Ok(tournament)
    }

    /// Pay the entry fee and receive a fresh draft pool.
    ///
    /// # Errors
    /// - `TournamentNotFound`
    /// - `TournamentNotOpen` unless the tournament is OPEN
    /// - `AlreadyJoined` if `user` already has an entry
    /// - `ProfileNotFound` / `InsufficientFunds` for the entry fee
    /// - `PlayerPoolTooSmall` if a draft tier cannot be filled
    pub fn join_tournament<R>(
        &self,
        tournament_id: TournamentId,
        user: UserId,
        rng: &mut R,
    ) -> Result<BlitzEntry>
    where
        R: Rng + ?Sized,
    {
        let generator = DraftPoolGenerator::new(self.catalog, &self.config);

        let (entry, tournament) = self.runner.run("join_tournament", |txn| {
            let mut tournament = Self::load(txn, tournament_id)?;
            if tournament.status != TournamentStatus::Open {
                return Err(MatchdayError::TournamentNotOpen(tournament_id));
            }
            let entry_key = DocKey::blitz_entry(user, tournament_id);
            if txn.read_value(&entry_key)?.is_some() {
                return Err(MatchdayError::AlreadyJoined(tournament_id));
            }

            WalletService::debit(txn, user, tournament.entry_fee)?;
            tournament.record_entry()?;
            txn.write(&DocKey::tournament(tournament_id), &tournament)?;

            let pool = generator.generate(rng)?;
            let entry = BlitzEntry::new(tournament_id, user, pool);
            txn.write(&entry_key, &entry)?;
            Ok((entry, tournament))
        })?;

        tracing::info!(
            tournament = %tournament_id,
            user = %user,
            fee = tournament.entry_fee,
            rake = tournament.rake(),
            prize_pool = tournament.prize_pool,
            participants = tournament.participant_count,
            "Tournament joined"
        );
        Ok(entry)
    }

    /// Replace `user`'s lineup with the five pool players in `selected`.
    ///
    /// # Errors
    /// - `TournamentNotFound`, or `TournamentNotOpen` once lineups are locked
    /// - `EntryNotFound` if `user` never joined
    /// - `WrongCount` unless exactly five ids
    /// - `DuplicatePlayer` if an id repeats
    /// - `InvalidPlayer` if an id is not in the user's own pool
    /// - `FormationInvalid` unless the picks form a 1-1-2-1
    pub fn submit_lineup(
        &self,
        tournament_id: TournamentId,
        selected: &[PlayerRefId],
        user: UserId,
    ) -> Result<BlitzEntry> {
        let entry = self.runner.run("submit_lineup", |txn| {
            let tournament = Self::load(txn, tournament_id)?;
            if tournament.status != TournamentStatus::Open {
                return Err(MatchdayError::TournamentNotOpen(tournament_id));
            }
            let mut entry = Self::load_entry(txn, tournament_id, user)?;

            let lineup = pick_from_pool(&entry, selected)?;
            entry.selected_lineup = lineup;
            txn.write(&DocKey::blitz_entry(user, tournament_id), &entry)?;
            Ok(entry)
        })?;

        tracing::info!(tournament = %tournament_id, user = %user, "Blitz lineup submitted");
        Ok(entry)
    }

    fn load(txn: &mut Transaction<'_>, tournament_id: TournamentId) -> Result<Tournament> {
        txn.read(&DocKey::tournament(tournament_id))?
            .ok_or(MatchdayError::TournamentNotFound(tournament_id))
    }

    fn load_entry(
        txn: &mut Transaction<'_>,
        tournament_id: TournamentId,
        user: UserId,
    ) -> Result<BlitzEntry> {
        txn.read(&DocKey::blitz_entry(user, tournament_id))?
            .ok_or(MatchdayError::EntryNotFound {
                tournament: tournament_id,
                user,
            })
    }
}

/// Resolve `selected` against the entry's pool and check the formation.
fn pick_from_pool(entry: &BlitzEntry, selected: &[PlayerRefId]) -> Result<Vec<DraftCard>> {
    use matchday_types::constants::BLITZ_LINEUP_SIZE;

    if selected.len() != BLITZ_LINEUP_SIZE {
        return Err(MatchdayError::WrongCount {
            expected: BLITZ_LINEUP_SIZE,
            actual: selected.len(),
        });
    }
    let mut seen = HashSet::new();
    if let Some(dup) = selected.iter().find(|id| !seen.insert(*id)) {
        return Err(MatchdayError::DuplicatePlayer(dup.clone()));
    }
    let cards = selected
        .iter()
        .map(|id| {
            entry
                .pool_card(id)
                .ok_or_else(|| MatchdayError::InvalidPlayer(id.clone()))
        })
        .collect::<Result<Vec<&DraftCard>>>()?;
    validate_blitz_lineup(&cards)?;
    Ok(cards.into_iter().cloned().collect())
}
