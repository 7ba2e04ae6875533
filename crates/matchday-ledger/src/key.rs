//! Hierarchical document keys.
//!
//! Keys are opaque to the ledger; the builders below are the only place the
//! economy's document layout is spelled out.

use std::fmt;

use matchday_types::{CardId, GameweekId, ListingId, PackId, TournamentId, UserId};

/// Address of one document, e.g. `users/0190.../wallet`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct DocKey(String);

impl DocKey {
    /// Join path segments with `/`.
    #[must_use]
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = segments
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("/");
        Self(joined)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    // -- user-scoped ------------------------------------------------------

    #[must_use]
    pub fn wallet(user: UserId) -> Self {
        Self(format!("users/{}/wallet", user.0))
    }

    #[must_use]
    pub fn card(owner: UserId, card: CardId) -> Self {
        Self(format!("users/{}/cards/{}", owner.0, card.0))
    }

    /// Index of card ids held by `owner`.
    #[must_use]
    pub fn card_index(owner: UserId) -> Self {
        Self(format!("users/{}/card_index", owner.0))
    }

    #[must_use]
    pub fn blitz_entry(user: UserId, tournament: TournamentId) -> Self {
        Self(format!("users/{}/blitz_entries/{}", user.0, tournament.0))
    }

    #[must_use]
    pub fn lineup(user: UserId, gameweek: GameweekId) -> Self {
        Self(format!("users/{}/lineups/{}", user.0, gameweek.0))
    }

    #[must_use]
    pub fn lineup_player(user: UserId, gameweek: GameweekId, slot: u8) -> Self {
        Self(format!("users/{}/lineups/{}/players/{slot}", user.0, gameweek.0))
    }

    // -- global -----------------------------------------------------------

    #[must_use]
    pub fn pack(pack: PackId) -> Self {
        Self(format!("bank/packs/{}", pack.0))
    }

    #[must_use]
    pub fn listing(listing: ListingId) -> Self {
        Self(format!("market/listings/{}", listing.0))
    }

    #[must_use]
    pub fn tournament(tournament: TournamentId) -> Self {
        Self(format!("blitz/tournaments/{}", tournament.0))
    }

    #[must_use]
    pub fn gameweek(gameweek: GameweekId) -> Self {
        Self(format!("fantasy/gameweeks/{}", gameweek.0))
    }
}

impl fmt::Display for DocKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_keys_share_prefix() {
        let user = UserId::from_bytes([1u8; 16]);
        let prefix = format!("users/{}/", user.0);
        assert!(DocKey::wallet(user).as_str().starts_with(&prefix));
        assert!(DocKey::card_index(user).as_str().starts_with(&prefix));
        assert!(DocKey::card(user, CardId::new()).as_str().starts_with(&prefix));
    }

    #[test]
    fn from_segments_joins() {
        let key = DocKey::from_segments(["bank", "packs", "starter"]);
        assert_eq!(key.as_str(), "bank/packs/starter");
    }

    #[test]
    fn lineup_player_keys_differ_by_slot() {
        let user = UserId::new();
        let gw = GameweekId::new();
        assert_ne!(
            DocKey::lineup_player(user, gw, 1),
            DocKey::lineup_player(user, gw, 2)
        );
    }
}
