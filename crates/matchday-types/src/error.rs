//! Error types for the Matchday economy engine.
//!
//! All errors use the `MD_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Missing documents
//! - 2xx: Funds
//! - 3xx: Preconditions (wrong state, invalid input)
//! - 4xx: Authorization
//! - 5xx: Ledger / transaction errors
//! - 9xx: General / internal errors
//!
//! Display strings are short enough to be shown to a player as-is.

use std::fmt;

use thiserror::Error;

use crate::{CardId, GameweekId, ListingId, PackId, PlayerRefId, TournamentId, UserId};

/// Coarse failure taxonomy shared by every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A referenced document is absent.
    NotFound,
    /// The document exists but is in the wrong state, or the input is invalid.
    PreconditionFailed,
    /// A wallet cannot cover the debit.
    InsufficientFunds,
    /// The caller does not own the resource.
    Unauthorized,
    /// Transaction contention beyond the retry budget.
    ConflictRetryExhausted,
    /// Storage, serialization, or configuration failures.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::PreconditionFailed => write!(f, "PRECONDITION_FAILED"),
            Self::InsufficientFunds => write!(f, "INSUFFICIENT_FUNDS"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::ConflictRetryExhausted => write!(f, "CONFLICT_RETRY_EXHAUSTED"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// Central error enum for all Matchday operations.
#[derive(Debug, Error)]
pub enum MatchdayError {
    // =================================================================
    // Not Found (1xx)
    // =================================================================
    #[error("MD_ERR_100: Pack not found: {0}")]
    PackNotFound(PackId),

    /// The user has no wallet / profile document.
    #[error("MD_ERR_101: Profile not found: {0}")]
    ProfileNotFound(UserId),

    #[error("MD_ERR_102: Card not found: {0}")]
    CardNotFound(CardId),

    #[error("MD_ERR_103: Listing not found: {0}")]
    ListingNotFound(ListingId),

    /// The seller's wallet disappeared between listing and sale.
    #[error("MD_ERR_104: Seller profile missing: {0}")]
    SellerProfileMissing(UserId),

    #[error("MD_ERR_105: Tournament not found: {0}")]
    TournamentNotFound(TournamentId),

    #[error("MD_ERR_106: No entry for {user} in {tournament}")]
    EntryNotFound {
        tournament: TournamentId,
        user: UserId,
    },

    #[error("MD_ERR_107: Gameweek not found: {0}")]
    GameweekNotFound(GameweekId),

    #[error("MD_ERR_108: No lineup for {user} in {gameweek}")]
    LineupNotFound { gameweek: GameweekId, user: UserId },

    // =================================================================
    // Funds (2xx)
    // =================================================================
    /// Not enough coins to perform the operation.
    #[error("MD_ERR_200: Insufficient balance: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    /// A credit would overflow the wallet.
    #[error("MD_ERR_201: Balance overflow")]
    BalanceOverflow,

    // =================================================================
    // Preconditions (3xx)
    // =================================================================
    #[error("MD_ERR_300: Pack sold out: {0}")]
    OutOfStock(PackId),

    #[error("MD_ERR_301: Listing price must be positive")]
    InvalidPrice,

    /// The card is already referenced by an active listing.
    #[error("MD_ERR_302: Card is locked in an active listing: {0}")]
    AlreadyLocked(CardId),

    /// Cancel attempted on a listing that is SOLD or CANCELLED.
    #[error("MD_ERR_303: Listing already finalized: {0}")]
    AlreadyFinalized(ListingId),

    /// Purchase attempted on a listing that is not ACTIVE.
    #[error("MD_ERR_304: Listing no longer available: {0}")]
    NotAvailable(ListingId),

    #[error("MD_ERR_305: Cannot buy your own listing")]
    SelfTrade,

    #[error("MD_ERR_306: Tournament is not open: {0}")]
    TournamentNotOpen(TournamentId),

    #[error("MD_ERR_307: Already joined tournament: {0}")]
    AlreadyJoined(TournamentId),

    #[error("MD_ERR_308: Select exactly {expected} players (got {actual})")]
    WrongCount { expected: usize, actual: usize },

    /// Anti-cheat: the player is not in the entrant's own draft pool.
    #[error("MD_ERR_309: Player not in your draft pool: {0}")]
    InvalidPlayer(PlayerRefId),

    #[error("MD_ERR_310: Player selected twice: {0}")]
    DuplicatePlayer(PlayerRefId),

    #[error("MD_ERR_311: Invalid formation: {reason}")]
    FormationInvalid { reason: String },

    #[error("MD_ERR_312: Lineup is locked for {0}")]
    LineupLocked(GameweekId),

    /// Card missing, owned by someone else, or locked in a listing.
    #[error("MD_ERR_313: Card unavailable: {0}")]
    CardUnavailable(CardId),

    #[error("MD_ERR_314: Not enough {tier} players to draft (need {needed}, have {available})")]
    PlayerPoolTooSmall {
        tier: String,
        needed: usize,
        available: usize,
    },

    #[error("MD_ERR_315: No active players to mint from")]
    EmptyPlayerPool,

    /// An entity constructor rejected its inputs.
    #[error("MD_ERR_316: Invalid {entity}: {reason}")]
    InvalidEntity { entity: &'static str, reason: String },

    /// A status change that would move a state machine backwards.
    #[error("MD_ERR_317: Illegal transition from {from} to {to}")]
    IllegalTransition { from: String, to: String },

    /// A wallet already exists for this user.
    #[error("MD_ERR_318: Profile already exists: {0}")]
    ProfileExists(UserId),

    // =================================================================
    // Authorization (4xx)
    // =================================================================
    #[error("MD_ERR_400: {caller} is not the owner")]
    NotOwner { caller: UserId },

    // =================================================================
    // Ledger (5xx)
    // =================================================================
    /// Optimistic commit failed because a read document changed. Retryable.
    #[error("MD_ERR_500: Commit conflict on {key}")]
    CommitConflict { key: String },

    #[error("MD_ERR_501: Transaction contention: gave up after {attempts} attempts")]
    ConflictRetryExhausted { attempts: u32 },

    #[error("MD_ERR_502: Ledger unavailable: {0}")]
    LedgerUnavailable(String),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    #[error("MD_ERR_900: Internal error: {0}")]
    Internal(String),

    #[error("MD_ERR_901: Serialization error: {0}")]
    Serialization(String),

    #[error("MD_ERR_902: Configuration error: {0}")]
    Configuration(String),

    #[error("MD_ERR_903: I/O error: {0}")]
    Io(String),
}

impl MatchdayError {
    /// Map this error onto the coarse taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PackNotFound(_)
            | Self::ProfileNotFound(_)
            | Self::CardNotFound(_)
            | Self::ListingNotFound(_)
            | Self::SellerProfileMissing(_)
            | Self::TournamentNotFound(_)
            | Self::EntryNotFound { .. }
            | Self::GameweekNotFound(_)
            | Self::LineupNotFound { .. } => ErrorKind::NotFound,

            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,

            Self::BalanceOverflow
            | Self::OutOfStock(_)
            | Self::InvalidPrice
            | Self::AlreadyLocked(_)
            | Self::AlreadyFinalized(_)
            | Self::NotAvailable(_)
            | Self::SelfTrade
            | Self::TournamentNotOpen(_)
            | Self::AlreadyJoined(_)
            | Self::WrongCount { .. }
            | Self::InvalidPlayer(_)
            | Self::DuplicatePlayer(_)
            | Self::FormationInvalid { .. }
            | Self::LineupLocked(_)
            | Self::CardUnavailable(_)
            | Self::PlayerPoolTooSmall { .. }
            | Self::EmptyPlayerPool
            | Self::InvalidEntity { .. }
            | Self::IllegalTransition { .. }
            | Self::ProfileExists(_) => ErrorKind::PreconditionFailed,

            Self::NotOwner { .. } => ErrorKind::Unauthorized,

            Self::ConflictRetryExhausted { .. } => ErrorKind::ConflictRetryExhausted,

            Self::CommitConflict { .. }
            | Self::LedgerUnavailable(_)
            | Self::Internal(_)
            | Self::Serialization(_)
            | Self::Configuration(_)
            | Self::Io(_) => ErrorKind::Internal,
        }
    }

    /// Whether re-running the whole transaction may succeed.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::CommitConflict { .. })
    }

    /// Shorthand for [`MatchdayError::FormationInvalid`].
    pub fn formation(reason: impl Into<String>) -> Self {
        Self::FormationInvalid {
            reason: reason.into(),
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, MatchdayError>;

impl From<std::io::Error> for MatchdayError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MatchdayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = MatchdayError::OutOfStock(PackId::new());
        let msg = format!("{err}");
        assert!(msg.starts_with("MD_ERR_300"), "Got: {msg}");
        assert!(msg.contains("sold out"));
    }

    #[test]
    fn insufficient_funds_display() {
        let err = MatchdayError::InsufficientFunds {
            needed: 500,
            available: 120,
        };
        let msg = format!("{err}");
        assert!(msg.contains("Insufficient balance"));
        assert!(msg.contains("500"));
        assert!(msg.contains("120"));
    }

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            MatchdayError::CardNotFound(CardId::new()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            MatchdayError::SellerProfileMissing(UserId::new()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            MatchdayError::AlreadyFinalized(ListingId::new()).kind(),
            ErrorKind::PreconditionFailed
        );
        assert_eq!(
            MatchdayError::NotOwner {
                caller: UserId::new()
            }
            .kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            MatchdayError::ConflictRetryExhausted { attempts: 3 }.kind(),
            ErrorKind::ConflictRetryExhausted
        );
    }

    #[test]
    fn only_commit_conflicts_are_retryable() {
        assert!(
            MatchdayError::CommitConflict {
                key: "packs/x".into()
            }
            .is_conflict()
        );
        assert!(!MatchdayError::ConflictRetryExhausted { attempts: 8 }.is_conflict());
        assert!(!MatchdayError::SelfTrade.is_conflict());
    }

    #[test]
    fn all_errors_have_md_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(MatchdayError::InvalidPrice),
            Box::new(MatchdayError::EmptyPlayerPool),
            Box::new(MatchdayError::Internal("test".into())),
            Box::new(MatchdayError::WrongCount {
                expected: 5,
                actual: 4,
            }),
            Box::new(MatchdayError::formation("GK 0 < 1")),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("MD_ERR_"),
                "Error missing MD_ERR_ prefix: {msg}"
            );
        }
    }
}
