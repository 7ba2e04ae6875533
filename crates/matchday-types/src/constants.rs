//! Economy tables and contest rules for the Matchday engine.
//!
//! These values are part of the product's economic contract and must not be
//! re-derived at call sites.

use rust_decimal::Decimal;

/// Market tax withheld from every sale (0.10). The taxed amount is burned.
pub const MARKET_TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Maximum supply of a LEGENDARY card.
pub const LEGENDARY_MAX_SUPPLY: u32 = 1;

/// Maximum supply of an EPIC card.
pub const EPIC_MAX_SUPPLY: u32 = 10;

/// Maximum supply of a RARE card.
pub const RARE_MAX_SUPPLY: u32 = 100;

/// Upper bound of the serial range drawn for COMMON cards (unlimited supply).
pub const COMMON_SERIAL_CEILING: u32 = 10_000;

/// Default number of commit attempts before `ConflictRetryExhausted`.
pub const DEFAULT_MAX_COMMIT_ATTEMPTS: u32 = 8;

// ---------------------------------------------------------------------------
// Blitz
// ---------------------------------------------------------------------------

/// Players with `base_value >= GOLD_THRESHOLD` are GOLD tier.
pub const BLITZ_GOLD_THRESHOLD: u32 = 4_000;

/// Players with `SILVER_THRESHOLD <= base_value < GOLD_THRESHOLD` are SILVER tier.
pub const BLITZ_SILVER_THRESHOLD: u32 = 2_000;

/// Players sampled per tier when building a draft pool.
pub const BLITZ_PICKS_PER_TIER: usize = 5;

/// Size of a finished draft pool (3 tiers × 5 picks).
pub const BLITZ_POOL_SIZE: usize = 15;

/// Number of players in a submitted Blitz lineup.
pub const BLITZ_LINEUP_SIZE: usize = 5;

/// Minimum positional coverage over the draft pool: `[GK, DEF, MID, FWD]`.
pub const BLITZ_POOL_MINIMUMS: [usize; 4] = [2, 2, 4, 2];

/// Exact positional counts of the fixed 1-1-2-1 lineup: `[GK, DEF, MID, FWD]`.
pub const BLITZ_FORMATION: [usize; 4] = [1, 1, 2, 1];

/// Upper bound on positional repair swaps per draft pool.
pub const BLITZ_MAX_REPAIR_ATTEMPTS: usize = 32;

// ---------------------------------------------------------------------------
// Fantasy
// ---------------------------------------------------------------------------

/// Number of starters in a season lineup (slots 1..=11).
pub const FANTASY_STARTERS: usize = 11;

/// Total squad slots (starters + bench).
pub const FANTASY_SQUAD_SLOTS: u8 = 15;

/// Global floor for starters, independent of the formation table.
pub const FANTASY_MIN_GK: usize = 1;
pub const FANTASY_MIN_DEF: usize = 3;
pub const FANTASY_MIN_FWD: usize = 1;
