//! # matchday-contests
//!
//! **Contests built on the economy**: short Blitz tournaments and the
//! season-long fantasy lineup.
//!
//! ## Architecture
//!
//! 1. **DraftPoolGenerator**: tiered, position-repaired 15-card draft pools
//! 2. **BlitzEngine**: tournament entry (fee, rake, prize pool) and 1-1-2-1 lineups
//! 3. **formation**: Blitz and season composition rules
//! 4. **FantasyService**: gameweeks and season lineups built from owned cards
//!
//! Entry fees go through [`matchday_economy::WalletService`] in the same
//! transaction that records the entry. Season lineups only accept cards that
//! [`matchday_economy::CardRegistry`] reports as available.

pub mod blitz;
pub mod draft;
pub mod fantasy;
pub mod formation;

pub use blitz::BlitzEngine;
pub use draft::DraftPoolGenerator;
pub use fantasy::{FantasyService, LineupPick};
pub use formation::{validate_blitz_lineup, validate_formation};
