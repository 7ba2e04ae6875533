//! # matchday-types
//!
//! Shared entities, errors, and configuration for the **Matchday** economy.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`UserId`], [`CardId`], [`PackId`], [`ListingId`], [`TournamentId`], [`GameweekId`], [`PlayerRefId`]
//! - **Reference data**: [`Player`], [`Position`], [`CatalogPlayer`], [`PlayerCatalog`]
//! - **Economy model**: [`Wallet`], [`Card`], [`Scarcity`], [`MaxSupply`], [`Pack`], [`PackSlot`], [`Listing`], [`ListingStatus`]
//! - **Blitz model**: [`Tournament`], [`TournamentStatus`], [`BlitzEntry`], [`DraftCard`], [`DraftTier`]
//! - **Fantasy model**: [`Gameweek`], [`Lineup`], [`LineupStatus`], [`LineupPlayer`]
//! - **Configuration**: [`EngineConfig`], [`EconomyConfig`], [`BlitzConfig`]
//! - **Errors**: [`MatchdayError`] with `MD_ERR_` prefix codes and the [`ErrorKind`] taxonomy
//! - **Constants**: economy tables and contest rules

pub mod blitz;
pub mod card;
pub mod config;
pub mod constants;
pub mod error;
pub mod fantasy;
pub mod ids;
pub mod listing;
pub mod pack;
pub mod player;
pub mod wallet;

pub use blitz::*;
pub use card::*;
pub use config::*;
pub use error::*;
pub use fantasy::*;
pub use ids::*;
pub use listing::*;
pub use pack::*;
pub use player::*;
pub use wallet::*;

// Constants are accessed via `matchday_types::constants::FOO`
// (not re-exported to avoid name collisions).
