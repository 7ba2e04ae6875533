//! Globally unique identifiers used throughout Matchday.
//!
//! Entity IDs use UUIDv7 for time-ordered lexicographic sorting, except
//! [`PlayerRefId`], which points into externally-owned reference data.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Declares a UUIDv7-backed identifier with a display prefix.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            #[must_use]
            pub fn from_bytes(bytes: [u8; 16]) -> Self {
                Self(Uuid::from_bytes(bytes))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Economy identifiers
// ---------------------------------------------------------------------------

uuid_id!(
    /// Unique identifier for a user profile (and its wallet).
    UserId,
    "user"
);

uuid_id!(
    /// Unique identifier for a minted card instance.
    CardId,
    "card"
);

uuid_id!(
    /// Unique identifier for a bank pack.
    PackId,
    "pack"
);

uuid_id!(
    /// Unique identifier for a marketplace listing.
    ListingId,
    "listing"
);

// ---------------------------------------------------------------------------
// Contest identifiers
// ---------------------------------------------------------------------------

uuid_id!(
    /// Unique identifier for a Blitz tournament. Also the id of each entry into it.
    TournamentId,
    "blitz"
);

uuid_id!(
    /// Unique identifier for a season gameweek.
    GameweekId,
    "gw"
);

// ---------------------------------------------------------------------------
// PlayerRefId
// ---------------------------------------------------------------------------

/// Reference to a real-world player in the external catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct PlayerRefId(pub String);

impl PlayerRefId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerRefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerRefId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
