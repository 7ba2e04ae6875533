//! Coin wallets.
//!
//! One wallet per user. Coins are unsigned, so a committed wallet can never
//! hold a negative balance; debits that would underflow are rejected.

use serde::{Deserialize, Serialize};

use crate::{MatchdayError, Result, UserId};

/// A user's Coins balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub user_id: UserId,
    pub coins: u64,
}

impl Wallet {
    #[must_use]
    pub fn new(user_id: UserId, coins: u64) -> Self {
        Self { user_id, coins }
    }

    /// Remove `amount` coins.
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if `coins < amount`; the wallet is unchanged.
    pub fn debit(&mut self, amount: u64) -> Result<()> {
        self.coins = self
            .coins
            .checked_sub(amount)
            .ok_or(MatchdayError::InsufficientFunds {
                needed: amount,
                available: self.coins,
            })?;
        Ok(())
    }

    /// Add `amount` coins.
    ///
    /// # Errors
    /// Returns `BalanceOverflow` if the balance would exceed `u64::MAX`.
    pub fn credit(&mut self, amount: u64) -> Result<()> {
        self.coins = self
            .coins
            .checked_add(amount)
            .ok_or(MatchdayError::BalanceOverflow)?;
        Ok(())
    }
}
