//! Wallet service.
//!
//! Debits and credits run inside the caller's transaction and never commit
//! on their own. `open_account` and `balance_of` are single-document
//! operations that open their own transaction.

use matchday_ledger::{DocKey, Transaction, TxnRunner};
use matchday_types::{MatchdayError, Result, UserId, Wallet};

/// Coin balance operations.
pub struct WalletService;

impl WalletService {
    /// Create a wallet holding `coins`.
    ///
    /// # Errors
    /// Returns `ProfileExists` if the user already has a wallet.
    pub fn open(txn: &mut Transaction<'_>, user: UserId, coins: u64) -> Result<Wallet> {
        let key = DocKey::wallet(user);
        if txn.read_value(&key)?.is_some() {
            return Err(MatchdayError::ProfileExists(user));
        }
        let wallet = Wallet::new(user, coins);
        txn.write(&key, &wallet)?;
        Ok(wallet)
    }

    /// # Errors
    /// Returns `ProfileNotFound` if the user has no wallet.
    pub fn get(txn: &mut Transaction<'_>, user: UserId) -> Result<Wallet> {
        txn.read(&DocKey::wallet(user))?
            .ok_or(MatchdayError::ProfileNotFound(user))
    }

    pub fn balance(txn: &mut Transaction<'_>, user: UserId) -> Result<u64> {
        Ok(Self::get(txn, user)?.coins)
    }

    /// Remove `amount` coins from `user`'s wallet.
    ///
    /// # Errors
    /// - `ProfileNotFound` if the user has no wallet
    /// - `InsufficientFunds` if the balance is below `amount`
    pub fn debit(txn: &mut Transaction<'_>, user: UserId, amount: u64) -> Result<Wallet> {
        let mut wallet = Self::get(txn, user)?;
        wallet.debit(amount)?;
        txn.write(&DocKey::wallet(user), &wallet)?;
        Ok(wallet)
    }

    /// Add `amount` coins to `user`'s wallet.
    ///
    /// # Errors
    /// Returns `ProfileNotFound` if the user has no wallet.
    pub fn credit(txn: &mut Transaction<'_>, user: UserId, amount: u64) -> Result<Wallet> {
        let mut wallet = Self::get(txn, user)?;
        wallet.credit(amount)?;
        txn.write(&DocKey::wallet(user), &wallet)?;
        Ok(wallet)
    }

    /// Onboard a user with a starting balance in its own transaction.
    pub fn open_account(runner: &TxnRunner<'_>, user: UserId, coins: u64) -> Result<Wallet> {
        let wallet = runner.run("open_account", |txn| Self::open(txn, user, coins))?;
        tracing::info!(user = %user, coins, "Wallet opened");
        Ok(wallet)
    }

    /// Current balance, read in its own transaction.
    pub fn balance_of(runner: &TxnRunner<'_>, user: UserId) -> Result<u64> {
        runner.run("balance_of", |txn| Self::balance(txn, user))
    }
}
