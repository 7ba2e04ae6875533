//! Bounded commit-retry runner.
//!
//! Each attempt runs the operation body against a fresh transaction. A
//! body error aborts immediately (validation failures are final); only a
//! commit conflict triggers another attempt. There is no backoff: a
//! conflict means another operation just committed, so the next snapshot
//! is already newer.

use matchday_types::{MatchdayError, Result, constants};

use crate::{Ledger, Transaction};

/// Runs operation bodies as ledger transactions.
#[derive(Clone, Copy)]
pub struct TxnRunner<'l> {
    ledger: &'l dyn Ledger,
    max_attempts: u32,
}

impl<'l> TxnRunner<'l> {
    /// A runner allowing `max_attempts` commits per operation (at least one).
    #[must_use]
    pub fn new(ledger: &'l dyn Ledger, max_attempts: u32) -> Self {
        Self {
            ledger,
            max_attempts: max_attempts.max(1),
        }
    }

    /// A runner using [`constants::DEFAULT_MAX_COMMIT_ATTEMPTS`].
    #[must_use]
    pub fn with_defaults(ledger: &'l dyn Ledger) -> Self {
        Self::new(ledger, constants::DEFAULT_MAX_COMMIT_ATTEMPTS)
    }

    #[must_use]
    pub fn ledger(&self) -> &'l dyn Ledger {
        self.ledger
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `body` until it commits, fails validation, or runs out of attempts.
    ///
    /// # Errors
    /// - any error returned by `body` (nothing is written)
    /// - `ConflictRetryExhausted` after `max_attempts` conflicting commits
    pub fn run<T, F>(&self, operation: &'static str, mut body: F) -> Result<T>
    where
        F: FnMut(&mut Transaction<'l>) -> Result<T>,
    {
        for attempt in 1..=self.max_attempts {
            let mut txn = Transaction::begin(self.ledger);
            let value = body(&mut txn)?;
            match txn.commit() {
                Ok(()) => return Ok(value),
                Err(err) if err.is_conflict() => {
                    tracing::debug!(
                        operation,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "Commit conflict, re-running transaction"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        tracing::warn!(
            operation,
            attempts = self.max_attempts,
            "Transaction contention: retry budget exhausted"
        );
        Err(MatchdayError::ConflictRetryExhausted {
            attempts: self.max_attempts,
        })
    }
}
