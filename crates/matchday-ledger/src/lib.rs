//! # matchday-ledger
//!
//! **Ledger Primitive**: atomic read-modify-write transactions over keyed
//! JSON documents.
//!
//! ## Architecture
//!
//! 1. **DocKey**: hierarchical document address (`users/{id}/wallet`)
//! 2. **Ledger**: the storage contract: versioned point reads and
//!    all-or-nothing conditional commits
//! 3. **Transaction**: buffers writes, records the version of every read,
//!    and hands both to the ledger at commit time
//! 4. **MemoryLedger**: in-process optimistic-concurrency implementation
//! 5. **TxnRunner**: re-runs an operation body on commit conflict, up to a
//!    bounded number of attempts
//!
//! ## Transaction Flow
//!
//! ```text
//! TxnRunner.run(body)
//!   → Transaction::begin → body(txn): read → validate → write
//!   → txn.commit() ── ok ──────────▶ return value
//!                  └─ conflict ────▶ re-run body (fresh snapshot)
//!   → attempts exhausted ──────────▶ ConflictRetryExhausted
//! ```
//!
//! A body that returns `Err` aborts the transaction: nothing it wrote is
//! ever applied.

pub mod key;
pub mod memory;
pub mod runner;
pub mod transaction;

pub use key::DocKey;
pub use memory::MemoryLedger;
pub use runner::TxnRunner;
pub use transaction::{Transaction, Version};

use std::collections::BTreeMap;

use matchday_types::Result;
use serde_json::Value;

/// A document body at a specific version.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned {
    pub version: Version,
    /// `None` if the document does not exist (never written, or deleted).
    pub body: Option<Value>,
}

/// Versions observed by a transaction, by key.
pub type ReadSet = BTreeMap<DocKey, Version>;

/// Buffered mutations: `Some` = upsert, `None` = delete.
pub type WriteSet = BTreeMap<DocKey, Option<Value>>;

/// The storage contract consumed by every economy operation.
///
/// Implementations must apply a commit atomically: either every write in the
/// set becomes visible together, or none does.
pub trait Ledger: Send + Sync {
    /// Current version and body of `key`.
    fn read(&self, key: &DocKey) -> Result<Versioned>;

    /// Apply `writes` if every key in `reads` is still at the recorded version.
    ///
    /// # Errors
    /// - `CommitConflict` if any read document changed since it was read
    /// - `LedgerUnavailable` for storage failures
    fn commit(&self, reads: &ReadSet, writes: WriteSet) -> Result<()>;
}
