//! Optimistic transactions.
//!
//! A transaction reads through to the ledger once per key, then serves
//! repeat reads from its own snapshot. Writes are buffered and become
//! visible to later reads in the same transaction only. At commit, the
//! versions of everything read are handed to the ledger together with the
//! write set; if any of those documents moved, the commit is rejected and
//! the caller re-runs the whole operation.

use std::collections::BTreeMap;
use std::fmt;

use matchday_types::{MatchdayError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{DocKey, Ledger, ReadSet, Versioned, WriteSet};

/// Monotonic per-document version. `Version(0)` means "never written".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Default)]
pub struct Version(pub u64);

impl Version {
    pub const ABSENT: Self = Self(0);

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// One in-flight read-modify-write unit against a [`Ledger`].
pub struct Transaction<'l> {
    ledger: &'l dyn Ledger,
    snapshot: BTreeMap<DocKey, Versioned>,
    writes: WriteSet,
}

impl<'l> Transaction<'l> {
    #[must_use]
    pub fn begin(ledger: &'l dyn Ledger) -> Self {
        Self {
            ledger,
            snapshot: BTreeMap::new(),
            writes: BTreeMap::new(),
        }
    }

    /// Read the raw document body at `key`, honouring this transaction's own writes.
    pub fn read_value(&mut self, key: &DocKey) -> Result<Option<Value>> {
        if let Some(pending) = self.writes.get(key) {
            return Ok(pending.clone());
        }
        if let Some(seen) = self.snapshot.get(key) {
            return Ok(seen.body.clone());
        }
        let versioned = self.ledger.read(key)?;
        let body = versioned.body.clone();
        self.snapshot.insert(key.clone(), versioned);
        Ok(body)
    }

    /// Read and deserialize the document at `key`.
    pub fn read<T: DeserializeOwned>(&mut self, key: &DocKey) -> Result<Option<T>> {
        self.read_value(key)?
            .map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }

    /// Buffer an upsert of `doc` at `key`.
    pub fn write<T: Serialize>(&mut self, key: &DocKey, doc: &T) -> Result<()> {
        let value = serde_json::to_value(doc)?;
        self.writes.insert(key.clone(), Some(value));
        Ok(())
    }

    /// Buffer the creation of a document that must not exist yet.
    ///
    /// The absence check is part of the read set, so two transactions
    /// creating the same key cannot both commit.
    ///
    /// # Errors
    /// `Internal` if a document already lives at `key`.
    pub fn create<T: Serialize>(&mut self, key: &DocKey, doc: &T) -> Result<()> {
        if self.read_value(key)?.is_some() {
            return Err(MatchdayError::Internal(format!("document already exists: {key}")));
        }
        self.write(key, doc)
    }

    /// Buffer a deletion of `key`.
    pub fn delete(&mut self, key: &DocKey) {
        self.writes.insert(key.clone(), None);
    }

    /// Number of buffered mutations.
    #[must_use]
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Hand the read versions and buffered writes to the ledger.
    ///
    /// # Errors
    /// `CommitConflict` if a document read by this transaction changed.
    pub fn commit(self) -> Result<()> {
        let reads: ReadSet = self
            .snapshot
            .into_iter()
            .map(|(key, seen)| (key, seen.version))
            .collect();
        self.ledger.commit(&reads, self.writes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryLedger;
    use matchday_types::{UserId, Wallet};

    #[test]
    fn read_your_own_writes() {
        let ledger = MemoryLedger::new();
        let user = UserId::new();
        let key = DocKey::wallet(user);

        let mut txn = Transaction::begin(&ledger);
        assert!(txn.read::<Wallet>(&key).unwrap().is_none());
        txn.write(&key, &Wallet::new(user, 10)).unwrap();
        assert_eq!(txn.read::<Wallet>(&key).unwrap().unwrap().coins, 10);
        txn.delete(&key);
        assert!(txn.read::<Wallet>(&key).unwrap().is_none());
    }

    #[test]
    fn writes_invisible_until_commit() {
        let ledger = MemoryLedger::new();
        let user = UserId::new();
        let key = DocKey::wallet(user);

        let mut txn = Transaction::begin(&ledger);
        txn.write(&key, &Wallet::new(user, 10)).unwrap();
        assert!(ledger.read(&key).unwrap().body.is_none());
        txn.commit().unwrap();
        assert!(ledger.read(&key).unwrap().body.is_some());
    }

    #[test]
    fn dropped_transaction_applies_nothing() {
        let ledger = MemoryLedger::new();
        let user = UserId::new();
        {
            let mut txn = Transaction::begin(&ledger);
            txn.write(&DocKey::wallet(user), &Wallet::new(user, 10))
                .unwrap();
            assert_eq!(txn.pending_writes(), 1);
        }
        assert_eq!(ledger.document_count(), 0);
    }

    #[test]
    fn repeat_reads_come_from_snapshot() {
        let ledger = MemoryLedger::new();
        let user = UserId::new();
        let key = DocKey::wallet(user);
        ledger.seed(&key, &Wallet::new(user, 5)).unwrap();

        let mut txn = Transaction::begin(&ledger);
        assert_eq!(txn.read::<Wallet>(&key).unwrap().unwrap().coins, 5);

        // A concurrent writer commits in between.
        ledger.seed(&key, &Wallet::new(user, 50)).unwrap();

        assert_eq!(txn.read::<Wallet>(&key).unwrap().unwrap().coins, 5);
        txn.write(&key, &Wallet::new(user, 4)).unwrap();
        let err = txn.commit().unwrap_err();
        assert!(matches!(err, MatchdayError::CommitConflict { .. }));
        assert_eq!(
            ledger.get::<Wallet>(&key).unwrap().unwrap().coins,
            50,
            "Stale write must not land"
        );
    }

    #[test]
    fn create_refuses_existing_document() {
        let ledger = MemoryLedger::new();
        let user = UserId::new();
        let key = DocKey::wallet(user);
        ledger.seed(&key, &Wallet::new(user, 1)).unwrap();

        let mut txn = Transaction::begin(&ledger);
        let err = txn.create(&key, &Wallet::new(user, 2)).unwrap_err();
        assert!(matches!(err, MatchdayError::Internal(_)));
        assert_eq!(txn.pending_writes(), 0);
    }

    #[test]
    fn type_mismatch_is_serialization_error() {
        let ledger = MemoryLedger::new();
        let user = UserId::new();
        let key = DocKey::wallet(user);
        ledger.seed(&key, &"not a wallet").unwrap();

        let mut txn = Transaction::begin(&ledger);
        let err = txn.read::<Wallet>(&key).unwrap_err();
        assert!(matches!(err, MatchdayError::Serialization(_)));
    }
}
