//! In-process ledger with per-document versions.
//!
//! Commits are validated and applied under one write lock, so a commit is
//! atomic with respect to every reader. Deleted documents keep a tombstone
//! version so a delete-then-recreate is still seen as a change.

use std::collections::HashMap;
use std::sync::RwLock;

use matchday_types::{MatchdayError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{DocKey, Ledger, ReadSet, Version, Versioned, WriteSet};

#[derive(Debug, Clone)]
struct Slot {
    version: Version,
    body: Option<Value>,
}

/// Thread-safe, optimistic-concurrency document store.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    docs: RwLock<HashMap<DocKey, Slot>>,
}

impl MemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a document outside any transaction (fixtures, migrations).
    pub fn seed<T: Serialize>(&self, key: &DocKey, doc: &T) -> Result<()> {
        let body = serde_json::to_value(doc)?;
        let mut docs = self.docs.write().map_err(|_| poisoned())?;
        let slot = docs.entry(key.clone()).or_insert(Slot {
            version: Version::ABSENT,
            body: None,
        });
        slot.version = slot.version.next();
        slot.body = Some(body);
        Ok(())
    }

    /// Read a committed document outside any transaction.
    pub fn get<T: DeserializeOwned>(&self, key: &DocKey) -> Result<Option<T>> {
        self.read(key)?
            .body
            .map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }

    /// All live documents whose key starts with `prefix`, sorted by key.
    pub fn scan_prefix(&self, prefix: &str) -> Result<Vec<(DocKey, Value)>> {
        let docs = self.docs.read().map_err(|_| poisoned())?;
        let mut found: Vec<(DocKey, Value)> = docs
            .iter()
            .filter(|(key, _)| key.as_str().starts_with(prefix))
            .filter_map(|(key, slot)| slot.body.clone().map(|body| (key.clone(), body)))
            .collect();
        found.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(found)
    }

    /// Number of live (non-deleted) documents.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.docs
            .read()
            .map(|docs| docs.values().filter(|s| s.body.is_some()).count())
            .unwrap_or(0)
    }
}

fn poisoned() -> MatchdayError {
    MatchdayError::LedgerUnavailable("document store lock poisoned".into())
}

impl Ledger for MemoryLedger {
    fn read(&self, key: &DocKey) -> Result<Versioned> {
        let docs = self.docs.read().map_err(|_| poisoned())?;
        Ok(docs.get(key).map_or(
            Versioned {
                version: Version::ABSENT,
                body: None,
            },
            |slot| Versioned {
                version: slot.version,
                body: slot.body.clone(),
            },
        ))
    }

    fn commit(&self, reads: &ReadSet, writes: WriteSet) -> Result<()> {
        let mut docs = self.docs.write().map_err(|_| poisoned())?;

        for (key, seen) in reads {
            let current = docs.get(key).map_or(Version::ABSENT, |s| s.version);
            if current != *seen {
                return Err(MatchdayError::CommitConflict {
                    key: key.to_string(),
                });
            }
        }

        for (key, body) in writes {
            let slot = docs.entry(key).or_insert(Slot {
                version: Version::ABSENT,
                body: None,
            });
            slot.version = slot.version.next();
            slot.body = body;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Transaction;
    use matchday_types::{UserId, Wallet};

    #[test]
    fn absent_key_reads_version_zero() {
        let ledger = MemoryLedger::new();
        let v = ledger.read(&DocKey::wallet(UserId::new())).unwrap();
        assert_eq!(v.version, Version::ABSENT);
        assert!(v.body.is_none());
    }

    #[test]
    fn commit_bumps_versions() {
        let ledger = MemoryLedger::new();
        let user = UserId::new();
        let key = DocKey::wallet(user);
        ledger.seed(&key, &Wallet::new(user, 1)).unwrap();
        ledger.seed(&key, &Wallet::new(user, 2)).unwrap();
        assert_eq!(ledger.read(&key).unwrap().version, Version(2));
    }

    #[test]
    fn delete_leaves_tombstone_version() {
        let ledger = MemoryLedger::new();
        let user = UserId::new();
        let key = DocKey::wallet(user);
        ledger.seed(&key, &Wallet::new(user, 1)).unwrap();

        let mut txn = Transaction::begin(&ledger);
        txn.read_value(&key).unwrap();
        txn.delete(&key);
        txn.commit().unwrap();

        let v = ledger.read(&key).unwrap();
        assert_eq!(v.version, Version(2));
        assert!(v.body.is_none());
        assert_eq!(ledger.document_count(), 0);
    }

    #[test]
    fn concurrent_creation_of_same_key_conflicts() {
        let ledger = MemoryLedger::new();
        let user = UserId::new();
        let key = DocKey::wallet(user);

        let mut a = Transaction::begin(&ledger);
        let mut b = Transaction::begin(&ledger);
        assert!(a.read_value(&key).unwrap().is_none());
        assert!(b.read_value(&key).unwrap().is_none());
        a.write(&key, &Wallet::new(user, 1)).unwrap();
        b.write(&key, &Wallet::new(user, 2)).unwrap();

        a.commit().unwrap();
        assert!(b.commit().unwrap_err().is_conflict());
        assert_eq!(ledger.get::<Wallet>(&key).unwrap().unwrap().coins, 1);
    }

    #[test]
    fn failed_commit_applies_no_writes() {
        let ledger = MemoryLedger::new();
        let user = UserId::new();
        let contended = DocKey::wallet(user);
        let other = DocKey::card_index(user);

        let mut txn = Transaction::begin(&ledger);
        txn.read_value(&contended).unwrap();
        txn.write(&contended, &Wallet::new(user, 7)).unwrap();
        txn.write(&other, &Vec::<u8>::new()).unwrap();

        ledger.seed(&contended, &Wallet::new(user, 9)).unwrap();
        assert!(txn.commit().is_err());
        assert!(ledger.get::<Value>(&other).unwrap().is_none());
    }

    #[test]
    fn scan_prefix_skips_tombstones() {
        let ledger = MemoryLedger::new();
        let a = UserId::new();
        let b = UserId::new();
        ledger.seed(&DocKey::wallet(a), &Wallet::new(a, 1)).unwrap();
        ledger.seed(&DocKey::wallet(b), &Wallet::new(b, 1)).unwrap();

        let mut txn = Transaction::begin(&ledger);
        txn.read_value(&DocKey::wallet(b)).unwrap();
        txn.delete(&DocKey::wallet(b));
        txn.commit().unwrap();

        let found = ledger.scan_prefix("users/").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, DocKey::wallet(a));
    }
}
