//! In-process store with optimistic concurrency.
//!
//! Every item carries a version. A transaction remembers the version of each
//! item it read; at commit the versions are re-checked under the write lock
//! and, if any changed, the attempt is discarded and the body re-executed.
//! This mirrors how hosted document stores behave, which makes it the
//! backend of choice for tests and embedded use.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, RwLock};

use tracing::{debug, warn};

use indigo_types::{IndigoError, ItemId, TransactionSettings};

use crate::error::StorageError;
use crate::keys::check_key;
use crate::pending::PendingWrites;
use crate::store::{Store, StoreListOps, StoreReadOps, Transaction, TransactionBody};

#[derive(Debug, Clone)]
struct Versioned {
    version: u64,
    value: Vec<u8>,
}

/// Version reported for items that don't exist.
const ABSENT: u64 = 0;

/// Commit counters, mainly for tests and diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStoreStats {
    /// Transactions committed
    pub commits: u64,
    /// Attempts discarded because of a conflict
    pub conflicts: u64,
    /// Distinct keys written by the last committed transaction
    pub last_commit_writes: usize,
}

#[derive(Debug, Default)]
struct Items {
    map: HashMap<ItemId, Versioned>,
    next_version: u64,
}

/// In-memory [`Store`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<Items>,
    settings: TransactionSettings,
    stats: Mutex<MemoryStoreStats>,
}

impl MemoryStore {
    /// Store with default limits: unlimited writes, reads after writes allowed.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: TransactionSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn settings(&self) -> &TransactionSettings {
        &self.settings
    }

    pub fn stats(&self) -> Result<MemoryStoreStats, StorageError> {
        self.stats
            .lock()
            .map(|s| s.clone())
            .map_err(|e| StorageError::Lock(e.to_string()))
    }

    fn read(&self, key: &ItemId) -> Result<(u64, Option<Vec<u8>>), StorageError> {
        let items = self
            .items
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))?;

        Ok(match items.map.get(key) {
            Some(item) => (item.version, Some(item.value.clone())),
            None => (ABSENT, None),
        })
    }

    fn commit(&self, txn: MemoryTransaction<'_>) -> Result<usize, StorageError> {
        let mut items = self
            .items
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?;

        for (key, read_version) in &txn.read_versions {
            let current = items.map.get(key).map_or(ABSENT, |item| item.version);
            if current != *read_version {
                return Err(StorageError::Conflict(format!(
                    "{} changed since it was read",
                    key
                )));
            }
        }

        let writes = txn.pending.into_writes();
        let count = writes.len();
        for (key, value) in writes {
            match value {
                Some(value) => {
                    items.next_version += 1;
                    let version = items.next_version;
                    items.map.insert(key, Versioned { version, value });
                }
                None => {
                    items.map.remove(&key);
                }
            }
        }

        Ok(count)
    }

    fn record_stats(&self, f: impl FnOnce(&mut MemoryStoreStats)) -> Result<(), StorageError> {
        let mut stats = self
            .stats
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        f(&mut stats);
        Ok(())
    }
}

impl StoreReadOps for MemoryStore {
    fn get_many(
        &self,
        namespace: &str,
        ids: &[String],
    ) -> Result<Vec<Option<Vec<u8>>>, StorageError> {
        ids.iter()
            .map(|id| {
                let key = check_key(namespace, id)?;
                Ok(self.read(&key)?.1)
            })
            .collect()
    }

    fn exists(&self, namespace: &str, id: &str) -> Result<bool, StorageError> {
        let key = check_key(namespace, id)?;
        Ok(self.read(&key)?.1.is_some())
    }
}

impl StoreListOps for MemoryStore {
    fn list(&self, namespace: &str) -> Result<BTreeSet<String>, StorageError> {
        let items = self
            .items
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))?;

        Ok(items
            .map
            .keys()
            .filter(|key| key.namespace == namespace)
            .map(|key| key.id.clone())
            .collect())
    }
}

impl Store for MemoryStore {
    fn transaction(&self, body: &mut TransactionBody<'_>) -> Result<(), IndigoError> {
        let mut attempt = 0;
        loop {
            let mut txn = MemoryTransaction::new(self);
            body(&mut txn)?;

            match self.commit(txn) {
                Ok(writes) => {
                    self.record_stats(|s| {
                        s.commits += 1;
                        s.last_commit_writes = writes;
                    })?;
                    debug!(writes, attempt, "Committed transaction");
                    return Ok(());
                }
                Err(e) if e.is_conflict() && attempt < self.settings.max_retries => {
                    self.record_stats(|s| s.conflicts += 1)?;
                    attempt += 1;
                    warn!(attempt, error = %e, "Retrying transaction");
                }
                Err(e) => {
                    if e.is_conflict() {
                        self.record_stats(|s| s.conflicts += 1)?;
                    }
                    return Err(e.into());
                }
            }
        }
    }
}

/// One attempt against a [`MemoryStore`].
pub struct MemoryTransaction<'a> {
    store: &'a MemoryStore,
    read_versions: HashMap<ItemId, u64>,
    pending: PendingWrites,
}

impl<'a> MemoryTransaction<'a> {
    fn new(store: &'a MemoryStore) -> Self {
        Self {
            store,
            read_versions: HashMap::new(),
            pending: PendingWrites::new(&store.settings),
        }
    }

    fn read(&mut self, key: ItemId) -> Result<Option<Vec<u8>>, StorageError> {
        if let Some(pending) = self.pending.read(&key)? {
            return Ok(pending.clone());
        }

        let (version, value) = self.store.read(&key)?;
        // Keep the first version seen; a later read can't make a stale one valid
        self.read_versions.entry(key).or_insert(version);
        Ok(value)
    }
}

impl Transaction for MemoryTransaction<'_> {
    fn get_many(
        &mut self,
        namespace: &str,
        ids: &[String],
    ) -> Result<Vec<Option<Vec<u8>>>, StorageError> {
        ids.iter()
            .map(|id| {
                let key = check_key(namespace, id)?;
                self.read(key)
            })
            .collect()
    }

    fn exists(&mut self, namespace: &str, id: &str) -> Result<bool, StorageError> {
        let key = check_key(namespace, id)?;
        Ok(self.read(key)?.is_some())
    }

    fn put(&mut self, namespace: &str, id: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let key = check_key(namespace, id)?;
        self.pending.put(key, value)
    }

    fn delete(&mut self, namespace: &str, id: &str) -> Result<(), StorageError> {
        let key = check_key(namespace, id)?;
        self.pending.delete(key)
    }
}
