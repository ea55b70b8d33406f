//! RocksDB backend.
//!
//! Transactions are serialized by a writer lock held for the whole body, so
//! a body never conflicts and runs exactly once. The write set is buffered
//! in [`PendingWrites`] and committed as one `WriteBatch`.
//!
//! Non-transactional reads go straight to the database and may observe the
//! state between two transactions, never a partial one.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Mutex;

use rocksdb::{ColumnFamily, Direction, IteratorMode, Options, WriteBatch, DB};
use tracing::{debug, info};

use indigo_types::{IndigoError, ItemId, TransactionSettings};

use crate::column_families::{build_cf_descriptors, CF_DOCUMENTS};
use crate::error::StorageError;
use crate::keys::{check_key, DocumentKey};
use crate::pending::PendingWrites;
use crate::store::{Store, StoreListOps, StoreReadOps, Transaction, TransactionBody};

/// Persistent [`Store`] backed by RocksDB.
///
/// Calling [`Store::transaction`] from inside a transaction body deadlocks.
pub struct RocksStore {
    db: DB,
    settings: TransactionSettings,
    writer: Mutex<()>,
}

impl RocksStore {
    /// Open storage at the given path, creating if necessary
    pub fn open(path: &Path, settings: TransactionSettings) -> Result<Self, StorageError> {
        info!("Opening storage at {:?}", path);

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);
        db_opts.set_max_background_jobs(4);

        let db = DB::open_cf_descriptors(&db_opts, path, build_cf_descriptors())?;

        Ok(Self {
            db,
            settings,
            writer: Mutex::new(()),
        })
    }

    pub fn settings(&self) -> &TransactionSettings {
        &self.settings
    }

    /// Flush memtables to disk
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }
}

fn documents_cf(db: &DB) -> Result<&ColumnFamily, StorageError> {
    db.cf_handle(CF_DOCUMENTS)
        .ok_or_else(|| StorageError::ColumnFamilyNotFound(CF_DOCUMENTS.to_string()))
}

fn read(db: &DB, key: &ItemId) -> Result<Option<Vec<u8>>, StorageError> {
    let cf = documents_cf(db)?;
    Ok(db.get_cf(&cf, DocumentKey::from(key).to_bytes())?)
}

impl StoreReadOps for RocksStore {
    fn get_many(
        &self,
        namespace: &str,
        ids: &[String],
    ) -> Result<Vec<Option<Vec<u8>>>, StorageError> {
        ids.iter()
            .map(|id| read(&self.db, &check_key(namespace, id)?))
            .collect()
    }

    fn exists(&self, namespace: &str, id: &str) -> Result<bool, StorageError> {
        Ok(read(&self.db, &check_key(namespace, id)?)?.is_some())
    }
}

impl StoreListOps for RocksStore {
    fn list(&self, namespace: &str) -> Result<BTreeSet<String>, StorageError> {
        let cf = documents_cf(&self.db)?;
        let prefix = DocumentKey::namespace_prefix(namespace);

        let mut ids = BTreeSet::new();
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(prefix.as_slice(), Direction::Forward));

        for item in iter {
            let (key, _) = item?;
            // Stop if we've passed the prefix
            if !key.starts_with(&prefix) {
                break;
            }
            ids.insert(DocumentKey::from_bytes(&key)?.id);
        }

        Ok(ids)
    }
}

impl Store for RocksStore {
    fn transaction(&self, body: &mut TransactionBody<'_>) -> Result<(), IndigoError> {
        let _guard = self
            .writer
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;

        let mut txn = RocksTransaction {
            db: &self.db,
            pending: PendingWrites::new(&self.settings),
        };
        body(&mut txn)?;

        let writes = txn.pending.into_writes();
        let count = writes.len();

        let cf = documents_cf(&self.db)?;
        let mut batch = WriteBatch::default();
        for (key, value) in &writes {
            let key = DocumentKey::from(key).to_bytes();
            match value {
                Some(value) => batch.put_cf(&cf, key, value),
                None => batch.delete_cf(&cf, key),
            }
        }
        self.db.write(batch).map_err(StorageError::from)?;

        debug!(writes = count, "Committed transaction");
        Ok(())
    }
}

/// The single in-flight transaction of a [`RocksStore`].
pub struct RocksTransaction<'a> {
    db: &'a DB,
    pending: PendingWrites,
}

impl RocksTransaction<'_> {
    fn read(&self, key: &ItemId) -> Result<Option<Vec<u8>>, StorageError> {
        if let Some(pending) = self.pending.read(key)? {
            return Ok(pending.clone());
        }
        read(self.db, key)
    }
}

impl Transaction for RocksTransaction<'_> {
    fn get_many(
        &mut self,
        namespace: &str,
        ids: &[String],
    ) -> Result<Vec<Option<Vec<u8>>>, StorageError> {
        ids.iter()
            .map(|id| self.read(&check_key(namespace, id)?))
            .collect()
    }

    fn exists(&mut self, namespace: &str, id: &str) -> Result<bool, StorageError> {
        Ok(self.read(&check_key(namespace, id)?)?.is_some())
    }

    fn put(&mut self, namespace: &str, id: &str, value: Vec<u8>) -> Result<(), StorageError> {
        self.pending.put(check_key(namespace, id)?, value)
    }

    fn delete(&mut self, namespace: &str, id: &str) -> Result<(), StorageError> {
        self.pending.delete(check_key(namespace, id)?)
    }
}
