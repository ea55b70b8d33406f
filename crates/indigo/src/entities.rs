//! The record store facade.
//!
//! Every put and delete runs inside one store transaction, through a fresh
//! [`TransactionWithCache`] per attempt. An update removes the record from
//! every index before re-adding it, so terms from its previous version never
//! linger.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use indigo_index::IndicesManager;
use indigo_storage::{
    Store, StoreListOps, Transaction, TransactionWithCache, TypedStoreReads, TypedTransaction,
};
use indigo_types::{id_as_string, ids_as_strings, is_numeric_id, Entity, IndigoError};

use crate::info::{EntitiesInfo, INFO_ID};

/// Records of type `T`, their id counter and their indices.
pub struct Indigo<T: Entity> {
    namespace: String,
    store: Arc<dyn Store>,
    indices: IndicesManager<T>,
}

impl<T: Entity> Indigo<T> {
    pub(crate) fn new(namespace: String, store: Arc<dyn Store>, indices: IndicesManager<T>) -> Self {
        Self {
            namespace,
            store,
            indices,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub fn indices(&self) -> &IndicesManager<T> {
        &self.indices
    }

    pub fn get(&self, id: u64) -> Result<Option<T>, IndigoError> {
        Ok(self.store.get_as(&self.namespace, &id_as_string(id))?)
    }

    /// Records for `ids`, in the same order; `None` where a record is missing.
    pub fn get_many(&self, ids: &[u64]) -> Result<Vec<Option<T>>, IndigoError> {
        Ok(self
            .store
            .get_many_as(&self.namespace, &ids_as_strings(ids))?)
    }

    /// Ids of every stored record, ascending.
    pub fn list(&self) -> Result<Vec<u64>, IndigoError> {
        let mut ids: Vec<u64> = self
            .store
            .list(&self.namespace)?
            .iter()
            .filter(|id| is_numeric_id(id))
            .filter_map(|id| id.parse().ok())
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    pub fn search(&self, index_id: &str, word: &str) -> Result<HashSet<u64>, IndigoError> {
        self.indices.search(index_id, word)
    }

    /// Store a single record. See [`Indigo::put`].
    pub fn put_one(&self, record: &mut T) -> Result<u64, IndigoError> {
        let ids = self.put(std::slice::from_mut(record))?;
        ids.first()
            .copied()
            .ok_or_else(|| IndigoError::Storage("No id stored".to_string()))
    }

    /// Store records, atomically.
    ///
    /// Records without an id get the next one from the namespace counter.
    /// Records with an id replace the stored record, which must exist
    /// ([`IndigoError::NotFound`] otherwise). New ids are written back into
    /// `records` once the transaction has committed, and returned in order.
    pub fn put(&self, records: &mut [T]) -> Result<Vec<u64>, IndigoError> {
        let mut ids = Vec::new();
        self.run_transaction(|txn| {
            ids = self.put_in(&*records, txn)?;
            Ok(())
        })?;

        for (record, id) in records.iter_mut().zip(&ids) {
            record.set_id(*id);
        }

        debug!(namespace = %self.namespace, count = ids.len(), "Stored records");
        Ok(ids)
    }

    fn put_in(&self, records: &[T], txn: &mut dyn Transaction) -> Result<Vec<u64>, IndigoError> {
        let mut info: EntitiesInfo = txn.get_as(&self.namespace, INFO_ID)?.unwrap_or_default();
        let mut ids = Vec::with_capacity(records.len());

        for record in records {
            let mut record = record.clone();
            let id = match record.id() {
                Some(id) => {
                    self.ensure_exists(id, txn)?;
                    self.indices.remove_entity(id, txn)?;
                    id
                }
                None => {
                    let id = info.generate_id();
                    record.set_id(id);
                    id
                }
            };

            txn.put_as(&self.namespace, &id_as_string(id), &record)?;
            self.indices.add_entity(&record, txn)?;
            ids.push(id);
        }

        txn.put_as(&self.namespace, INFO_ID, &info)?;
        Ok(ids)
    }

    /// Delete a record and remove it from every index.
    pub fn delete(&self, id: u64) -> Result<(), IndigoError> {
        self.run_transaction(|txn| {
            self.ensure_exists(id, txn)?;
            txn.delete(&self.namespace, &id_as_string(id))?;
            self.indices.remove_entity(id, txn)
        })?;

        debug!(namespace = %self.namespace, id, "Deleted record");
        Ok(())
    }

    /// Run `body` in a store transaction, through a cache that is rebuilt on
    /// every attempt. `body` may run more than once.
    pub fn run_transaction<F>(&self, mut body: F) -> Result<(), IndigoError>
    where
        F: FnMut(&mut dyn Transaction) -> Result<(), IndigoError>,
    {
        self.store.transaction(&mut |txn| {
            let mut cached = TransactionWithCache::new(txn);
            body(&mut cached)
        })
    }

    fn ensure_exists(&self, id: u64, txn: &mut dyn Transaction) -> Result<(), IndigoError> {
        if txn.exists(&self.namespace, &id_as_string(id))? {
            Ok(())
        } else {
            Err(IndigoError::NotFound(format!("Entity {} doesn't exist", id)))
        }
    }
}
